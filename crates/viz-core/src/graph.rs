//! Force-directed graph dataset

use crate::{VizError, VizResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Node identifier: numeric ids and string ids both occur in link tables
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeKey {
    Index(u64),
    Name(String),
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKey::Index(i) => write!(f, "{}", i),
            NodeKey::Name(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for NodeKey {
    fn from(i: u64) -> Self {
        Self::Index(i)
    }
}

impl From<&str> for NodeKey {
    fn from(s: &str) -> Self {
        Self::Name(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeKey,
    pub group: String,
    pub radius: f64,
    #[serde(default)]
    pub citing_patents_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: NodeKey,
    pub target: NodeKey,
    #[serde(default = "default_link_value")]
    pub value: f64,
}

fn default_link_value() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// A link whose endpoints were found in the node table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
}

impl GraphData {
    /// Distinct groups in first-seen order
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for node in &self.nodes {
            if !groups.contains(&node.group.as_str()) {
                groups.push(&node.group);
            }
        }
        groups
    }

    /// Map links onto node indices. Links naming an unknown node are dropped.
    pub fn resolve_links(&self) -> VizResult<Vec<ResolvedLink>> {
        if self.nodes.is_empty() {
            return Err(VizError::invalid_dataset("graph has no nodes"));
        }

        let mut index: HashMap<&NodeKey, usize> = HashMap::with_capacity(self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            if !node.radius.is_finite() || node.radius < 0.0 {
                return Err(VizError::invalid_dataset(format!(
                    "node {} has an invalid radius {}",
                    node.id, node.radius
                )));
            }
            if index.insert(&node.id, i).is_some() {
                return Err(VizError::invalid_dataset(format!(
                    "duplicate node id {}",
                    node.id
                )));
            }
        }

        let mut resolved = Vec::with_capacity(self.links.len());
        for link in &self.links {
            match (index.get(&link.source), index.get(&link.target)) {
                (Some(&source), Some(&target)) => resolved.push(ResolvedLink {
                    source,
                    target,
                    value: link.value,
                }),
                _ => {
                    tracing::warn!(
                        "Dropping link {} -> {}: endpoint not in node table",
                        link.source,
                        link.target
                    );
                }
            }
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u64, group: &str) -> GraphNode {
        GraphNode {
            id: NodeKey::Index(id),
            group: group.to_string(),
            radius: 2.0,
            citing_patents_count: 0,
        }
    }

    #[test]
    fn test_resolve_drops_unknown_targets() {
        let data = GraphData {
            nodes: vec![node(0, "a"), node(1, "a")],
            links: vec![
                GraphLink {
                    source: 0.into(),
                    target: 1.into(),
                    value: 2.0,
                },
                GraphLink {
                    source: 0.into(),
                    target: "109-294-662-661-65X".into(),
                    value: 2.0,
                },
            ],
        };

        let links = data.resolve_links().unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!((links[0].source, links[0].target), (0, 1));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let data = GraphData {
            nodes: vec![node(3, "a"), node(3, "b")],
            links: vec![],
        };
        assert!(data.resolve_links().is_err());
    }

    #[test]
    fn test_mixed_key_json() {
        let link: GraphLink =
            serde_json::from_str(r#"{"source": 0, "target": "074-937-457-594-345"}"#).unwrap();
        assert_eq!(link.source, NodeKey::Index(0));
        assert_eq!(link.target, NodeKey::Name("074-937-457-594-345".to_string()));
        assert_eq!(link.value, 1.0);
    }

    #[test]
    fn test_groups_first_seen_order() {
        let data = GraphData {
            nodes: vec![node(0, "x"), node(1, "y"), node(2, "x")],
            links: vec![],
        };
        assert_eq!(data.groups(), vec!["x", "y"]);
    }
}
