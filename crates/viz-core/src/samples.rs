//! Hard-coded demo datasets

use crate::{BubbleDatum, GraphData, GraphLink, GraphNode, HistogramDatum, LinePoint, NodeKey, WordCount};

pub fn bubbles() -> Vec<BubbleDatum> {
    [
        ("rust", 5.0),
        ("go", 3.0),
        ("ts", 4.0),
        ("python", 6.0),
        ("c", 2.0),
        ("zig", 1.0),
        ("ocaml", 2.0),
        ("kotlin", 3.0),
        ("swift", 2.0),
        ("haskell", 1.0),
    ]
    .into_iter()
    .map(|(label, r)| BubbleDatum::new(label, r))
    .collect()
}

pub fn histogram() -> Vec<HistogramDatum> {
    [
        ("Jan", 12.0),
        ("Feb", 8.0),
        ("Mar", -4.0),
        ("Apr", 15.0),
        ("May", -9.0),
        ("Jun", 6.0),
    ]
    .into_iter()
    .map(|(label, volume)| HistogramDatum::new(label, volume))
    .collect()
}

pub fn line() -> Vec<LinePoint> {
    (1..=6)
        .map(|day| LinePoint::new(format!("2019/1/{}", day), 70.0))
        .collect()
}

pub fn words() -> Vec<WordCount> {
    [
        ("aaaa", 9.0),
        ("bbbb", 3.0),
        ("cccc", 2.0),
        ("dddd", 9.0),
        ("eeee", 6.0),
        ("ffff", 4.0),
        ("gggg", 2.0),
        ("hhhh", 8.0),
        ("aaaa", 9.0),
        ("bbbb", 3.0),
        ("cccc", 2.0),
        ("dddd", 9.0),
        ("eeee", 6.0),
        ("ffff", 4.0),
        ("gggg", 2.0),
        ("hhhh", 1.0),
    ]
    .into_iter()
    .map(|(word, count)| WordCount::new(word, count))
    .collect()
}

/// Citation graph; two of its links point at works outside the node table
pub fn citation_graph() -> GraphData {
    let nodes = (0..3)
        .map(|id| GraphNode {
            id: NodeKey::Index(id),
            group: "Cited Works".to_string(),
            radius: 2.0,
            citing_patents_count: 2,
        })
        .collect();

    let links = vec![
        GraphLink {
            source: 0.into(),
            target: "109-294-662-661-65X".into(),
            value: 2.0,
        },
        GraphLink {
            source: 0.into(),
            target: "074-937-457-594-345".into(),
            value: 2.0,
        },
        GraphLink {
            source: 0.into(),
            target: 1.into(),
            value: 1.0,
        },
        GraphLink {
            source: 1.into(),
            target: 2.into(),
            value: 1.0,
        },
    ];

    GraphData { nodes, links }
}
