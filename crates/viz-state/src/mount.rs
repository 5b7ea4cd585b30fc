//! Which mount points currently hold a chart.
//!
//! A mounted scene is represented by a handle whose `Drop` tears the scene
//! down (Leptos' `UnmountHandle` behaves this way). Removing a handle from
//! the registry therefore removes the SVG, the tooltip and any running
//! tick loop.

use std::collections::HashMap;

use viz_core::{VizError, VizResult};

/// What drawing into an occupied mount point does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MountPolicy {
    /// Fail with `AlreadyMounted`
    #[default]
    Reject,
    /// Tear the old scene down, then draw
    Replace,
}

/// Registry of live scenes keyed by mount selector
pub struct MountRegistry<H> {
    mounted: HashMap<String, H>,
}

impl<H> MountRegistry<H> {
    pub fn new() -> Self {
        Self {
            mounted: HashMap::new(),
        }
    }

    /// Mount a scene built by `make` under `selector`.
    ///
    /// With [`MountPolicy::Replace`] the previous scene is dropped before
    /// `make` runs, so the new scene never shares the mount point with it.
    pub fn mount<F>(&mut self, selector: &str, policy: MountPolicy, make: F) -> VizResult<()>
    where
        F: FnOnce() -> VizResult<H>,
    {
        if self.mounted.contains_key(selector) {
            match policy {
                MountPolicy::Reject => {
                    tracing::warn!("Refusing to draw into occupied mount {}", selector);
                    return Err(VizError::AlreadyMounted(selector.to_string()));
                }
                MountPolicy::Replace => {
                    tracing::debug!("Replacing scene at {}", selector);
                    drop(self.mounted.remove(selector));
                }
            }
        }

        let handle = make()?;
        self.mounted.insert(selector.to_string(), handle);
        Ok(())
    }

    /// Tear down the scene at `selector`
    pub fn unmount(&mut self, selector: &str) -> bool {
        self.mounted.remove(selector).is_some()
    }

    pub fn is_mounted(&self, selector: &str) -> bool {
        self.mounted.contains_key(selector)
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    pub fn clear(&mut self) {
        self.mounted.clear();
    }
}

impl<H> Default for MountRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Logs its own teardown
    struct Scene {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Drop for Scene {
        fn drop(&mut self) {
            self.log.borrow_mut().push(format!("drop {}", self.name));
        }
    }

    fn scene(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> impl FnOnce() -> VizResult<Scene> {
        let log = log.clone();
        move || {
            log.borrow_mut().push(format!("make {}", name));
            Ok(Scene { name, log })
        }
    }

    #[test]
    fn test_reject_second_draw() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = MountRegistry::new();

        registry.mount("#bubble", MountPolicy::Reject, scene("a", &log)).unwrap();
        let second = registry.mount("#bubble", MountPolicy::Reject, scene("b", &log));

        assert_eq!(second, Err(VizError::AlreadyMounted("#bubble".into())));
        assert_eq!(*log.borrow(), vec!["make a"]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_replace_tears_down_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = MountRegistry::new();

        registry.mount("#hist", MountPolicy::Replace, scene("a", &log)).unwrap();
        registry.mount("#hist", MountPolicy::Replace, scene("b", &log)).unwrap();

        assert_eq!(*log.borrow(), vec!["make a", "drop a", "make b"]);
        assert!(registry.is_mounted("#hist"));
        assert!(registry.unmount("#hist"));
        assert_eq!(log.borrow().last().map(String::as_str), Some("drop b"));
    }

    #[test]
    fn test_failed_make_leaves_mount_free() {
        let mut registry: MountRegistry<()> = MountRegistry::new();
        let result = registry.mount("#line", MountPolicy::Reject, || {
            Err(VizError::invalid_dataset("empty"))
        });
        assert!(result.is_err());
        assert!(!registry.is_mounted("#line"));
        assert!(registry.mount("#line", MountPolicy::Reject, || Ok(())).is_ok());
    }
}
