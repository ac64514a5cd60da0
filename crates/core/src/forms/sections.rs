use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which collapsible sections of a form are open. Presentation state only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpandedSections<K: Ord>(BTreeSet<K>);

impl<K: Ord> Default for ExpandedSections<K> {
    fn default() -> Self {
        Self(BTreeSet::new())
    }
}

impl<K: Ord + Copy> ExpandedSections<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a closed section or closes an open one. Returns whether it is now open.
    pub fn toggle(&mut self, key: K) -> bool {
        if self.0.remove(&key) {
            false
        } else {
            self.0.insert(key);
            true
        }
    }

    pub fn is_expanded(&self, key: K) -> bool {
        self.0.contains(&key)
    }

    pub fn expanded(&self) -> impl Iterator<Item = K> + '_ {
        self.0.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_toggle_independently() {
        let mut sections = ExpandedSections::new();
        assert!(sections.toggle("falls"));
        assert!(sections.toggle("lpp"));
        assert!(!sections.toggle("falls"));
        assert!(!sections.is_expanded("falls"));
        assert!(sections.is_expanded("lpp"));
        assert_eq!(sections.expanded().collect::<Vec<_>>(), vec!["lpp"]);
    }
}
