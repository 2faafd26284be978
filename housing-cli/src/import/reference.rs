//! Community name → id lookup used to resolve property rows

use std::collections::{HashMap, HashSet};

use crate::records::CommunityRef;

/// Result of a name lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one community has this name
    Found(i64),
    /// Several communities share this name; the lowest id was chosen
    Ambiguous(i64),
    /// No community has this name
    NotFound,
}

/// Snapshot of community names taken at the start of a property import.
///
/// Matching is exact: no trimming beyond what the caller did, no case
/// folding, no fuzzy matching.
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    ids: HashMap<String, i64>,
    duplicates: HashSet<String>,
}

impl ReferenceIndex {
    /// Build from every stored community
    pub fn build(communities: impl IntoIterator<Item = CommunityRef>) -> Self {
        let mut communities: Vec<_> = communities.into_iter().collect();
        communities.sort_by_key(|c| c.id);

        let mut index = ReferenceIndex::default();
        for community in communities {
            if index.ids.contains_key(&community.name) {
                index.duplicates.insert(community.name);
            } else {
                index.ids.insert(community.name, community.id);
            }
        }

        for name in &index.duplicates {
            log::warn!("Community name '{}' is shared by several communities; using the oldest", name);
        }

        index
    }

    pub fn resolve(&self, name: &str) -> Resolution {
        match self.ids.get(name) {
            Some(&id) if self.duplicates.contains(name) => Resolution::Ambiguous(id),
            Some(&id) => Resolution::Found(id),
            None => Resolution::NotFound,
        }
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn duplicate_names(&self) -> impl Iterator<Item = &str> {
        self.duplicates.iter().map(String::as_str)
    }
}
