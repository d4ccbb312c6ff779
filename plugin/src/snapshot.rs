//! Cached copy of every list and its items, with a lookup index.
//!
//! # Design
//! A `Snapshot` is immutable once built. The coordinator builds a fresh one
//! per successful poll and swaps it in whole, so the index never has to be
//! patched: it is rebuilt together with the data it points into.

use std::collections::HashMap;

use koplista_core::{Item, ShoppingList};

/// One list and its items in service order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub info: ShoppingList,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    lists: Vec<ListEntry>,
    index: SnapshotIndex,
}

/// Positions into `Snapshot::lists`, keyed by id and by normalized name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SnapshotIndex {
    list_by_id: HashMap<String, usize>,
    list_by_name: HashMap<String, usize>,
    // Parallel to `lists`: normalized item name -> item positions.
    items_by_name: Vec<HashMap<String, Vec<usize>>>,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Snapshot {
    /// Later duplicates of a list id, or of an item id within a list, are
    /// dropped.
    pub fn new(entries: Vec<ListEntry>) -> Self {
        let mut lists: Vec<ListEntry> = Vec::with_capacity(entries.len());
        let mut index = SnapshotIndex::default();

        for mut entry in entries {
            if index.list_by_id.contains_key(&entry.info.id) {
                tracing::warn!(list_id = %entry.info.id, "duplicate list id in poll result");
                continue;
            }
            let pos = lists.len();

            let mut seen = std::collections::HashSet::new();
            entry.items.retain(|item| seen.insert(item.id.clone()));

            let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
            for (i, item) in entry.items.iter().enumerate() {
                by_name.entry(normalize(&item.name)).or_default().push(i);
            }

            index.list_by_id.insert(entry.info.id.clone(), pos);
            index.list_by_name.entry(normalize(&entry.info.name)).or_insert(pos);
            index.items_by_name.push(by_name);
            lists.push(entry);
        }

        Self { lists, index }
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn lists(&self) -> &[ListEntry] {
        &self.lists
    }

    pub fn first_list(&self) -> Option<&ListEntry> {
        self.lists.first()
    }

    pub fn list(&self, list_id: &str) -> Option<&ListEntry> {
        self.index.list_by_id.get(list_id).map(|&pos| &self.lists[pos])
    }

    /// Exact id match first, then case-insensitive name match.
    pub fn resolve_list(&self, id_or_name: &str) -> Option<&ListEntry> {
        self.list(id_or_name).or_else(|| {
            self.index
                .list_by_name
                .get(&normalize(id_or_name))
                .map(|&pos| &self.lists[pos])
        })
    }

    /// Items in `list_id` whose name matches case-insensitively, in list order.
    pub fn find_items<'a>(&'a self, list_id: &str, name: &str) -> Vec<&'a Item> {
        let Some(&pos) = self.index.list_by_id.get(list_id) else {
            return Vec::new();
        };
        self.index.items_by_name[pos]
            .get(&normalize(name))
            .map(|hits| hits.iter().map(|&i| &self.lists[pos].items[i]).collect())
            .unwrap_or_default()
    }

    pub fn item(&self, list_id: &str, item_id: &str) -> Option<&Item> {
        self.list(list_id)?.items.iter().find(|i| i.id == item_id)
    }
}
