//! Items, the takeable-item catalog, and the player's inventory.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Broad grouping used by room events and `use` effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    /// Opens locked doors.
    Key,
    /// Something that does a job.
    Tool,
    /// Paper or digital records.
    Document,
    /// Used up when used.
    Consumable,
    /// Pieces of SYNAPSE itself.
    Artifact,
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Key => "key",
            Self::Tool => "tool",
            Self::Document => "document",
            Self::Consumable => "consumable",
            Self::Artifact => "artifact",
        };
        f.write_str(s)
    }
}

/// A carried item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Display name, unique within an inventory (case-insensitive).
    pub name: String,
    /// Category tag.
    pub category: ItemCategory,
    /// Weight counted against the inventory capacity.
    pub weight: u32,
}

impl Item {
    /// Create an item.
    pub fn new(name: impl Into<String>, category: ItemCategory, weight: u32) -> Self {
        Self {
            name: name.into(),
            category,
            weight,
        }
    }
}

/// The global set of objects that can be picked up.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: HashMap<String, Item>,
}

impl ItemCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a takeable item.
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.insert(item.name.to_lowercase(), item);
        self
    }

    /// Look up an item by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items.get(&name.trim().to_lowercase())
    }

    /// Whether the object can be taken.
    pub fn is_takeable(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Default weight capacity of an inventory.
pub const DEFAULT_CAPACITY: u32 = 10;

/// The player's carried items, in pickup order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
    capacity: u32,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl Inventory {
    /// Create an empty inventory with a weight capacity.
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    /// Weight capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Sum of the carried items' weights.
    pub fn total_weight(&self) -> u32 {
        self.items.iter().map(|i| i.weight).sum()
    }

    /// Carried items, in pickup order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of carried items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is carried.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether an item with this name is carried (case-insensitive).
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get a carried item by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Item> {
        let name = name.trim();
        self.items.iter().find(|i| i.name.eq_ignore_ascii_case(name))
    }

    /// Whether any carried item has this category.
    pub fn has_category(&self, category: ItemCategory) -> bool {
        self.items.iter().any(|i| i.category == category)
    }

    /// Check whether `item` could be added without adding it.
    pub fn check_add(&self, item: &Item) -> CoreResult<()> {
        if self.contains(&item.name) {
            return Err(CoreError::AlreadyCarried(item.name.clone()));
        }
        if self.total_weight() + item.weight > self.capacity {
            return Err(CoreError::TooHeavy {
                item: item.name.clone(),
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Add an item, rejecting duplicates and overweight loads.
    pub fn add(&mut self, item: Item) -> CoreResult<()> {
        self.check_add(&item)?;
        self.items.push(item);
        Ok(())
    }

    /// Remove and return an item by name.
    pub fn remove(&mut self, name: &str) -> CoreResult<Item> {
        let name = name.trim();
        let pos = self
            .items
            .iter()
            .position(|i| i.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CoreError::NotCarried(name.to_string()))?;
        Ok(self.items.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn keycard() -> Item {
        Item::new("keycard", ItemCategory::Key, 1)
    }

    #[test]
    fn add_and_lookup_case_insensitive() {
        let mut inv = Inventory::default();
        inv.add(keycard()).unwrap();
        assert!(inv.contains("KeyCard"));
        assert!(inv.has_category(ItemCategory::Key));
        assert_eq!(inv.total_weight(), 1);
    }

    #[test]
    fn duplicates_rejected() {
        let mut inv = Inventory::default();
        inv.add(keycard()).unwrap();
        let err = inv.add(Item::new("KEYCARD", ItemCategory::Key, 1)).unwrap_err();
        assert_eq!(err, CoreError::AlreadyCarried("KEYCARD".to_string()));
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn capacity_enforced() {
        let mut inv = Inventory::with_capacity(5);
        inv.add(Item::new("crowbar", ItemCategory::Tool, 4)).unwrap();
        let err = inv.add(Item::new("flashlight", ItemCategory::Tool, 2)).unwrap_err();
        assert!(matches!(err, CoreError::TooHeavy { capacity: 5, .. }));
        inv.add(keycard()).unwrap();
        assert_eq!(inv.total_weight(), 5);
    }

    #[test]
    fn remove_returns_item() {
        let mut inv = Inventory::default();
        inv.add(keycard()).unwrap();
        let item = inv.remove("keycard").unwrap();
        assert_eq!(item.name, "keycard");
        assert!(inv.is_empty());
        assert!(inv.remove("keycard").is_err());
    }

    #[test]
    fn catalog_lookup() {
        let catalog = ItemCatalog::new().with_item(keycard());
        assert!(catalog.is_takeable("  Keycard "));
        assert!(!catalog.is_takeable("brochure"));
    }

    proptest! {
        #[test]
        fn never_holds_duplicate_names(names in proptest::collection::vec("[a-c]{1,2}", 0..30)) {
            let mut inv = Inventory::with_capacity(1000);
            for n in &names {
                let _ = inv.add(Item::new(n.clone(), ItemCategory::Tool, 1));
            }
            let mut seen = std::collections::HashSet::new();
            for item in inv.items() {
                prop_assert!(seen.insert(item.name.to_lowercase()));
            }
        }
    }
}
