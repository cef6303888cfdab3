//! Catalog of lendable items.

use indexmap::IndexMap;

use crate::{
    error::{AppError, AppResult},
    models::Item,
};

/// Owns the set of items, keyed by identifier, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: IndexMap<i32, Item>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new item. Fails when the identifier is already taken.
    pub fn insert(&mut self, item: Item) -> AppResult<&Item> {
        if self.items.contains_key(&item.id) {
            return Err(AppError::DuplicateIdentifier(format!("item {}", item.id)));
        }
        let id = item.id;
        self.items.insert(id, item);
        Ok(&self.items[&id])
    }

    pub fn get(&self, id: i32) -> Option<&Item> {
        self.items.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: i32) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    /// First item whose title matches, case-insensitively, in insertion
    /// order. Titles are not unique; later duplicates are not reachable
    /// through this lookup.
    pub fn find_by_title(&self, title: &str) -> Option<&Item> {
        let wanted = title.to_lowercase();
        self.items
            .values()
            .find(|item| item.title.to_lowercase() == wanted)
    }

    /// Same semantics as [`find_by_title`](Self::find_by_title), over the
    /// author field.
    pub fn find_by_author(&self, author: &str) -> Option<&Item> {
        let wanted = author.to_lowercase();
        self.items
            .values()
            .find(|item| item.author.to_lowercase() == wanted)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .insert(Item::new(1, "Dune".into(), "Herbert".into(), "SciFi".into()))
            .unwrap();
        catalog
            .insert(Item::new(2, "Emma".into(), "Austen".into(), "Classic".into()))
            .unwrap();
        catalog
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut catalog = sample();
        let err = catalog
            .insert(Item::new(1, "Other".into(), "X".into(), "Y".into()))
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateIdentifier(_)));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_title_lookup_is_case_insensitive() {
        let catalog = sample();
        assert_eq!(catalog.find_by_title("dUNe").unwrap().id, 1);
        assert!(catalog.find_by_title("Dune II").is_none());
    }

    #[test]
    fn test_title_lookup_returns_first_in_insertion_order() {
        let mut catalog = sample();
        catalog
            .insert(Item::new(3, "Dune".into(), "Villeneuve".into(), "Film".into()))
            .unwrap();
        assert_eq!(catalog.find_by_title("Dune").unwrap().id, 1);
    }

    #[test]
    fn test_author_lookup() {
        let catalog = sample();
        assert_eq!(catalog.find_by_author("AUSTEN").unwrap().id, 2);
        assert!(catalog.find_by_author("Tolkien").is_none());
    }

    #[test]
    fn test_iteration_preserves_insertion_order() {
        let catalog = sample();
        let ids: Vec<i32> = catalog.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
