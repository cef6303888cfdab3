//! Roster of registered patrons.

use indexmap::IndexMap;

use crate::{
    error::{AppError, AppResult},
    models::Patron,
};

/// Owns the set of patrons, keyed by identifier, in insertion order.
///
/// The per-patron borrowed-set is mutated only through the lending ledger;
/// the mutators here are crate-private for that reason.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    patrons: IndexMap<i32, Patron>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new patron. Fails when the identifier is already taken.
    pub fn insert(&mut self, patron: Patron) -> AppResult<&Patron> {
        if self.patrons.contains_key(&patron.id) {
            return Err(AppError::DuplicateIdentifier(format!(
                "patron {}",
                patron.id
            )));
        }
        let id = patron.id;
        self.patrons.insert(id, patron);
        Ok(&self.patrons[&id])
    }

    pub fn get(&self, id: i32) -> Option<&Patron> {
        self.patrons.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Patron> {
        self.patrons.values()
    }

    pub fn len(&self) -> usize {
        self.patrons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patrons.is_empty()
    }

    /// Add an item to a patron's borrowed-set. Ledger protocol only.
    pub(crate) fn record_borrow(&mut self, patron_id: i32, item_id: i32) {
        if let Some(patron) = self.patrons.get_mut(&patron_id) {
            if !patron.borrowed.contains(&item_id) {
                patron.borrowed.push(item_id);
            }
        }
    }

    /// Remove an item from a patron's borrowed-set. Ledger protocol only.
    pub(crate) fn record_return(&mut self, patron_id: i32, item_id: i32) {
        if let Some(patron) = self.patrons.get_mut(&patron_id) {
            patron.borrowed.retain(|&id| id != item_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_id_rejected() {
        let mut roster = Roster::new();
        roster
            .insert(Patron::new(7, "Amy".into(), "a@x.com".into()))
            .unwrap();
        let err = roster
            .insert(Patron::new(7, "Bob".into(), "b@x.com".into()))
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateIdentifier(_)));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_record_borrow_and_return() {
        let mut roster = Roster::new();
        roster
            .insert(Patron::new(7, "Amy".into(), "a@x.com".into()))
            .unwrap();

        roster.record_borrow(7, 1);
        roster.record_borrow(7, 2);
        roster.record_borrow(7, 1); // no duplicate entry
        assert_eq!(roster.get(7).unwrap().borrowed, vec![1, 2]);

        roster.record_return(7, 1);
        assert_eq!(roster.get(7).unwrap().borrowed, vec![2]);
        roster.record_return(7, 99); // absent id is a no-op
        assert_eq!(roster.get(7).unwrap().borrowed, vec![2]);
    }
}
