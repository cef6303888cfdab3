//! Lending ledger: the active-loan index and its transition protocol.
//!
//! The loan relation is held in three places at once (item flag + borrower,
//! patron borrowed-set, ledger map) so that "is this item available", "what
//! has this patron borrowed" and "who has this item" are all O(1). The
//! ledger owns the only two transitions that touch that state, and advances
//! all three projections together.

use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    store::{catalog::Catalog, roster::Roster},
};

/// Reverse index from item identifier to its current borrower.
#[derive(Debug, Clone, Default)]
pub struct LendingLedger {
    active: HashMap<i32, i32>,
}

impl LendingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lend an item to a patron.
    ///
    /// Resolves both parties, rejects unavailable items, then applies the
    /// four-way update (item flag, item borrower, ledger entry, patron
    /// borrowed-set) in one step. There is no per-patron borrow limit.
    pub fn borrow(
        &mut self,
        catalog: &mut Catalog,
        roster: &mut Roster,
        patron_id: i32,
        item_id: i32,
    ) -> AppResult<()> {
        let patron_name = roster
            .get(patron_id)
            .ok_or(AppError::PatronNotFound(patron_id))?
            .name
            .clone();
        let item = catalog
            .get_mut(item_id)
            .ok_or_else(|| AppError::ItemNotFound(format!("id {}", item_id)))?;

        if !item.available {
            return Err(AppError::ItemUnavailable(item_id));
        }

        item.available = false;
        item.borrower = Some(patron_name);
        self.active.insert(item_id, patron_id);
        roster.record_borrow(patron_id, item_id);

        tracing::debug!(patron_id, item_id, "loan opened");
        Ok(())
    }

    /// Return an item previously lent to a patron.
    ///
    /// The ledger entry must exist and name the requesting patron; a missing
    /// entry and an entry held by someone else both come back as
    /// `NotBorrowedByPatron`, distinguished by the `held_by_other` flag.
    pub fn give_back(
        &mut self,
        catalog: &mut Catalog,
        roster: &mut Roster,
        patron_id: i32,
        item_id: i32,
    ) -> AppResult<()> {
        if roster.get(patron_id).is_none() {
            return Err(AppError::PatronNotFound(patron_id));
        }
        if catalog.get(item_id).is_none() {
            return Err(AppError::ItemNotFound(format!("id {}", item_id)));
        }

        match self.active.get(&item_id) {
            Some(&holder) if holder == patron_id => {}
            other => {
                return Err(AppError::NotBorrowedByPatron {
                    patron_id,
                    item_id,
                    held_by_other: other.is_some(),
                })
            }
        }

        // Resolution above guarantees the item exists.
        if let Some(item) = catalog.get_mut(item_id) {
            item.available = true;
            item.borrower = None;
        }
        self.active.remove(&item_id);
        roster.record_return(patron_id, item_id);

        tracing::debug!(patron_id, item_id, "loan closed");
        Ok(())
    }

    /// Pure query: does this patron currently hold this item?
    pub fn is_borrowed_by(&self, patron_id: i32, item_id: i32) -> bool {
        self.active.get(&item_id) == Some(&patron_id)
    }

    pub fn borrower_of(&self, item_id: i32) -> Option<i32> {
        self.active.get(&item_id).copied()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Reconstruct the ledger from loaded state.
    ///
    /// The patron borrowed-sets are the authoritative projection; item
    /// availability flags must agree with them, and an item may appear in at
    /// most one set. Disagreement is a load-time integrity error. Borrower
    /// names on items are re-derived from the roster rather than trusted.
    pub fn rebuild(catalog: &mut Catalog, roster: &Roster) -> AppResult<Self> {
        let mut ledger = Self::new();

        for patron in roster.iter() {
            for &item_id in &patron.borrowed {
                if let Some(holder) = ledger.active.insert(item_id, patron.id) {
                    return Err(AppError::CorruptRecord {
                        stream: "patrons",
                        details: format!(
                            "item {} listed as borrowed by both patron {} and patron {}",
                            item_id, holder, patron.id
                        ),
                    });
                }
                match catalog.get_mut(item_id) {
                    Some(item) if item.available => {
                        return Err(AppError::CorruptRecord {
                            stream: "items",
                            details: format!(
                                "item {} is flagged available but borrowed by patron {}",
                                item_id, patron.id
                            ),
                        });
                    }
                    Some(item) => {
                        item.borrower = Some(patron.name.clone());
                    }
                    // Dangling references are repaired by the codec before
                    // the ledger is rebuilt.
                    None => {
                        return Err(AppError::Internal(format!(
                            "unrepaired dangling reference to item {}",
                            item_id
                        )));
                    }
                }
            }
        }

        for item in catalog.iter() {
            if !item.available && !ledger.active.contains_key(&item.id) {
                return Err(AppError::CorruptRecord {
                    stream: "items",
                    details: format!(
                        "item {} is flagged unavailable but no patron has borrowed it",
                        item.id
                    ),
                });
            }
        }

        Ok(ledger)
    }
}
