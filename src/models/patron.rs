//! Patron (registered borrower) model and related types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A registered person eligible to borrow items.
///
/// `borrowed` holds item identifiers, not copies of items; an identifier
/// appears in at most one patron's list at a time. The list is kept in
/// borrow order, which is also the order persisted to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Patron {
    /// Caller-assigned identifier, unique within the roster
    pub id: i32,
    pub name: String,
    pub contact: String,
    /// Identifiers of items currently out on loan to this patron
    pub borrowed: Vec<i32>,
}

impl Patron {
    pub fn new(id: i32, name: String, contact: String) -> Self {
        Self {
            id,
            name,
            contact,
            borrowed: Vec::new(),
        }
    }

    pub fn has_borrowed(&self, item_id: i32) -> bool {
        self.borrowed.contains(&item_id)
    }
}

/// Patron creation request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewPatron {
    pub id: i32,
    pub name: String,
    pub contact: String,
}
