//! Item (catalog entry) model and related types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A lendable catalog entry.
///
/// `available` and `borrower` always agree: `borrower` is `Some` exactly
/// when the item is out on loan, and holds the borrowing patron's display
/// name as recorded in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Caller-assigned identifier, unique within the catalog
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: String,
    /// False while the item is out on loan
    pub available: bool,
    /// Display name of the current borrower, if any
    pub borrower: Option<String>,
}

impl Item {
    pub fn new(id: i32, title: String, author: String, genre: String) -> Self {
        Self {
            id,
            title,
            author,
            genre,
            available: true,
            borrower: None,
        }
    }
}

/// Item creation request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewItem {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: String,
}
