//! Data models

pub mod item;
pub mod patron;

pub use item::{Item, NewItem};
pub use patron::{NewPatron, Patron};
