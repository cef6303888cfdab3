//! API handlers for the Liber REST endpoints

pub mod health;
pub mod items;
pub mod loans;
pub mod openapi;
pub mod patrons;
