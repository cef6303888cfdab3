//! Durable storage for the library records

pub mod codec;

pub use codec::PersistenceCodec;
