//! Client side of the book inventory API.
//!
//! [`BookClient`] speaks the REST contract and applies the shared validation
//! rules before anything is sent, [`BookCatalog`] keeps a local list of books
//! in sync with the server.

pub mod catalog;
pub mod client;
pub mod error;

pub use catalog::BookCatalog;
pub use client::{BookApi, BookClient};
pub use error::{Error, Result};
