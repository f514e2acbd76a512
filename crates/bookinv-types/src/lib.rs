pub mod api;
pub mod book;
pub mod config;
pub mod validation;

pub use api::{ApiResponse, Confirmation};
pub use book::{Book, BookId};
pub use validation::{BookFields, FieldError, NewBook, RuleContext, ValidationErrors};
