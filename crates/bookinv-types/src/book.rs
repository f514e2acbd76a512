use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::validation::BookFields;

/// Opaque book identifier, assigned by the repository on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new_random() -> Self {
        BookId(Uuid::new_v4())
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for BookId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(BookId)
    }
}

/// Stored book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author_name: String,
    pub author_age: i64,
    pub author_email: String,
    pub publisher: String,
    pub published_date: Date,
    pub overview: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Book {
    /// Editable values of this record, e.g. as a starting point for a full replace.
    pub fn fields(&self) -> BookFields {
        BookFields {
            title: Some(self.title.clone()),
            author_name: Some(self.author_name.clone()),
            author_age: Some(self.author_age),
            author_email: Some(self.author_email.clone()),
            publisher: Some(self.publisher.clone()),
            published_date: Some(self.published_date.to_string()),
            overview: Some(self.overview.clone()),
        }
    }
}
