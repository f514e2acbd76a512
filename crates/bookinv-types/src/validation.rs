//! Validation rules for book records.
//!
//! The rules are declared once, on [`BookFields`], and are evaluated by the
//! repository before every write and by clients before they submit a form.

use std::fmt::{self, Display};

use garde::Validate;
use serde::{Deserialize, Serialize};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    UtcOffset,
};

/// Context for rules which depend on the environment, currently only the
/// current day used to reject publication dates in the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleContext {
    pub today: Date,
}

impl RuleContext {
    pub fn with_today(today: Date) -> Self {
        RuleContext { today }
    }
}

impl Default for RuleContext {
    /// Reads the wall clock, so a context should be created per validation.
    fn default() -> Self {
        RuleContext {
            today: OffsetDateTime::now_utc().date(),
        }
    }
}

/// Candidate values for a book, as submitted by a client.
///
/// All fields are optional on the wire, so a missing value is reported as a
/// failure of that field rather than as an unreadable request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[garde(context(RuleContext))]
pub struct BookFields {
    #[garde(
        required,
        length(chars, min = 1, max = 200),
        pattern(r#"^[a-zA-Z0-9\s\-.,!?'"():]+$"#)
    )]
    pub title: Option<String>,

    #[garde(
        required,
        length(chars, min = 2, max = 100),
        pattern(r"^[a-zA-Z\s\-.']+$")
    )]
    pub author_name: Option<String>,

    #[garde(required, range(min = 1, max = 150))]
    pub author_age: Option<i64>,

    #[garde(required, email, pattern(r"^[^@\s]+@[^@\s]+\.[^@\s.]{2,}$"))]
    pub author_email: Option<String>,

    #[garde(required, length(chars, min = 1, max = 100))]
    pub publisher: Option<String>,

    #[garde(required, custom(published_not_in_future))]
    pub published_date: Option<String>,

    #[garde(required, length(chars, min = 10, max = 1000))]
    pub overview: Option<String>,
}

/// Book values which passed validation, normalized for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author_name: String,
    pub author_age: i64,
    /// Always lowercase
    pub author_email: String,
    pub publisher: String,
    pub published_date: Date,
    pub overview: String,
}

/// Accepts plain `YYYY-MM-DD` as well as RFC 3339 timestamps, which are
/// reduced to their UTC calendar date.
pub fn parse_published_date(value: &str) -> Option<Date> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .ok()
        .or_else(|| {
            OffsetDateTime::parse(value, &Rfc3339)
                .ok()
                .map(|dt| dt.to_offset(UtcOffset::UTC).date())
        })
}

pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

const INVALID_DATE: &str = "Please provide a valid date";

fn published_not_in_future(value: &Option<String>, ctx: &RuleContext) -> garde::Result {
    let Some(value) = value else {
        return Ok(());
    };
    match parse_published_date(value) {
        None => Err(garde::Error::new(INVALID_DATE)),
        Some(date) if date > ctx.today => Err(garde::Error::new(
            "Published date cannot be in the future",
        )),
        Some(_) => Ok(()),
    }
}

impl BookFields {
    /// Checks all rules against the current day, without converting anything.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        self.check_with(&RuleContext::default())
    }

    pub fn check_with(&self, ctx: &RuleContext) -> Result<(), ValidationErrors> {
        self.validate_with(ctx).map_err(ValidationErrors::from)
    }

    pub fn into_new_book(self) -> Result<NewBook, ValidationErrors> {
        self.into_new_book_with(&RuleContext::default())
    }

    pub fn into_new_book_with(self, ctx: &RuleContext) -> Result<NewBook, ValidationErrors> {
        self.check_with(ctx)?;
        let published_date = self
            .published_date
            .as_deref()
            .and_then(parse_published_date)
            .ok_or_else(|| ValidationErrors::single("published_date", INVALID_DATE))?;

        Ok(NewBook {
            title: required(self.title, "title")?,
            author_name: required(self.author_name, "author_name")?,
            author_age: required(self.author_age, "author_age")?,
            author_email: normalize_email(&required(self.author_email, "author_email")?),
            publisher: required(self.publisher, "publisher")?,
            published_date,
            overview: required(self.overview, "overview")?,
        })
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ValidationErrors> {
    value.ok_or_else(|| {
        let message = readable_message(field, Rule::Required).unwrap_or("is required");
        ValidationErrors::single(field, message)
    })
}

/// One failed rule, attributed to the (camelCase) name of the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        FieldError {
            field: camel_case(field),
            message: message.into(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Field-indexed failures in the order the fields are declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        ValidationErrors(vec![FieldError::new(field, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Distinct field names, in reporting order.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::with_capacity(self.0.len());
        for e in &self.0 {
            if !fields.contains(&e.field.as_str()) {
                fields.push(e.field.as_str());
            }
        }
        fields
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Declaration order of [`BookFields`], used for reporting.
const FIELD_ORDER: [&str; 7] = [
    "title",
    "author_name",
    "author_age",
    "author_email",
    "publisher",
    "published_date",
    "overview",
];

/// Kind of the garde rule which produced an error, recognized by its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Required,
    Length,
    Pattern,
    Email,
    Range,
    Custom,
}

impl Rule {
    fn of(message: &str) -> Self {
        if message == "not set" {
            Rule::Required
        } else if message.starts_with("length is") {
            Rule::Length
        } else if message.starts_with("does not match pattern") {
            Rule::Pattern
        } else if message.starts_with("not a valid email") {
            Rule::Email
        } else if message.starts_with("lower than") || message.starts_with("greater than") {
            Rule::Range
        } else {
            Rule::Custom
        }
    }
}

fn readable_message(field: &str, rule: Rule) -> Option<&'static str> {
    let message = match (field, rule) {
        ("title", Rule::Required) => "Title is required",
        ("title", Rule::Length) => "Title must be between 1 and 200 characters",
        ("title", Rule::Pattern) => "Title contains invalid characters",
        ("author_name", Rule::Required) => "Author name is required",
        ("author_name", Rule::Length) => "Author name must be between 2 and 100 characters",
        ("author_name", Rule::Pattern) => {
            "Author name should only contain letters, spaces, hyphens, periods, and apostrophes"
        }
        ("author_age", Rule::Required) => "Author age is required",
        ("author_age", Rule::Range) => "Author age must be a number between 1 and 150",
        ("author_email", Rule::Required) => "Author email is required",
        ("author_email", Rule::Email | Rule::Pattern) => "Please provide a valid email address",
        ("publisher", Rule::Required) => "Publisher is required",
        ("publisher", Rule::Length) => "Publisher must be between 1 and 100 characters",
        ("published_date", Rule::Required) => "Published date is required",
        ("overview", Rule::Required) => "Book overview is required",
        ("overview", Rule::Length) => "Overview must be between 10 and 1000 characters",
        _ => return None,
    };
    Some(message)
}

impl From<garde::Report> for ValidationErrors {
    fn from(report: garde::Report) -> Self {
        let mut raw: Vec<(String, &str)> = report
            .iter()
            .map(|(path, error)| (path.to_string(), error.message()))
            .collect();
        // garde reports by path, we report by declaration
        raw.sort_by_key(|(field, _)| {
            FIELD_ORDER
                .iter()
                .position(|f| *f == field.as_str())
                .unwrap_or(FIELD_ORDER.len())
        });

        let mut errors: Vec<FieldError> = Vec::with_capacity(raw.len());
        for (field, message) in raw {
            let message = readable_message(&field, Rule::of(message)).unwrap_or(message);
            let error = FieldError::new(&field, message);
            if !errors.contains(&error) {
                errors.push(error);
            }
        }
        ValidationErrors(errors)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
