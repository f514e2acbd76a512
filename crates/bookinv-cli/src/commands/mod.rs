use anyhow::anyhow;
use bookinv_client::{BookClient, Error};
use bookinv_types::{Book, BookFields, BookId};
use clap::Args;

pub mod add;
pub mod check;
pub mod delete;
pub mod edit;
pub mod list;
pub mod show;

#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn run(self, client: &BookClient) -> anyhow::Result<()>;
}

#[derive(Args, Debug, Default)]
pub struct BookArgs {
    #[arg(long, help = "Title, 1-200 characters")]
    title: Option<String>,

    #[arg(long, help = "Author full name, 2-100 letters, spaces, hyphens, dots or apostrophes")]
    author_name: Option<String>,

    #[arg(long, help = "Author age in years, 1-150")]
    author_age: Option<i64>,

    #[arg(long, help = "Author email, must be unique among books")]
    author_email: Option<String>,

    #[arg(long, help = "Publisher name, 1-100 characters")]
    publisher: Option<String>,

    #[arg(long, help = "Publication date as YYYY-MM-DD, cannot be in the future")]
    published_date: Option<String>,

    #[arg(long, help = "Short overview of the book, 10-1000 characters")]
    overview: Option<String>,
}

impl BookArgs {
    /// Values given on command line replace those in `fields`
    pub fn apply(self, mut fields: BookFields) -> BookFields {
        fn set<T>(target: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *target = value;
            }
        }
        set(&mut fields.title, self.title);
        set(&mut fields.author_name, self.author_name);
        set(&mut fields.author_age, self.author_age);
        set(&mut fields.author_email, self.author_email);
        set(&mut fields.publisher, self.publisher);
        set(&mut fields.published_date, self.published_date);
        set(&mut fields.overview, self.overview);
        fields
    }
}

pub fn parse_id(id: &str) -> anyhow::Result<BookId> {
    id.parse().map_err(|_| anyhow!("Book {id} not found"))
}

pub fn print_book(book: &Book) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(book)?);
    Ok(())
}

/// Makes validation failures readable, one field per line
pub fn explain(error: Error) -> anyhow::Error {
    match error {
        Error::Validation(errors) => {
            let lines: Vec<String> = errors.iter().map(|e| format!("  {e}")).collect();
            anyhow!("Validation failed:\n{}", lines.join("\n"))
        }
        other => other.into(),
    }
}
