use bookinv_client::{BookApi as _, BookClient};
use clap::Parser;

use super::{explain, Executor};

#[derive(Parser, Debug)]
pub struct ListCmd {
    #[arg(long, help = "Print full records as JSON")]
    json: bool,
}

impl Executor for ListCmd {
    async fn run(self, client: &BookClient) -> anyhow::Result<()> {
        let books = client.list_books().await.map_err(explain)?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&books)?);
            return Ok(());
        }
        if books.is_empty() {
            println!("No books");
        }
        for book in books {
            println!(
                "{}  {} by {} ({}, {})",
                book.id, book.title, book.author_name, book.publisher, book.published_date
            );
        }
        Ok(())
    }
}
