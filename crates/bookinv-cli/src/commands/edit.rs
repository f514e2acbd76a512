use bookinv_client::{BookApi as _, BookClient};
use clap::Parser;
use tracing::info;

use super::{explain, parse_id, print_book, BookArgs, Executor};

#[derive(Parser, Debug)]
pub struct EditCmd {
    #[arg(help = "Book id")]
    id: String,
    #[command(flatten)]
    book: BookArgs,
}

impl Executor for EditCmd {
    async fn run(self, client: &BookClient) -> anyhow::Result<()> {
        let id = parse_id(&self.id)?;
        let current = client.get_book(&id).await.map_err(explain)?;
        let fields = self.book.apply(current.fields());
        let book = client.update_book(&id, &fields).await.map_err(explain)?;
        info!("Updated book {}", book.id);
        print_book(&book)
    }
}
