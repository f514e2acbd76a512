use bookinv_client::{BookApi as _, BookClient};
use bookinv_types::BookFields;
use clap::Parser;
use tracing::info;

use super::{explain, print_book, BookArgs, Executor};

#[derive(Parser, Debug)]
pub struct AddCmd {
    #[command(flatten)]
    book: BookArgs,
}

impl Executor for AddCmd {
    async fn run(self, client: &BookClient) -> anyhow::Result<()> {
        let fields = self.book.apply(BookFields::default());
        let book = client.create_book(&fields).await.map_err(explain)?;
        info!("Created book {}", book.id);
        print_book(&book)
    }
}
