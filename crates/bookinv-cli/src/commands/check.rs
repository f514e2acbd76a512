use bookinv_client::BookClient;
use bookinv_types::BookFields;
use clap::Parser;

use super::{explain, BookArgs, Executor};

#[derive(Parser, Debug)]
pub struct CheckCmd {
    #[command(flatten)]
    book: BookArgs,
}

impl Executor for CheckCmd {
    async fn run(self, _client: &BookClient) -> anyhow::Result<()> {
        let fields = self.book.apply(BookFields::default());
        fields
            .check()
            .map_err(|e| explain(bookinv_client::Error::Validation(e)))?;
        println!("Book is valid");
        Ok(())
    }
}
