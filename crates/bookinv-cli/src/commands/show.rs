use bookinv_client::{BookApi as _, BookClient};
use clap::Parser;

use super::{explain, parse_id, print_book, Executor};

#[derive(Parser, Debug)]
pub struct ShowCmd {
    #[arg(help = "Book id")]
    id: String,
}

impl Executor for ShowCmd {
    async fn run(self, client: &BookClient) -> anyhow::Result<()> {
        let id = parse_id(&self.id)?;
        let book = client.get_book(&id).await.map_err(explain)?;
        print_book(&book)
    }
}
