use anyhow::bail;
use bookinv_client::{BookApi as _, BookClient};
use clap::Parser;
use tokio::io::{AsyncBufReadExt as _, AsyncWriteExt as _, BufReader};

use super::{explain, parse_id, Executor};

#[derive(Parser, Debug)]
pub struct DeleteCmd {
    #[arg(help = "Book id")]
    id: String,
    #[arg(short, long, help = "Do not ask for confirmation")]
    yes: bool,
}

impl Executor for DeleteCmd {
    async fn run(self, client: &BookClient) -> anyhow::Result<()> {
        let id = parse_id(&self.id)?;
        let book = client.get_book(&id).await.map_err(explain)?;
        if !self.yes && !confirm(&format!("Delete \"{}\" by {}?", book.title, book.author_name)).await? {
            bail!("Delete cancelled");
        }
        client.delete_book(&id).await.map_err(explain)?;
        println!("Deleted book {id}");
        Ok(())
    }
}

async fn confirm(question: &str) -> anyhow::Result<bool> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("{question} [y/N] ").as_bytes())
        .await?;
    stdout.flush().await?;
    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
