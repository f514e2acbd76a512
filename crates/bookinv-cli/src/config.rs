use clap::{Parser, Subcommand};
use url::Url;

use bookinv_client::BookClient;

use crate::commands::{
    add::AddCmd, check::CheckCmd, delete::DeleteCmd, edit::EditCmd, list::ListCmd, show::ShowCmd,
    Executor,
};

#[derive(Parser)]
#[command(
    version,
    about,
    long_about = "CLI for bookinv - lists and manages books stored on bookinv server."
)]
pub struct CliConfig {
    #[arg(
        long,
        env = "BOOKINV_URL",
        default_value = "http://localhost:5000/api/",
        global = true,
        help = "Base URL of the API"
    )]
    pub url: Url,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List all books, newest first
    List(ListCmd),
    /// Show one book
    Show(ShowCmd),
    /// Add new book
    Add(AddCmd),
    /// Change existing book, fields not given keep their current values
    Edit(EditCmd),
    /// Delete book
    Delete(DeleteCmd),
    /// Validate book fields locally, without contacting server
    Check(CheckCmd),
}

impl Executor for Command {
    async fn run(self, client: &BookClient) -> anyhow::Result<()> {
        match self {
            Command::List(cmd) => cmd.run(client).await,
            Command::Show(cmd) => cmd.run(client).await,
            Command::Add(cmd) => cmd.run(client).await,
            Command::Edit(cmd) => cmd.run(client).await,
            Command::Delete(cmd) => cmd.run(client).await,
            Command::Check(cmd) => cmd.run(client).await,
        }
    }
}
