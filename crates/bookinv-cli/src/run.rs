use crate::{commands::Executor as _, config::CliConfig};
use anyhow::Result;
use bookinv_client::BookClient;

pub async fn run(config: CliConfig) -> Result<()> {
    let client = BookClient::new(config.url);
    config.command.run(&client).await
}
