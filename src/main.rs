use clap::Parser;
use model_registry::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Keygen => cli::keys::keygen(),
        Command::Identity { private_key } => cli::keys::identity(&private_key),
        command => cli::client::run(&cli.api_url, command).await,
    }
}
