//! Client commands - talk to a running registry server

use serde::Serialize;

use super::{Command, ModelsCommand};
use crate::client::RegistryClient;
use crate::domain::SigningKey;
use crate::infrastructure::logging;

/// Run a client subcommand against `api_url` and print the JSON result
pub async fn run(api_url: &str, command: Command) -> anyhow::Result<()> {
    logging::init_client_logging();

    let client = RegistryClient::new(api_url)?;

    match command {
        Command::Status => print(&client.status().await?),
        Command::Owned { address } => print(&client.get_user_models(&address).await?),
        Command::Models { command } => run_models(&client, command).await,
        Command::Serve | Command::Keygen | Command::Identity { .. } => {
            anyhow::bail!("not a client command")
        }
    }
}

async fn run_models(client: &RegistryClient, command: ModelsCommand) -> anyhow::Result<()> {
    match command {
        ModelsCommand::List => print(&client.list_models().await?),
        ModelsCommand::Get { model_id } => print(&client.get_model(&model_id).await?),
        ModelsCommand::Register {
            name,
            model_version,
            metadata_uri,
            private_key,
        } => {
            let key = SigningKey::parse(&private_key)?;
            print(
                &client
                    .register_model(&name, &model_version, &metadata_uri, &key)
                    .await?,
            )
        }
        ModelsCommand::Update {
            model_id,
            model_version,
            metadata_uri,
            private_key,
        } => {
            let key = SigningKey::parse(&private_key)?;
            print(
                &client
                    .update_model(&model_id, &model_version, &metadata_uri, &key)
                    .await?,
            )
        }
        ModelsCommand::Validate {
            model_id,
            reject,
            comments,
            private_key,
        } => {
            let key = SigningKey::parse(&private_key)?;
            print(
                &client
                    .validate_model(&model_id, !reject, &comments, &key)
                    .await?,
            )
        }
        ModelsCommand::Validations { model_id } => {
            print(&client.get_model_validations(&model_id).await?)
        }
    }
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
