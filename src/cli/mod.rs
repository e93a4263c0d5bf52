//! CLI module for the model registry
//!
//! Provides subcommands for:
//! - `serve`: run the HTTP server
//! - `keygen` / `identity`: manage signing keys locally
//! - `status`, `models`, `owned`: talk to a running server

pub mod client;
pub mod keys;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::client::DEFAULT_API_URL;

/// Model Registry - register, update and validate ML model metadata
#[derive(Parser)]
#[command(name = "model-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the registry API used by client commands
    #[arg(long, global = true, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the registry HTTP server
    Serve,

    /// Generate a random signing key and print its identity
    Keygen,

    /// Print the identity controlled by a signing key
    Identity {
        #[arg(long)]
        private_key: String,
    },

    /// Show whether the server's registry backend is ready
    Status,

    /// Work with registered models
    Models {
        #[command(subcommand)]
        command: ModelsCommand,
    },

    /// List the model IDs registered by an address
    Owned { address: String },
}

#[derive(Subcommand)]
pub enum ModelsCommand {
    /// List every registered model
    List,

    /// Show one model
    Get { model_id: String },

    /// Register a new model
    Register {
        name: String,
        #[arg(value_name = "VERSION")]
        model_version: String,
        metadata_uri: String,
        #[arg(long)]
        private_key: String,
    },

    /// Replace a model's version and metadata URI
    Update {
        model_id: String,
        #[arg(value_name = "VERSION")]
        model_version: String,
        metadata_uri: String,
        #[arg(long)]
        private_key: String,
    },

    /// Submit a validation for a model
    Validate {
        model_id: String,
        /// Record the model as invalid
        #[arg(long)]
        reject: bool,
        #[arg(long, default_value = "")]
        comments: String,
        #[arg(long)]
        private_key: String,
    },

    /// Show a model's validation history
    Validations { model_id: String },
}
