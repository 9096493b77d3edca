//! CLI module for Tutor RAG
//!
//! Provides subcommands:
//! - `serve`: HTTP API server
//! - `ask`: answer one question from the terminal
//! - `warmup`: pre-compute embeddings for the configured warmup queries

pub mod ask;
pub mod serve;
pub mod warmup;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Tutor RAG - answers study questions from indexed course material
#[derive(Parser)]
#[command(name = "tutor-rag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Answer a single question and exit
    Ask(ask::AskArgs),

    /// Embed the warmup queries and persist the cache
    Warmup,
}

/// Read `.env`, layered configuration and install logging
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}
