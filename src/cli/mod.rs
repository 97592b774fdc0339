//! CLI module - Command-line interface for JobSwipe
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// JobSwipe - vacancy search proxy and career assistant backend
#[derive(Parser)]
#[command(name = "jobswipe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server (default)
    Serve,

    /// Run one proxied vacancy search and print the results
    #[command(alias = "s")]
    Search {
        /// Search text
        #[arg(required = true)]
        query: Vec<String>,
        /// Area (region) id on the recruiting platform
        #[arg(long)]
        area: Option<String>,
        /// Zero-based result page
        #[arg(long)]
        page: Option<u32>,
    },

    /// Write a default config.toml to the working directory
    #[command(alias = "init")]
    InitConfig,
}

pub use commands::*;
