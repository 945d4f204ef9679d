use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "grade-predictor")]
#[command(about = "Predict a student's grade from study hours, attendance and previous score", long_about = None)]
pub struct Cli {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the interactive predictor page and JSON API
    Serve {
        #[command(flatten)]
        server: ServerConfig,
    },
    /// Predict a single grade
    Predict {
        #[arg(long)]
        hours: f64,
        #[arg(long)]
        attendance: f64,
        #[arg(long)]
        previous: f64,
        #[arg(long)]
        json: bool,
    },
    /// Predict grades for every student in a CSV file
    Batch {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServerConfig {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, default_value_t = 8080)]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
