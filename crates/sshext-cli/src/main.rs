//! sshext — inspect OpenSSH host key rotation messages.
//!
//! Builds `hostkeys-00@openssh.com` announcements from host key files,
//! answers `hostkeys-prove-00@openssh.com` challenges the way a server would,
//! and verifies proof replies the way a client would.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

/// sshext — OpenSSH host key rotation toolkit
#[derive(Parser)]
#[command(name = "sshext", version, about = "Inspect and answer OpenSSH host key rotation requests")]
struct Cli {
    /// Config file path
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Host private key file (repeatable; overrides config)
    #[arg(short = 'k', long = "key", global = true)]
    keys: Vec<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the hostkeys-00 announcement for the configured host keys
    Announce,

    /// List the keys in a hostkeys-00 announcement payload
    Inspect {
        /// Announcement payload (hex)
        payload: String,
    },

    /// Answer a hostkeys-prove-00 challenge with the configured host keys
    Prove {
        /// Session identifier (hex)
        #[arg(long)]
        session_id: String,
        /// Challenge payload (hex)
        challenge: String,
    },

    /// Verify a hostkeys-prove-00 reply against public key files
    Verify {
        /// Session identifier (hex)
        #[arg(long)]
        session_id: String,
        /// Public key file, in challenge order (repeatable)
        #[arg(short = 'p', long = "pub", required = true)]
        public_keys: Vec<PathBuf>,
        /// Reply payload (hex)
        reply: String,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing.
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("sshext=debug,sshext_cli=debug,sshext_core=debug")
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("sshext=warn,sshext_cli=warn,sshext_core=warn")
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let config_path = cli.config.clone().unwrap_or_else(config::default_path);
    let cfg = match config::Config::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e:#}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Announce => cfg
            .rotation_key_paths(&cli.keys)
            .and_then(|paths| commands::announce::run(&paths, cli.json)),
        Command::Inspect { payload } => commands::inspect::run(&payload, cli.json),
        Command::Prove {
            session_id,
            challenge,
        } => cfg
            .rotation_key_paths(&cli.keys)
            .and_then(|paths| commands::prove::run(&paths, &session_id, &challenge, cli.json)),
        Command::Verify {
            session_id,
            public_keys,
            reply,
        } => commands::verify::run(&public_keys, &session_id, &reply, cli.json),
    };

    if let Err(e) = result {
        error!("{e:#}");
        std::process::exit(1);
    }
}
