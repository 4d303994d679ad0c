mod cli;
mod config;
mod input;
mod output;

use std::fs;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use serde_json::Value;

use fhirsub_client::{BundleOptions, Endpoint, HttpTransport, Submitter, assemble_all};

use cli::{Cli, Commands, ConfigCommands};
use output::{print_error, print_json, print_success};

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let profile = &cli.profile;

    match &cli.command {
        Commands::Submit(args) => {
            let server = config::resolve_server(&cli.server, profile)?;
            let subjects = input::read_subjects(args.file.as_deref())?;
            let endpoint = Endpoint::new(&server)?;
            let mut submitter = Submitter::new(HttpTransport::new(), endpoint);
            if let Some(concurrency) = args.concurrency {
                submitter = submitter.with_concurrency(concurrency);
            }
            let graph = Arc::new(submitter).submit_all(subjects).await;
            print_json(&graph.to_json())?;
        }
        Commands::Bundle(args) => {
            let subjects = input::read_subjects(args.file.as_deref())?;
            let options = BundleOptions {
                include_empty_entries: !args.skip_empty,
            };
            let bundles = Value::Array(assemble_all(&subjects, &options)?);
            match &args.out {
                Some(path) => {
                    fs::write(path, serde_json::to_string_pretty(&bundles)?)?;
                    print_success(&format!("wrote bundles to {path}"));
                }
                None => print_json(&bundles)?,
            }
        }
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => {
                let cfg = config::load_profile(profile)?;
                println!("{}: {}", "Profile".cyan(), profile);
                println!(
                    "{}: {}",
                    "Server".cyan(),
                    cfg.server.as_deref().unwrap_or("(not set)")
                );
            }
            ConfigCommands::Set(set_args) => {
                let mut cfg = config::load_profile(profile)?;
                match set_args.key.as_str() {
                    "server" => cfg.server = Some(set_args.value.clone()),
                    other => anyhow::bail!("Unknown config key: {other}. Valid keys: server"),
                }
                config::save_profile(profile, &cfg)?;
                print_success(&format!("Set {} = {}", set_args.key, set_args.value));
            }
        },
    }

    Ok(())
}
