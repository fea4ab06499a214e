//! # ciq-fetch
//!
//! Command-line front end for the GDS clientservice API. Runs one batched
//! query (any of the six function kinds) and prints the resolved result as
//! pretty JSON. Credentials come from `CIQ_USERNAME` / `CIQ_PASSWORD`
//! (a `.env` file is honored).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use lib_ciq::{CiqClient, CiqClientOptions, MemoryResponseCache, PropertyMap};

/// The GDS function kind to issue.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Function {
    /// Point-in-time data point.
    Gdsp,
    /// Point-in-time data point with a value variant.
    Gdspv,
    /// Time series over a date range.
    Gdst,
    /// Historical end-of-day values.
    Gdshe,
    /// Historical snapshot value.
    Gdshv,
    /// Grouped/list lookup.
    Gdsg,
}

/// CLI arguments for ciq-fetch.
#[derive(Parser)]
#[clap(
    name = "ciq-fetch",
    version = "0.1.0",
    author = "ckir",
    about = "Runs one batched Cap IQ GDS query and prints the result as JSON.",
    long_about = "Builds a batched clientservice request from identifiers, mnemonics and \
                  return keys, submits it with basic authentication, and prints the nested \
                  identifier -> return key -> value mapping as pretty JSON."
)]
struct Cli {
    /// GDS function kind.
    #[clap(long, value_enum, default_value = "gdsp")]
    function: Function,

    /// Security/entity identifiers, comma separated.
    #[clap(long, value_delimiter = ',', required = true)]
    identifiers: Vec<String>,

    /// Data-field mnemonics, comma separated.
    #[clap(long, value_delimiter = ',', required = true)]
    mnemonics: Vec<String>,

    /// Return keys, comma separated. Defaults to the mnemonics themselves.
    #[clap(long, value_delimiter = ',')]
    keys: Vec<String>,

    /// Range start for date-ranged kinds (e.g. 05/23/2017).
    #[clap(long)]
    start_date: Option<String>,

    /// Range end for date-ranged kinds.
    #[clap(long)]
    end_date: Option<String>,

    /// Sampling frequency for GDST (e.g. D, W, M).
    #[clap(long)]
    frequency: Option<String>,

    /// Disable TLS certificate verification.
    #[clap(long)]
    insecure: bool,

    /// Log raw response bodies at debug level.
    #[clap(long)]
    debug: bool,

    /// Cache identical requests in memory for the lifetime of the process.
    #[clap(long)]
    cache: bool,

    /// Track today's request count in this file.
    #[clap(long)]
    count_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env files before anything else
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let username =
        std::env::var("CIQ_USERNAME").context("CIQ_USERNAME is not set (see .env support)")?;
    let password =
        std::env::var("CIQ_PASSWORD").context("CIQ_PASSWORD is not set (see .env support)")?;

    let mut client = CiqClient::with_options(
        &username,
        &password,
        CiqClientOptions {
            verify: !args.insecure,
            debug: args.debug,
            ..CiqClientOptions::default()
        },
    )?;
    if args.cache {
        client = client.with_response_cache(Arc::new(MemoryResponseCache::new()));
    }
    if let Some(path) = &args.count_file {
        client = client.with_request_counter(path)?;
    }

    let identifiers: Vec<&str> = args.identifiers.iter().map(String::as_str).collect();
    let mnemonics: Vec<&str> = args.mnemonics.iter().map(String::as_str).collect();
    let keys: Vec<&str> = if args.keys.is_empty() {
        mnemonics.clone()
    } else {
        args.keys.iter().map(String::as_str).collect()
    };
    let properties: Option<&[PropertyMap]> = None;
    let start_date = args.start_date.as_deref();
    let end_date = args.end_date.as_deref();
    let frequency = args.frequency.as_deref();

    let result = match args.function {
        Function::Gdsp => {
            client
                .gdsp(&identifiers, &mnemonics, &keys, properties)
                .await?
        }
        Function::Gdspv => {
            client
                .gdspv(&identifiers, &mnemonics, &keys, properties)
                .await?
        }
        Function::Gdst => {
            client
                .gdst(
                    &identifiers,
                    &mnemonics,
                    &keys,
                    start_date,
                    end_date,
                    frequency,
                    properties,
                )
                .await?
        }
        Function::Gdshe => {
            client
                .gdshe(
                    &identifiers,
                    &mnemonics,
                    &keys,
                    start_date,
                    end_date,
                    properties,
                )
                .await?
        }
        Function::Gdshv => {
            client
                .gdshv(
                    &identifiers,
                    &mnemonics,
                    &keys,
                    start_date,
                    end_date,
                    properties,
                )
                .await?
        }
        Function::Gdsg => {
            client
                .gdsg(&identifiers, &mnemonics, &keys, properties)
                .await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(count) = client.request_count() {
        tracing::info!(count, "elementary queries issued today");
    }

    Ok(())
}
