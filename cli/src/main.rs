// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # VELA CLI
//!
//! Entry point for the `vela` binary. Parses arguments, initializes
//! logging, and drives the client library: generate a funding keypair,
//! query balances, derive program-controlled addresses, transfer units,
//! and reconcile submissions the network never confirmed.
//!
//! Command output meant for scripts (addresses, identifiers, URLs) goes to
//! stdout; diagnostics go to stderr via `tracing`.

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use vela_client::address::{derive, Address};
use vela_client::cache::AddressCache;
use vela_client::crypto::{read_keypair_file, write_keypair_file, VelaKeypair};
use vela_client::explorer::Explorer;
use vela_client::message::compile;
use vela_client::ops;
use vela_client::rpc::{submit, Endpoint, HttpEndpoint, SubmissionOutcome, UnitStatus};
use vela_client::unit::{assemble, UnitId};

use cli::{Commands, VelaCli};
use logging::LogFormat;

#[tokio::main]
async fn main() -> Result<()> {
    let args = VelaCli::parse();
    logging::init_logging(
        "vela_cli=info,vela_client=info",
        LogFormat::from_str_lossy(&args.log_format),
    );

    let endpoint = HttpEndpoint::new(&args.url);

    match args.command {
        Commands::Keygen(args) => keygen(args),
        Commands::Balance(args) => balance(args, &endpoint).await,
        Commands::Derive(args) => derive_address(args),
        Commands::Transfer(args) => transfer(args, &endpoint).await,
        Commands::Status(args) => status(args, &endpoint).await,
    }
}

/// Expands a leading `~/` against `$HOME`; paths without one pass through.
fn expand_home(path: &Path) -> PathBuf {
    let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

fn keygen(args: cli::KeygenArgs) -> Result<()> {
    let out = expand_home(&args.out);
    if out.exists() && !args.force {
        bail!(
            "refusing to overwrite existing keypair file {} (pass --force to replace it)",
            out.display()
        );
    }

    let keypair = VelaKeypair::generate();
    write_keypair_file(&out, &keypair)
        .with_context(|| format!("failed to write keypair file {}", out.display()))?;

    tracing::info!(path = %out.display(), "keypair written");
    println!("{}", keypair.address());
    Ok(())
}

async fn balance(args: cli::BalanceArgs, endpoint: &HttpEndpoint) -> Result<()> {
    let address: Address = args
        .address
        .parse()
        .with_context(|| format!("invalid address {:?}", args.address))?;

    let balance = endpoint
        .balance(&address)
        .await
        .context("balance query failed")?;

    println!("{balance}");
    Ok(())
}

fn derive_address(args: cli::DeriveArgs) -> Result<()> {
    let program: Address = args
        .program
        .parse()
        .with_context(|| format!("invalid program address {:?}", args.program))?;

    let seed_bytes: Vec<&[u8]> = args.seeds.iter().map(|s| s.as_bytes()).collect();
    let (address, bump) = derive(&seed_bytes, &program).context("derivation failed")?;

    if let Some(name) = &args.save_as {
        let cache = AddressCache::open(expand_home(&args.cache))
            .context("failed to open address cache")?;
        cache.save(name, &address)?;
        tracing::info!(name, %address, "derived address cached");
    }

    println!("{address} bump={bump}");
    Ok(())
}

async fn transfer(args: cli::TransferArgs, endpoint: &HttpEndpoint) -> Result<()> {
    let to: Address = args
        .to
        .parse()
        .with_context(|| format!("invalid recipient address {:?}", args.to))?;
    let keypair = read_keypair_file(expand_home(&args.keypair))?;

    tracing::info!(from = %keypair.address(), %to, amount = args.amount, "building transfer");

    // Fresh checkpoint, fresh unit. Rejected or indeterminate outcomes are
    // reported with their identifier; this command never resubmits.
    let checkpoint = endpoint
        .latest_checkpoint()
        .await
        .context("failed to fetch a checkpoint reference")?;

    let op = ops::transfer_units(keypair.address(), to, args.amount);
    let message = compile(keypair.address(), checkpoint, &[op])?;
    let unit = assemble(message, &[&keypair])?;

    let explorer = Explorer::default();
    match submit(&unit, endpoint).await {
        SubmissionOutcome::Accepted(id) => {
            println!("accepted {id}");
            println!("{}", explorer.unit_url(&id));
            Ok(())
        }
        SubmissionOutcome::Rejected { reason, identifier } => {
            if let Some(id) = identifier {
                bail!("rejected ({reason}); ledger reported identifier {id}");
            }
            bail!("rejected ({reason})");
        }
        SubmissionOutcome::Indeterminate(id) => {
            println!("indeterminate {id}");
            bail!(
                "outcome unknown; run `vela status {id}` before retrying — the unit may have landed"
            );
        }
    }
}

async fn status(args: cli::StatusArgs, endpoint: &HttpEndpoint) -> Result<()> {
    let id: UnitId = args
        .identifier
        .parse()
        .with_context(|| format!("invalid unit identifier {:?}", args.identifier))?;

    let status = endpoint
        .unit_status(&id)
        .await
        .context("status query failed")?;

    match status {
        UnitStatus::Confirmed => println!("confirmed"),
        UnitStatus::Failed => println!("failed"),
        UnitStatus::Unknown => println!("unknown"),
    }
    Ok(())
}
