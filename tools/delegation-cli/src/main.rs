use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use alloy_primitives::{hex, Address, B256};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use delegation_publish::{
    authorization::{decode_authorization_signature, DecodedAuthorizationSignature},
    delegation::{build_unsigned_delegation, resolve_gas_payment},
    EnvironmentRegistry, PublishConfig,
};
use delegation_signer::LocalSigner;
use delegation_types::{TransactionMeta, YParity};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod dry_run;
mod output;

/// Offline tooling for EIP-7702 delegation publishing.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the publish hook with a local key and write the relay request it would submit.
    DryRun {
        /// Environment registry JSON (`{"chains": {"<chain id>": {...}}}`).
        #[arg(long, env = "DELEGATION_ENVIRONMENTS")]
        environments: PathBuf,

        /// Transaction metadata JSON as produced by the wallet.
        #[arg(long)]
        transaction: PathBuf,

        /// Treat gas as already included by a bridge quote.
        #[arg(long)]
        gasless: bool,

        /// Contract the account currently delegates to (omit for a plain EOA).
        #[arg(long)]
        delegation_address: Option<Address>,

        /// Upgrade target for the authorization; defaults to the chain's stateless delegator.
        #[arg(long)]
        upgrade_contract: Option<Address>,

        /// Delegator private key (hex string, 0x...).
        #[arg(long, env = "PKEY", hide_env_values = true)]
        private_key: String,

        /// Relay polling interval in milliseconds.
        #[arg(long, default_value_t = delegation_publish::config::DEFAULT_POLL_INTERVAL_MS)]
        poll_interval_ms: u64,

        /// Where to write the report; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the unsigned delegation the hook would ask the account to sign.
    Caveats {
        #[arg(long, env = "DELEGATION_ENVIRONMENTS")]
        environments: PathBuf,

        #[arg(long)]
        transaction: PathBuf,

        #[arg(long)]
        gasless: bool,
    },

    /// Split a 65-byte authorization signature into r, s and yParity.
    DecodeAuthorization {
        /// Signature hex (0x...).
        signature: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "delegation_cli=info,delegation_publish=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::DryRun {
            environments,
            transaction,
            gasless,
            delegation_address,
            upgrade_contract,
            private_key,
            poll_interval_ms,
            out,
        } => {
            let registry = Arc::new(load_registry(&environments)?);
            let meta = load_transaction(&transaction)?;
            let signer = LocalSigner::from_hex(&private_key, registry.clone())
                .context("failed loading private key")?;
            let options = dry_run::DryRunOptions {
                gasless,
                delegation_address,
                upgrade_contract,
                config: PublishConfig { poll_interval_ms },
            };
            let report = dry_run::dry_run(registry, signer, &meta, options).await?;
            output::emit(out.as_deref(), &report)
        }
        Command::Caveats { environments, transaction, gasless } => {
            let registry = load_registry(&environments)?;
            let meta = load_transaction(&transaction)?;
            run_caveats(&registry, &meta, gasless)
        }
        Command::DecodeAuthorization { signature } => run_decode_authorization(&signature),
    }
}

fn load_registry(path: &Path) -> Result<EnvironmentRegistry> {
    EnvironmentRegistry::from_path(path)
        .with_context(|| format!("failed loading environments from {}", path.display()))
}

fn load_transaction(path: &Path) -> Result<TransactionMeta> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing transaction JSON in {}", path.display()))
}

fn run_caveats(
    registry: &EnvironmentRegistry,
    meta: &TransactionMeta,
    gasless: bool,
) -> Result<()> {
    let Some(gas_payment) = resolve_gas_payment(meta, gasless)? else {
        println!("No gas fee token selected and gas is not included; delegation does not apply.");
        return Ok(());
    };
    let environment = registry
        .get(meta.chain_id())
        .with_context(|| format!("no delegation environment for chain {}", meta.chain_id()))?;
    let delegation = build_unsigned_delegation(environment, &meta.tx_params, &gas_payment)?;

    output::emit(None, &delegation)
}

/// Signature components as the relay expects them, plus the legacy recovery byte.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthorizationComponents {
    r: B256,
    s: B256,
    y_parity: YParity,
    v: u8,
}

impl From<DecodedAuthorizationSignature> for AuthorizationComponents {
    fn from(decoded: DecodedAuthorizationSignature) -> Self {
        Self {
            r: decoded.r,
            s: decoded.s,
            y_parity: decoded.y_parity,
            v: 27 + decoded.y_parity.as_u8(),
        }
    }
}

fn decode_authorization(signature: &str) -> Result<AuthorizationComponents> {
    let bytes = hex::decode(signature.trim()).context("signature is not valid hex")?;
    Ok(decode_authorization_signature(&bytes)?.into())
}

fn run_decode_authorization(signature: &str) -> Result<()> {
    output::emit(None, &decode_authorization(signature)?)
}
