use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rll",
    about = "Royalty Ledger: track plays and royalty splits",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// State file holding the ledger's key-value data
    #[arg(long, global = true, default_value = "rll-state.json")]
    pub state: PathBuf,

    /// Gate configuration (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Caller identity passed to the gate
    #[arg(long, global = true, default_value = "local")]
    pub identity: String,

    /// Caller role code passed to the gate
    #[arg(long, global = true, default_value_t = 0, allow_negative_numbers = true)]
    pub role: i64,

    /// Transaction id; a fresh one is generated when omitted
    #[arg(long, global = true)]
    pub tx_id: Option<String>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Submit a state-changing invocation (init, add_account, add_track, register_track)
    Invoke(InvocationArgs),
    /// Submit a read-only invocation (get_account, get_track, get_all_tracks)
    Query(InvocationArgs),
    /// List all registered accounts (operator read, not checked against the role policy)
    Accounts,
    /// Show the unsettled payments of an account (operator read, not checked against the role policy)
    Pending(PendingArgs),
}

#[derive(Args)]
pub struct InvocationArgs {
    /// Invocation name
    pub name: String,
    /// Positional string arguments
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct PendingArgs {
    pub account: String,
}
