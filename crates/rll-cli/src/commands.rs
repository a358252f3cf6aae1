use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use rll_gate::{CallerContext, Dispatcher, GateConfig};
use rll_store::FileKvStore;
use rll_types::{Payment, TxId};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let dispatcher = open_dispatcher(&cli)?;
    let caller = caller_context(&cli)?;

    match &cli.command {
        Command::Invoke(inv) => {
            dispatcher.invoke(&caller, &inv.name, &inv.args)?;
            report_invoke(&cli.format, &inv.name, &caller);
            Ok(())
        }
        Command::Query(inv) => {
            let payload = dispatcher.query(&caller, &inv.name, &inv.args)?;
            print_payload(&cli.format, &payload)
        }
        Command::Accounts => cmd_accounts(&cli.format, &dispatcher),
        Command::Pending(args) => cmd_pending(&cli.format, &dispatcher, &args.account),
    }
}

fn open_dispatcher(cli: &Cli) -> anyhow::Result<Dispatcher> {
    let config = match &cli.config {
        Some(path) => GateConfig::load(path)?,
        None => GateConfig::default(),
    };
    let store = FileKvStore::open(&cli.state)
        .with_context(|| format!("opening state file {}", cli.state.display()))?;
    tracing::debug!(
        rules = config.roles.rules.len(),
        default_allow = config.roles.default_allow,
        "gate configured"
    );
    Ok(Dispatcher::new(Arc::new(store), config)?)
}

fn caller_context(cli: &Cli) -> anyhow::Result<CallerContext> {
    let raw = cli
        .tx_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::now_v7().to_string());
    let tx_id = TxId::new(raw)?;
    Ok(CallerContext::new(cli.identity.clone(), cli.role, tx_id))
}

fn report_invoke(format: &OutputFormat, name: &str, caller: &CallerContext) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({ "invocation": name, "txId": caller.tx_id, "ok": true })
            );
        }
        OutputFormat::Text => {
            println!("{} {} committed", "✓".green().bold(), name.bold());
            println!("  tx: {}", caller.tx_id.to_string().yellow());
        }
    }
}

fn print_payload(format: &OutputFormat, payload: &[u8]) -> anyhow::Result<()> {
    let value: serde_json::Value =
        serde_json::from_slice(payload).context("query returned non-JSON payload")?;
    match format {
        OutputFormat::Json => println!("{value}"),
        OutputFormat::Text => println!("{}", serde_json::to_string_pretty(&value)?),
    }
    Ok(())
}

/// Operator read straight from the ledger; the gate's role policy does not apply.
fn cmd_accounts(format: &OutputFormat, dispatcher: &Dispatcher) -> anyhow::Result<()> {
    let accounts = dispatcher.ledger().query().get_all_accounts()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&accounts)?),
        OutputFormat::Text => {
            if accounts.is_empty() {
                println!("No accounts registered.");
            }
            for account in &accounts {
                let outstanding: u64 = account.outstanding().map(|p| p.amount).sum();
                println!(
                    "{}  {}  balance {}  outstanding {}",
                    account.id.yellow().bold(),
                    account.name,
                    account.balance,
                    outstanding.to_string().cyan()
                );
            }
        }
    }
    Ok(())
}

fn cmd_pending(format: &OutputFormat, dispatcher: &Dispatcher, account: &str) -> anyhow::Result<()> {
    let payments = dispatcher.ledger().query().outstanding_payments(account)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&payments)?),
        OutputFormat::Text => {
            if payments.is_empty() {
                println!("No pending payments for {}.", account.yellow());
            }
            for payment in &payments {
                println!("{}", describe_payment(account, payment));
            }
        }
    }
    Ok(())
}

fn describe_payment(account: &str, payment: &Payment) -> String {
    let direction = if payment.recipient_id == account {
        format!("from {}", payment.sender_id).green()
    } else {
        format!("to {}", payment.recipient_id).red()
    };
    format!(
        "  {:>10}  {}  (tx {}#{})",
        payment.amount, direction, payment.tx_id, payment.ordinal
    )
}
