//! Railwise desk CLI
//!
//! Compares settlement rails for a domestic amount, simulates stablecoin
//! trades and fetches a market opinion.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use railwise_advisory::{AdvisoryClient, AdvisoryConfig};
use railwise_common::{parse_grouped_amount, RouteId};
use railwise_execution::{ExecutionConfig, TradeDirection, TradeExecutor};
use railwise_fx::RouteCatalog;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod controller;
mod metrics;
mod render;

use controller::DeskSession;

/// Railwise desk CLI
#[derive(Parser, Debug)]
#[command(name = "railwise", version)]
#[command(about = "Compare FX settlement rails and simulate stablecoin trades")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Rail savings are measured against
    #[arg(long, global = true, default_value = "bca")]
    baseline: String,

    /// Simulated settlement wait in milliseconds
    #[arg(long, global = true)]
    settlement_delay_ms: Option<u64>,

    /// Reject confirmations after the locked quote expired
    #[arg(long, global = true)]
    enforce_quote_lock: bool,

    /// Credential for the advisory service
    #[arg(long, global = true, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare every rail for an amount
    Compare {
        /// Domestic amount, digit grouping allowed (100.000.000)
        #[arg(value_parser = parse_amount, allow_negative_numbers = true)]
        amount: Decimal,
    },
    /// Open and execute a trade on a stablecoin rail
    Trade {
        #[arg(value_parser = parse_amount, allow_negative_numbers = true)]
        amount: Decimal,

        /// buy or sell
        #[arg(long, default_value = "buy")]
        direction: TradeDirection,

        #[arg(long, default_value = "usdt")]
        route: String,

        /// Show the locked terms and cancel instead of executing
        #[arg(long)]
        dry_run: bool,
    },
    /// Ask for a market opinion on an amount
    Advise {
        #[arg(value_parser = parse_amount, allow_negative_numbers = true)]
        amount: Decimal,
    },
    /// Show the bank vs stablecoin spread history
    History {
        #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u16).range(1..=3650))]
        days: u16,
    },
    /// Compare, advise and trade in one pass
    Demo {
        #[arg(value_parser = parse_amount, allow_negative_numbers = true, default_value = "100.000.000")]
        amount: Decimal,
    },
}

fn parse_amount(input: &str) -> Result<Decimal, String> {
    parse_grouped_amount(input).map_err(|e| e.to_string())
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn build_session(args: &Args) -> anyhow::Result<DeskSession> {
    let mut execution = ExecutionConfig::from_env();
    if let Some(ms) = args.settlement_delay_ms {
        execution.settlement_delay = Duration::from_millis(ms);
    }
    if args.enforce_quote_lock {
        execution.enforce_quote_lock = true;
    }
    execution.validate()?;

    let mut advisory = AdvisoryConfig::from_env();
    if args.api_key.is_some() {
        advisory.api_key = args.api_key.clone();
    }
    advisory.validate()?;

    info!(
        settlement_delay_ms = execution.settlement_delay.as_millis() as u64,
        enforce_quote_lock = execution.enforce_quote_lock,
        advisory_configured = advisory.is_configured(),
        "Session configured"
    );

    DeskSession::new(
        Arc::new(RouteCatalog::reference()),
        RouteId::new(args.baseline.as_str()),
        TradeExecutor::simulated(execution),
        AdvisoryClient::from_config(&advisory).context("failed to build advisory client")?,
    )
}

async fn run_trade(
    session: &DeskSession,
    route: &RouteId,
    direction: TradeDirection,
    amount: Decimal,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut order = session.open_trade(route, direction, amount)?;
    if !json {
        print!("{}", render::order_terms(&order, session.executor().config()));
    }

    if dry_run {
        info!(order_id = %order.id(), "Order cancelled before confirmation");
        if json {
            print_json(&order)?;
        } else {
            println!("Order cancelled.");
        }
        return Ok(());
    }

    let receipt = session.execute_trade(&mut order).await?;
    if json {
        print_json(&receipt)?;
    } else {
        print!("{}", render::receipt(&receipt));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_json);

    let session = build_session(&args)?;

    match &args.command {
        Command::Compare { amount } => {
            let quote = session.quote(*amount).await?;
            if args.json {
                print_json(&quote)?;
            } else {
                print!("{}", render::comparison(session.catalog(), &quote));
            }
        }
        Command::Trade {
            amount,
            direction,
            route,
            dry_run,
        } => {
            let route = RouteId::new(route.as_str());
            run_trade(&session, &route, *direction, *amount, *dry_run, args.json).await?;
        }
        Command::Advise { amount } => {
            let opinion = session.advise(*amount).await;
            if args.json {
                print_json(&opinion)?;
            } else {
                print!("{}", render::opinion(&opinion));
            }
        }
        Command::History { days } => {
            let points = session.history(usize::from(*days))?;
            if args.json {
                print_json(&points)?;
            } else {
                print!("{}", render::history(&points));
            }
        }
        Command::Demo { amount } => {
            let (opinion, quote) =
                tokio::join!(session.advise(*amount), session.quote(*amount));
            let quote = quote?;

            if args.json {
                print_json(&serde_json::json!({ "quote": quote, "opinion": opinion }))?;
            } else {
                print!("{}", render::comparison(session.catalog(), &quote));
                println!();
                print!("{}", render::opinion(&opinion));
                println!();
            }

            let tradable = session
                .catalog()
                .routes()
                .iter()
                .find(|r| r.rail_type.is_tradable())
                .map(|r| r.id.clone())
                .context("catalog has no tradable rail")?;
            run_trade(&session, &tradable, TradeDirection::Buy, *amount, false, args.json).await?;
        }
    }

    let metrics = session.metrics().await;
    info!(
        comparisons = metrics.comparisons,
        trades = metrics.trades_total,
        succeeded = metrics.trades_succeeded,
        failed = metrics.trades_failed,
        avg_settlement_ms = metrics.average_latency_ms(),
        success_rate = metrics.success_rate(),
        opinion_fallbacks = metrics.opinion_fallbacks,
        "Session complete"
    );
    if !args.json {
        eprintln!("{}", render::session_metrics(&metrics));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_negative_amounts_reach_every_command() {
        for command in ["compare", "trade", "advise", "demo"] {
            let args = Args::try_parse_from(["railwise", command, "-5000"]).unwrap();
            let amount = match args.command {
                Command::Compare { amount }
                | Command::Trade { amount, .. }
                | Command::Advise { amount }
                | Command::Demo { amount } => amount,
                Command::History { .. } => unreachable!(),
            };
            assert_eq!(amount, dec!(-5000), "{command}");
        }
    }

    #[test]
    fn test_history_days_bounded() {
        assert!(Args::try_parse_from(["railwise", "history", "--days", "30"]).is_ok());
        assert!(Args::try_parse_from(["railwise", "history", "--days", "0"]).is_err());
        assert!(Args::try_parse_from(["railwise", "history", "--days", "100000000"]).is_err());
    }
}
