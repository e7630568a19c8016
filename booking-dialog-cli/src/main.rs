//! Booking Dialog CLI - runs the purchase confirmation dialog in a terminal
//!
//! Loads a billing scenario from TOML, opens the dialog for the requested booking and answers
//! it from the command line or an interactive prompt.
//!
//! ```text
//! booking-dialog --scenario scenario.toml --feature storage --count 500 --free-amount 10
//! ```

mod observability;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use booking_dialog::{
    Decision, DialogConfig, DialogServices, DialogTexts, PurchaseConfirmationViewModel,
    model::FeatureType, services::StaticBilling,
};
use clap::{Parser, ValueEnum};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    task::JoinHandle,
};
use tracing::info;

use crate::observability::{LogFormat, init_observability};

/// Runs the booking confirmation dialog against a billing scenario.
#[derive(Debug, Parser)]
#[command(name = "booking-dialog", version, about)]
struct Args {
    /// Billing scenario (account, customer records, quotes).
    #[arg(long)]
    scenario: PathBuf,

    /// Dialog configuration; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Feature to book: users, storage or email_aliases.
    #[arg(long)]
    feature: FeatureType,

    /// Amount to book; negative removes users.
    #[arg(long, allow_hyphen_values = true)]
    count: i64,

    /// Amount included for free.
    #[arg(long, default_value_t = 0)]
    free_amount: u32,

    /// How to answer when confirmation is needed.
    #[arg(long, value_enum, default_value_t = DecisionMode::Prompt)]
    decision: DecisionMode,

    /// Print the dialog texts as JSON.
    #[arg(long)]
    json: bool,

    /// Log format; falls back to `LOG_FORMAT`.
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DecisionMode {
    Accept,
    Cancel,
    Prompt,
}

type Flow = JoinHandle<booking_dialog::Result<bool>>;

enum Step {
    Finished(Result<booking_dialog::Result<bool>, tokio::task::JoinError>),
    AwaitingDecision,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_observability(args.log_format.unwrap_or_else(LogFormat::from_env));

    let config = match &args.config {
        Some(path) => DialogConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DialogConfig::default(),
    };
    let billing = StaticBilling::from_file(&args.scenario)
        .with_context(|| format!("loading scenario {}", args.scenario.display()))?;

    let dialog = Arc::new(PurchaseConfirmationViewModel::new(
        DialogServices::from_backend(Arc::new(billing)),
        config.localizer()?,
    ));

    let confirmed = run(&args, &dialog).await?;
    info!(confirmed, "dialog finished");
    println!("{}", if confirmed { "confirmed" } else { "aborted" });
    Ok(())
}

async fn run(args: &Args, dialog: &Arc<PurchaseConfirmationViewModel>) -> anyhow::Result<bool> {
    let mut flow: Flow = tokio::spawn({
        let dialog = dialog.clone();
        let (feature, count, free_amount) = (args.feature, args.count, args.free_amount);
        async move { dialog.open(feature, count, free_amount).await }
    });
    let mut visible = dialog.watch_visible();

    let step = tokio::select! {
        finished = &mut flow => Step::Finished(finished),
        shown = visible.wait_for(|shown| *shown) => {
            if shown.is_ok() { Step::AwaitingDecision } else { Step::Finished((&mut flow).await) }
        }
    };

    match step {
        Step::Finished(result) => {
            let proceed = result.context("dialog task failed")??;
            print_texts(&dialog.texts(), args.json)?;
            Ok(proceed)
        }
        Step::AwaitingDecision => {
            let texts = dialog.texts();
            print_texts(&texts, args.json)?;

            let decision = match args.decision {
                DecisionMode::Accept => Decision::Accept,
                DecisionMode::Cancel => Decision::Cancel,
                DecisionMode::Prompt => prompt(&texts.submit_button).await?,
            };
            match decision {
                Decision::Accept => dialog.accept()?,
                Decision::Cancel => dialog.cancel()?,
            }
            Ok(flow.await.context("dialog task failed")??)
        }
    }
}

fn print_texts(texts: &DialogTexts, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(texts)?);
        return Ok(());
    }

    println!("{:<16}{}", "Booking:", texts.booking);
    println!("{:<16}{}", "Subscription:", texts.subscription);
    println!("{:<16}{}", "", texts.subscription_info);
    println!("{:<16}{}", "Price:", texts.price);
    if !texts.price_info.is_empty() {
        println!("{:<16}{}", "", texts.price_info);
    }
    println!("{:<16}{}", "Payment method:", texts.payment_method_info);
    if texts.visible {
        println!("[ {} ]", texts.submit_button);
    }
    Ok(())
}

async fn prompt(submit: &str) -> anyhow::Result<Decision> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{submit}? [y/N] ").as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(parse_answer(&line))
}

fn parse_answer(line: &str) -> Decision {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Decision::Accept,
        _ => Decision::Cancel,
    }
}
