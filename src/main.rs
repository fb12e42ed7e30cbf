//! ERC-20 airdrop CLI

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use erc20_airdrop::config::Config;
use erc20_airdrop::token::fetch_token_info;
use erc20_airdrop::{
    calculate_total, format_units, Abis, Address, AirdropController, AirdropForm, ChainClient, FileStore,
    KeyValueStore, NetworkTable, ProviderConfig, SubmissionContext, SubmissionState,
};

use cli::{Cli, Command, FieldArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);

    init_tracing(&config.log_level, cli.verbose);

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.store.path));
    let mut form = AirdropForm::restore(store);

    match cli.command {
        Command::Total { amounts, amounts_file } => {
            let amounts = read_field(amounts, amounts_file)?.unwrap_or_else(|| form.amounts().to_string());
            println!("{}", calculate_total(&amounts));
        }
        Command::Set(fields) => {
            apply_fields(&mut form, fields)?;
            print_form(&form);
        }
        Command::Show => show(&config, &form).await?,
        Command::Clear => {
            form.clear();
            println!("Saved form cleared");
        }
        Command::Networks => {
            let networks = NetworkTable::with_overrides(&config.networks)?;
            for network in networks.iter() {
                println!("{:>10}  {:<12} {}", network.chain_id, network.name, network.spender);
            }
        }
        Command::Plan(fields) => {
            apply_fields(&mut form, fields)?;
            plan(&config, form).await?;
        }
        Command::Send(fields) => {
            apply_fields(&mut form, fields)?;
            send(&config, form).await?;
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str, verbose: bool) {
    let default_directive = if verbose { "debug" } else { log_level };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(rpc_url) = &cli.rpc_url {
        config.rpc.url = rpc_url.clone();
    }
    if let Some(private_key) = &cli.private_key {
        config.wallet.private_key = Some(private_key.clone());
    }
    if let Some(store) = &cli.store {
        config.store.path = store.to_string_lossy().to_string();
    }
}

/// Inline text wins; otherwise the file content, if a file was given
fn read_field(inline: Option<String>, file: Option<PathBuf>) -> Result<Option<String>> {
    match (inline, file) {
        (Some(text), _) => Ok(Some(text)),
        (None, Some(path)) => std::fs::read_to_string(&path)
            .map(Some)
            .with_context(|| format!("Failed to read {}", path.display())),
        (None, None) => Ok(None),
    }
}

fn apply_fields(form: &mut AirdropForm, fields: FieldArgs) -> Result<()> {
    if let Some(token) = fields.token {
        form.set_token_address(token.trim());
    }
    if let Some(recipients) = read_field(fields.recipients, fields.recipients_file)? {
        form.set_recipients(recipients);
    }
    if let Some(amounts) = read_field(fields.amounts, fields.amounts_file)? {
        form.set_amounts(amounts);
    }
    Ok(())
}

fn print_form(form: &AirdropForm) {
    println!("{} {}", "Token Address:".bold(), form.token_address());
    println!("{}\n{}", "Recipients:".bold(), form.recipients());
    println!("{}\n{}", "Amounts:".bold(), form.amounts());
}

async fn connect(config: &Config) -> Result<(Arc<ChainClient>, SubmissionContext)> {
    let private_key = config
        .wallet
        .private_key
        .as_deref()
        .context("No private key: pass --private-key or set PRIVATE_KEY")?;

    let client = Arc::new(ChainClient::new(ProviderConfig::from(&config.rpc), private_key)?);
    let chain_id = client.chain_id().await?;
    info!("Connected to chain {} as {}", chain_id, client.account());

    let ctx = SubmissionContext {
        chain_id,
        account: client.account(),
    };
    Ok((client, ctx))
}

async fn show(config: &Config, form: &AirdropForm) -> Result<()> {
    print_form(form);
    println!();

    if form.token_address().is_empty() {
        println!("{} {}", "Tokens Needed:".bold(), form.total_amount_needed());
        return Ok(());
    }

    let token = form
        .token_address()
        .parse::<Address>()
        .with_context(|| format!("Invalid token address '{}'", form.token_address()))?;
    let abis = Abis::load(&config.abi).await?;
    let (client, ctx) = connect(config).await?;
    let info = fetch_token_info(client.as_ref(), &abis, token, ctx.account).await?;

    println!("{} {}", "Token Name:".bold(), info.symbol);
    println!("{} {}", "Tokens Balance:".bold(), info.formatted_balance());
    println!("{} {}", "Tokens Needed:".bold(), form.total_amount_needed());
    Ok(())
}

async fn plan(config: &Config, form: AirdropForm) -> Result<()> {
    let networks = NetworkTable::with_overrides(&config.networks)?;
    let abis = Abis::load(&config.abi).await?;
    let (client, ctx) = connect(config).await?;
    let controller = AirdropController::with_client(client, networks, abis, form);

    let plan = match controller.prepare(&ctx).await {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("{}", e.notice().red().bold());
            return Err(e.into());
        }
    };
    let calldata = plan.airdrop_calldata(&controller.abis().airdrop)?;
    let total = format_units(plan.intent.total_amount(), plan.decimals);

    println!("{} {}", "Airdrop contract:".bold(), plan.spender);
    println!("{} {}", "Token:".bold(), plan.intent.token_address());
    println!("{} {}", "Recipients:".bold(), plan.intent.recipients().len());
    println!("{} {} ({} base units)", "Total:".bold(), total, plan.intent.total_amount());
    println!("{} {}", "Allowance:".bold(), format_units(plan.allowance, plan.decimals));
    println!("{} {}", "Approval needed:".bold(), plan.needs_approval());
    println!("{} {}", "Calldata:".bold(), calldata);
    Ok(())
}

async fn send(config: &Config, form: AirdropForm) -> Result<()> {
    let networks = NetworkTable::with_overrides(&config.networks)?;
    let abis = Abis::load(&config.abi).await?;
    let (client, ctx) = connect(config).await?;
    let mut controller = AirdropController::with_client(client, networks, abis, form);

    let (spinner, progress) = spawn_progress(controller.subscribe());
    let result = controller.submit(&ctx).await;
    progress.abort();
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            if let Some(approval) = &outcome.approval {
                println!("{} {}", "Approval:".bold(), approval.transaction_hash);
            }
            println!("{}", outcome.notice().green().bold());
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.notice().red().bold());
            Err(e.into())
        }
    }
}

fn spawn_progress(mut states: watch::Receiver<SubmissionState>) -> (ProgressBar, JoinHandle<()>) {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message("Processing...");

    let bar = spinner.clone();
    let handle = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = *states.borrow_and_update();
            if state.is_in_flight() {
                bar.set_message(format!("{}...", state));
            } else {
                break;
            }
        }
    });

    (spinner, handle)
}
