//! Developer CLI for `phonekit-core`.
//!
//! Drives the verification flow against a real or local backend from a terminal.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::{eyre, Result, WrapErr};
use phonekit_core::issuance::{ServerIssuance, SessionPointer};
use phonekit_core::{
    BackAction, FlowController, HttpVerificationApi, IssuanceHandoff, Locale, MessageTable,
    PhoneValidator, RegionValidator, RetryWindow, Severity, Step, ViewModel, WidgetConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "phonekit", about = "Phone number verification from the terminal", version)]
struct Cli {
    /// JSON widget configuration file.
    #[arg(long, global = true, env = "PHONEKIT_CONFIG", value_name = "path")]
    config: Option<PathBuf>,

    /// Base URL of the verification API, e.g. `http://localhost:8080/api/`.
    #[arg(long, global = true, env = "PHONEKIT_API_BASE", value_name = "url")]
    api_base: Option<String>,

    /// Address of the issuance server.
    #[arg(long, global = true, env = "PHONEKIT_ISSUANCE_SERVER", value_name = "url")]
    issuance_server: Option<String>,

    /// Language of messages and SMS (`en` or `nl`).
    #[arg(long, global = true, env = "PHONEKIT_LOCALE")]
    locale: Option<Locale>,

    /// Send the code without asking for confirmation.
    #[arg(long, global = true)]
    no_confirm: bool,

    /// Log requests and step changes.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify a phone number interactively.
    Run,
    /// Resume from the link in a verification SMS.
    Link {
        /// The link, or just its `#!verify:<phone>:<code>` fragment.
        link: String,
    },
    /// Check a phone number without contacting the backend.
    Validate {
        /// The number as a user would type it.
        number: String,
    },
    /// Show the rate limit message for a `Retry-After` value.
    RateLimit {
        /// Seconds to wait.
        seconds: u64,
    },
    /// Print the effective configuration as JSON.
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;

    match cli.command {
        Command::Run => run(config).await,
        Command::Link { link } => resume(config, &link).await,
        Command::Validate { number } => {
            validate(&config, &number);
            Ok(())
        }
        Command::RateLimit { seconds } => {
            let messages = MessageTable::for_locale(config.locale);
            println!(
                "{}",
                messages.rate_limited(Some(RetryWindow::from_secs(seconds)))
            );
            Ok(())
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "phonekit_core=debug" } else { "warn" };
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .try_init();
    if let Err(err) = installed {
        eprintln!("logging disabled: {err}");
    }
}

/// Reads the configuration file, if any, and applies the command line on top.
fn load_config(cli: &Cli) -> Result<WidgetConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read {}", path.display()))?;
            WidgetConfig::from_json(&json)?
        }
        None => WidgetConfig::default(),
    };

    if let Some(api_base) = &cli.api_base {
        config.api_base.clone_from(api_base);
    }
    if let Some(server) = &cli.issuance_server {
        config.issuance_server.clone_from(server);
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if cli.no_confirm {
        config.confirm_step = false;
    }

    config.validate()?;
    Ok(config)
}

fn present(pointer: &SessionPointer, _locale: Locale) {
    println!("\nOpen this {} session in your wallet:\n  {}\n", pointer.kind, pointer.url);
}

type Flow<I> = FlowController<HttpVerificationApi, I, RegionValidator>;

fn flow(config: WidgetConfig) -> Flow<impl IssuanceHandoff> {
    let api = HttpVerificationApi::new(&config);
    let issuance = ServerIssuance::from_config(&config, present);
    let validator = RegionValidator::from_config(&config);
    let mut flow = FlowController::new(config, api, issuance, validator);
    flow.set_observer(render);
    flow
}

async fn run(config: WidgetConfig) -> Result<()> {
    let mut flow = flow(config);
    render(&flow.view());
    drive(&mut flow).await
}

async fn resume(config: WidgetConfig, link: &str) -> Result<()> {
    let mut flow = flow(config);
    if !flow.open_link(link).await? {
        return Err(eyre!("not a verification link: {link}"));
    }
    drive(&mut flow).await
}

/// Prompts for input until the flow is done. Views are printed by the observer.
async fn drive<I: IssuanceHandoff>(flow: &mut Flow<I>) -> Result<()> {
    loop {
        let view = flow.view();
        match view.step {
            Step::Phone => {
                let input = prompt("Phone number")?;
                flow.submit_phone(&input).await?;
            }
            Step::Confirm => {
                let number = view.confirm_number.unwrap_or_default();
                let answer = prompt(&format!("Send a code to {number}? [Y/n]"))?;
                if answer.eq_ignore_ascii_case("n") {
                    flow.back();
                } else {
                    flow.confirm().await?;
                }
            }
            Step::Token => {
                let code = prompt("Code from the SMS (empty to go back)")?;
                if code.is_empty() {
                    flow.back();
                } else {
                    flow.submit_code(&code).await?;
                }
            }
            Step::Done => return Ok(()),
        }
    }
}

fn validate(config: &WidgetConfig, number: &str) {
    let messages = MessageTable::for_locale(config.locale);
    match RegionValidator::from_config(config).validate(number) {
        Ok(phone) => println!("{phone} ({})", phone.region().unwrap_or("unknown region")),
        Err(rejection) => println!("{rejection}: {}", messages.get(rejection.message_key())),
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(eyre!("input closed"));
    }
    Ok(line.trim().to_string())
}

fn render(view: &ViewModel) {
    if let Some(status) = &view.status {
        let tag = match status.severity {
            Severity::Success => "ok",
            Severity::Info => "..",
            Severity::Warning => "!!",
            Severity::Danger => "xx",
        };
        println!("[{tag}] {}", status.body);
    }
    tracing::debug!(
        "step {} (button {:?}, back {})",
        view.step,
        view.button_label,
        match view.back {
            BackAction::Navigate(step) => step.to_string(),
            BackAction::History => "history".to_string(),
            BackAction::Hidden => "hidden".to_string(),
        }
    );
}
