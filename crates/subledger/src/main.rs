//! `SubLedger` - track subscriptions and get warned before they lapse.
//!
//! A terminal front end over `subledger-core`. It renders the cached
//! subscriptions, the current status message and the expiring-soon set as
//! plain text and turns typed commands into controller intents.

mod alert;
mod command;
mod prompt;
mod view;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use subledger_core::{
    AddForm, CheckOutcome, ClientConfig, Clock, HttpStore, LifecycleController, MemoryStore,
    SubscriptionId, SubscriptionStore,
};

use alert::DesktopAlerts;
use command::{Command, HELP, Target};
use prompt::TerminalInteraction;

/// Overrides the configured API base URL.
const API_URL_ENV: &str = "SUBLEDGER_API_URL";
/// Overrides the configured user id.
const USER_ID_ENV: &str = "SUBLEDGER_USER_ID";

type Controller<S> = LifecycleController<S, TerminalInteraction>;

const USAGE: &str = "usage: subledger [--offline] [--config <path>]";

/// Command-line options.
#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    offline: bool,
    config: Option<PathBuf>,
}

/// What the command line asks for.
#[derive(Debug, PartialEq, Eq)]
enum Invocation {
    Run(Options),
    Help,
}

impl Options {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Invocation> {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--offline" => options.offline = true,
                "--config" => {
                    let path = args.next().context("--config needs a path")?;
                    options.config = Some(PathBuf::from(path));
                }
                "-h" | "--help" => return Ok(Invocation::Help),
                other => bail!("unknown argument `{other}`"),
            }
        }
        Ok(Invocation::Run(options))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so they do not interleave with the listing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "subledger=info,subledger_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let options = match Options::parse(std::env::args().skip(1))? {
        Invocation::Run(options) => options,
        Invocation::Help => {
            println!("{USAGE}\n\n{HELP}");
            return Ok(());
        }
    };

    let mut config = match &options.config {
        Some(path) => ClientConfig::load_from(path).await,
        None => ClientConfig::load().await,
    }
    .context("Failed to load configuration")?;
    apply_env_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    let alerts = DesktopAlerts::new(config.desktop_notifications);
    let user = config.user();
    let settings = config.settings();

    if options.offline {
        info!("Starting SubLedger offline");
        let store = MemoryStore::new();
        let controller =
            LifecycleController::from_settings(store, TerminalInteraction, user, settings);
        run(&controller, &alerts).await
    } else {
        let store = HttpStore::with_timeout(&config.api_base_url, config.request_timeout())
            .context("Failed to create API client")?;
        info!("Starting SubLedger against {}", store.base_url());
        let controller =
            LifecycleController::from_settings(store, TerminalInteraction, user, settings);
        run(&controller, &alerts).await
    }
}

fn apply_env_overrides(config: &mut ClientConfig) {
    if let Ok(url) = std::env::var(API_URL_ENV) {
        config.api_base_url = url;
    }
    if let Ok(id) = std::env::var(USER_ID_ENV) {
        config.user_id = Some(id).filter(|id| !id.trim().is_empty());
    }
}

async fn run<S: SubscriptionStore>(
    controller: &Controller<S>,
    alerts: &DesktopAlerts,
) -> Result<()> {
    let mut shown = 0;

    controller.mount().await;
    print_list(controller);
    show_status(controller, alerts, &mut shown);

    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = prompt::read_line() else {
            break;
        };

        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => execute(controller, command).await,
            Err(hint) => println!("{hint}"),
        }
        show_status(controller, alerts, &mut shown);
    }

    info!("Goodbye");
    Ok(())
}

async fn execute<S: SubscriptionStore>(controller: &Controller<S>, command: Command) {
    match command {
        Command::List => print_list(controller),
        Command::Services => println!("{}", view::services(controller.registry())),
        Command::Add { service, end_date } => {
            let mut form = if controller.registry().contains(&service) {
                AddForm::known(service, end_date)
            } else {
                AddForm::custom(service, end_date)
            };
            if controller.add(&mut form).await.is_completed() {
                print_list(controller);
            }
        }
        Command::Renew(target) => {
            if let Some(id) = resolve(controller, target) {
                if controller.renew(&id).await.is_completed() {
                    print_list(controller);
                }
            }
        }
        Command::Delete(target) => {
            if let Some(id) = resolve(controller, target) {
                if controller.delete(&id).await.is_completed() {
                    print_list(controller);
                }
            }
        }
        Command::Refresh => {
            if controller.refresh().await.is_completed() {
                print_list(controller);
            }
        }
        Command::Check => match controller.check_expiring().await {
            CheckOutcome::Clear => println!("Nothing expires soon."),
            CheckOutcome::Expiring(_) => print_list(controller),
            CheckOutcome::Unavailable => println!("Could not check for expiring subscriptions."),
        },
        Command::Dismiss => {
            controller.dismiss_status();
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

/// Maps a list position or raw id to a subscription id.
fn resolve<S: SubscriptionStore>(
    controller: &Controller<S>,
    target: Target,
) -> Option<SubscriptionId> {
    match target {
        Target::Position(n) => {
            let found = controller
                .subscriptions()
                .get(n - 1)
                .map(|sub| sub.id.clone());
            if found.is_none() {
                println!("No subscription at position {n}.");
            }
            found
        }
        Target::Id(id) => Some(SubscriptionId::new(id)),
    }
}

fn print_list<S: SubscriptionStore>(controller: &Controller<S>) {
    println!(
        "{}",
        view::subscriptions(
            &controller.subscriptions(),
            &controller.notifications(),
            controller.clock().today(),
        )
    );
}

/// Prints the visible status message once and mirrors warnings to the desktop.
fn show_status<S: SubscriptionStore>(
    controller: &Controller<S>,
    alerts: &DesktopAlerts,
    shown: &mut u64,
) {
    if let Some(message) = controller.status() {
        if message.id > *shown {
            *shown = message.id;
            println!("{}", view::status(&message));
        }
    }
    alerts.observe(controller.status_board().latest().as_ref());
}
