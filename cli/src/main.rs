use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use portfolio_prefs::clock::{Clock, SystemClock, timestamp_from_ms};
use portfolio_prefs::config::Locale;
use portfolio_prefs::render;
use portfolio_prefs::{PrefStore, ProductId, SiteConfig, SiteController, StoreError, ThemePreference};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::file_store::FileStore;

mod file_store;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("could not encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "prefs-cli", about = "Inspect and seed site theme and cart state")]
struct Cli {
    /// JSON file standing in for the browser's local storage.
    #[arg(long, env = "PREFS_STORE", default_value = "prefs.json")]
    store: PathBuf,

    #[arg(long, env = "PREFS_LOCALE", default_value = "en")]
    locale: Locale,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Theme(ThemeCommand),
    Cart(CartCommand),
    /// Print the DOM updates a page load would apply, as JSON.
    Render,
}

#[derive(Args, Debug)]
struct ThemeCommand {
    #[command(subcommand)]
    command: ThemeSubcommand,
}

#[derive(Subcommand, Debug)]
enum ThemeSubcommand {
    Show,
    Toggle,
    Set { theme: ThemePreference },
}

#[derive(Args, Debug)]
struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Subcommand, Debug)]
enum CartSubcommand {
    Add { product_id: i64 },
    Show,
    Count,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();
    run(cli, &SystemClock, &mut stdout)
}

fn run(cli: Cli, clock: &impl Clock, out: &mut impl Write) -> Result<(), CliError> {
    let config = SiteConfig::for_locale(cli.locale);
    let storage = FileStore::open(&cli.store);
    tracing::debug!(path = %storage.path().display(), locale = ?cli.locale, "opened store");

    match cli.command {
        Command::Theme(theme) => run_theme(PrefStore::new(storage, config.keys), theme, out),
        Command::Cart(cart) => {
            let store = PrefStore::new(storage, config.keys.clone());
            run_cart(store, &config, clock, cart, out)
        }
        Command::Render => run_render(storage, config, out),
    }
}

fn run_theme(mut store: PrefStore<FileStore>, theme: ThemeCommand, out: &mut impl Write) -> Result<(), CliError> {
    let current = match theme.command {
        ThemeSubcommand::Show => store.theme(),
        ThemeSubcommand::Toggle => store.toggle_theme()?,
        ThemeSubcommand::Set { theme } => {
            store.set_theme(theme)?;
            theme
        }
    };
    writeln!(out, "{current}")?;
    Ok(())
}

fn run_cart(
    mut store: PrefStore<FileStore>,
    config: &SiteConfig,
    clock: &impl Clock,
    cart: CartCommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match cart.command {
        CartSubcommand::Add { product_id } => {
            let id = ProductId(product_id);
            let now = timestamp_from_ms(clock.now_ms());
            let entry = store.add_to_cart(id, now)?;
            let message = render::added_to_cart_message(config.catalog.name_of(id), &config.messages);
            writeln!(out, "{message} (x{})", entry.quantity)?;
        }
        CartSubcommand::Show => {
            let mut rows = Vec::new();
            for entry in store.cart().entries() {
                let mut row = serde_json::to_value(entry)?;
                if let Value::Object(fields) = &mut row {
                    fields.insert("name".to_owned(), Value::String(config.catalog.name_of(entry.id).to_owned()));
                }
                rows.push(row);
            }
            print_json(out, &Value::Array(rows))?;
        }
        CartSubcommand::Count => writeln!(out, "{}", store.cart_count())?,
    }
    Ok(())
}

fn run_render(storage: FileStore, config: SiteConfig, out: &mut impl Write) -> Result<(), CliError> {
    let controller = SiteController::new(storage, SystemClock, config);
    let updates = controller.on_load();
    print_json(out, &serde_json::to_value(updates)?)
}

fn print_json(out: &mut impl Write, value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    writeln!(out, "{rendered}")?;
    Ok(())
}
