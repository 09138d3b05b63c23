//! Hawk Leather CLI - Terminal storefront.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! hawk products --category wallets --gender men
//! hawk product 65f1c2d3e4a5b6c7d8e9f0ab
//!
//! # Sign in and shop
//! hawk login -e asha@example.com
//! hawk cart add 65f1c2d3e4a5b6c7d8e9f0ab
//! hawk checkout --method online
//!
//! # Order history
//! hawk orders list --status processing
//! ```
//!
//! The session is persisted to `HAWK_SESSION_PATH` between runs. See
//! [`hawk_leather_storefront::config`] for every environment variable.

#![cfg_attr(not(test), forbid(unsafe_code))]
// Terminal front end: stdout is the UI
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hawk_leather_core::{Gender, OrderStatus, PaymentMethod};
use hawk_leather_storefront::Storefront;
use hawk_leather_storefront::config::StorefrontConfig;

mod commands;
mod console;
mod error;

use console::{Console, ConsoleNotifier};
use error::CliError;

#[derive(Parser)]
#[command(name = "hawk")]
#[command(author, version, about = "Hawk Leather storefront in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only this category (case-insensitive)
        #[arg(short, long)]
        category: Option<String>,

        /// Only this audience (men, women, unisex)
        #[arg(short, long)]
        gender: Option<Gender>,

        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Show one product
    Product { id: String },
    /// Show customer reviews
    Reviews {
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Write a review
    Review {
        /// Stars, 1 to 5
        #[arg(short, long)]
        rating: u8,

        #[arg(short, long)]
        comment: String,
    },
    /// Log in (password is prompted)
    Login {
        #[arg(short, long)]
        email: String,
    },
    /// Create an account
    Signup,
    /// Log out and forget the saved session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Reset a forgotten password with an emailed OTP
    ForgotPassword,
    /// Update your profile
    Profile,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Show or cancel orders
    Orders {
        #[command(subcommand)]
        action: Option<OrderAction>,
    },
    /// Place an order for the cart
    Checkout {
        /// cod or online
        #[arg(short, long, default_value = "cod")]
        method: PaymentMethod,

        /// Change the delivery address first
        #[arg(long)]
        edit_address: bool,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with totals
    Show,
    /// Add one unit of a product
    Add { product_id: String },
    /// Remove a product entirely
    Remove { product_id: String },
    /// Set a product's quantity (0 removes it)
    Set { product_id: String, quantity: i64 },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders
    List {
        #[arg(short, long)]
        status: Option<OrderStatus>,

        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Cancel a processing order
    Cancel { order_id: String },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hawk_leather_storefront=warn,hawk_leather_cli=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _sentry_guard = init_sentry(&config);
    init_tracing();

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Storefront failures were already shown as notices
            if !e.already_reported() {
                eprintln!("error: {e}");
            }
            tracing::debug!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), CliError> {
    let mut store =
        Storefront::open(config, Arc::new(ConsoleNotifier)).map_err(CliError::Startup)?;
    store.start().await.map_err(CliError::Startup)?;

    let mut console = Console::new();

    match cli.command {
        Commands::Products {
            category,
            gender,
            page,
        } => commands::catalog::products(&mut store, category, gender, page).await?,
        Commands::Product { id } => commands::catalog::product(&mut store, &id).await?,
        Commands::Reviews { page } => commands::catalog::reviews(&mut store, page).await?,
        Commands::Review { rating, comment } => {
            commands::catalog::review(&mut store, rating, &comment).await?;
        }
        Commands::Login { email } => {
            commands::account::login(&mut store, &mut console, &email).await?;
        }
        Commands::Signup => commands::account::signup(&mut store, &mut console).await?,
        Commands::Logout => commands::account::logout(&mut store),
        Commands::Whoami => commands::account::whoami(&store),
        Commands::ForgotPassword => {
            commands::account::forgot_password(&store, &mut console).await?;
        }
        Commands::Profile => commands::account::profile(&mut store, &mut console).await?,
        Commands::Cart { action } => match action.unwrap_or(CartAction::Show) {
            CartAction::Show => commands::cart::show(&mut store).await?,
            CartAction::Add { product_id } => commands::cart::add(&mut store, &product_id).await?,
            CartAction::Remove { product_id } => {
                commands::cart::remove(&mut store, &product_id).await?;
            }
            CartAction::Set {
                product_id,
                quantity,
            } => commands::cart::set(&mut store, &product_id, quantity).await?,
        },
        Commands::Orders { action } => match action.unwrap_or(OrderAction::List {
            status: None,
            page: 1,
        }) {
            OrderAction::List { status, page } => {
                commands::orders::list(&mut store, status, page).await?;
            }
            OrderAction::Cancel { order_id } => {
                commands::orders::cancel(&mut store, &order_id).await?;
            }
        },
        Commands::Checkout {
            method,
            edit_address,
        } => commands::checkout::run(&mut store, &mut console, method, edit_address).await?,
    }
    Ok(())
}
