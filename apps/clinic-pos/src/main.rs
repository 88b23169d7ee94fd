//! # Clinic POS Command Line
//!
//! Drives the command layer from a terminal.
//!
//! ## Usage
//! ```bash
//! # Print an argon2 hash for an [[accounts]] entry
//! clinic-pos hash-password 'correct horse'
//!
//! # Catalog
//! clinic-pos --email admin@clinic.ph --password ... services add "CBC" 350 "Complete blood count"
//! clinic-pos services list --query cbc --filter available
//!
//! # Checkout (invoice PDF is written to the output directory)
//! clinic-pos checkout --customer "Ana Reyes" --service <ID> --service <ID> --discount 10
//!
//! # Dashboard for the last 30 days, refreshed live
//! clinic-pos dashboard --preset last-30-days --watch
//! ```
//!
//! Credentials may also come from `CLINIC_EMAIL` / `CLINIC_PASSWORD`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;

use clinic_core::{AvailabilityFilter, Capability, DateWindow, ExpenseInput, ServiceInput, WindowPreset};
use clinic_pos::commands::{auth, cart, checkout, config, dashboard, expense, receipt, service};
use clinic_pos::state::AppConfig;
use clinic_pos::{auth::hash_password, init_tracing, App};
use clinic_receipt::DocumentKind;

#[derive(Parser)]
#[command(name = "clinic-pos")]
#[command(author, version, about = "Clinic point-of-sale")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "CLINIC_CONFIG")]
    config: Option<PathBuf>,

    /// Account email
    #[arg(long, global = true, env = "CLINIC_EMAIL")]
    email: Option<String>,

    /// Account password
    #[arg(long, global = true, env = "CLINIC_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the service catalog
    Services {
        #[command(subcommand)]
        action: ServiceAction,
    },
    /// Sell one or more services to a customer
    Checkout {
        /// Customer name printed on the invoice
        #[arg(long)]
        customer: String,

        /// Service id; repeat to add several lines
        #[arg(long = "service", required = true)]
        services: Vec<String>,

        /// Discount percent, e.g. `10` or `12.5`
        #[arg(long, default_value = "")]
        discount: String,
    },
    /// Browse, re-render or delete past transactions
    Receipts {
        #[command(subcommand)]
        action: ReceiptAction,
    },
    /// Manage the expense ledger
    Expenses {
        #[command(subcommand)]
        action: ExpenseAction,
    },
    /// Revenue, expenses and net for a date window
    Dashboard {
        /// `today`, `this-week` or `last-30-days`
        #[arg(long, conflicts_with_all = ["from", "to"])]
        preset: Option<WindowPreset>,

        /// First day (YYYY-MM-DD), local time
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD), local time
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,

        /// Keep printing as data changes
        #[arg(long)]
        watch: bool,
    },
    /// Show the effective configuration (no secrets)
    Config,
    /// Print an argon2 hash for the config file
    HashPassword {
        password: String,
    },
}

#[derive(Subcommand)]
enum ServiceAction {
    /// Search the catalog
    List {
        #[arg(long, default_value = "")]
        query: String,

        /// `all`, `available` or `unavailable`
        #[arg(long, default_value = "all")]
        filter: AvailabilityFilter,
    },
    /// Create a service
    Add {
        title: String,
        price: String,
        details: String,

        /// Create it hidden from checkout
        #[arg(long)]
        unavailable: bool,
    },
    /// Change fields of an existing service
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        price: Option<String>,

        #[arg(long)]
        details: Option<String>,
    },
    /// Flip availability
    Toggle { id: String },
    /// Delete a service (admin only)
    Delete { id: String },
}

#[derive(Subcommand)]
enum ReceiptAction {
    /// List all transactions, newest first
    List,
    /// Write an invoice or receipt PDF for a transaction
    Render {
        id: String,

        /// `invoice` or `receipt`
        #[arg(long, default_value = "receipt")]
        kind: DocumentKind,
    },
    /// Delete a transaction (admin only)
    Delete { id: String },
}

#[derive(Subcommand)]
enum ExpenseAction {
    /// List the ledger with its total
    List,
    /// Record an expense
    Add {
        amount: String,

        #[arg(long, default_value = "")]
        note: String,
    },
    /// Delete an expense (admin only)
    Delete { id: String },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Commands::HashPassword { password } = &cli.command {
        println!("{}", hash_password(password).map_err(|e| e.to_string())?);
        return Ok(());
    }

    let app = App::from_config(AppConfig::load(cli.config)?).await?;
    if let (Some(email), Some(password)) = (&cli.email, &cli.password) {
        auth::login(&app.session, email, password)?;
    }

    let result = dispatch(&app, cli.command).await;
    app.close().await;
    result
}

async fn dispatch(app: &App, command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Services { action } => run_services(app, action).await,
        Commands::Checkout {
            customer,
            services,
            discount,
        } => {
            for id in &services {
                cart::add_to_cart(&app.db, &app.cart, &app.session, id).await?;
            }
            cart::set_customer_name(&app.cart, &customer);
            cart::set_discount(&app.cart, &discount);

            let outcome =
                checkout::checkout(&app.db, &app.cart, &app.session, &app.pending, &app.documents)
                    .await?;
            print_json(&outcome)
        }
        Commands::Receipts { action } => run_receipts(app, action).await,
        Commands::Expenses { action } => run_expenses(app, action).await,
        Commands::Dashboard {
            preset,
            from,
            to,
            watch,
        } => {
            let offset = app.config.offset();
            let window = match (from, to) {
                (Some(from), Some(to)) => DateWindow::custom(from, to, offset),
                _ => DateWindow::preset(preset.unwrap_or(WindowPreset::Today), Utc::now(), offset),
            };

            if watch {
                watch_dashboard(app, window).await
            } else {
                print_json(&dashboard::dashboard_snapshot(&app.db, &app.session, &window).await?)
            }
        }
        Commands::Config => print_json(&config::get_config(&app.config)),
        Commands::HashPassword { .. } => Ok(()),
    }
}

async fn run_services(app: &App, action: ServiceAction) -> Result<(), Box<dyn Error>> {
    match action {
        ServiceAction::List { query, filter } => {
            print_json(&service::list_services(&app.db, &app.session, &query, filter).await?)
        }
        ServiceAction::Add {
            title,
            price,
            details,
            unavailable,
        } => {
            let input = ServiceInput {
                title,
                details,
                price,
                available: !unavailable,
            };
            print_json(&service::save_service(&app.db, &app.session, None, &input).await?)
        }
        ServiceAction::Update {
            id,
            title,
            price,
            details,
        } => {
            let existing = service::get_service(&app.db, &app.session, &id).await?;
            let current_price = existing.price().format_grouped();
            let input = ServiceInput {
                title: title.unwrap_or(existing.title),
                details: details.unwrap_or(existing.details),
                price: price.unwrap_or(current_price),
                available: existing.available,
            };
            print_json(&service::save_service(&app.db, &app.session, Some(&id), &input).await?)
        }
        ServiceAction::Toggle { id } => {
            print_json(&service::toggle_service(&app.db, &app.session, &id).await?)
        }
        ServiceAction::Delete { id } => {
            service::delete_service(&app.db, &app.session, &app.pending, &id).await?;
            println!("Deleted service {id}");
            Ok(())
        }
    }
}

async fn run_receipts(app: &App, action: ReceiptAction) -> Result<(), Box<dyn Error>> {
    match action {
        ReceiptAction::List => print_json(&receipt::list_receipts(&app.db, &app.session).await?),
        ReceiptAction::Render { id, kind } => {
            let path =
                receipt::render_document(&app.db, &app.session, &app.documents, &id, kind).await?;
            println!("{}", path.display());
            Ok(())
        }
        ReceiptAction::Delete { id } => {
            receipt::delete_receipt(&app.db, &app.session, &app.pending, &id).await?;
            println!("Deleted transaction {id}");
            Ok(())
        }
    }
}

async fn run_expenses(app: &App, action: ExpenseAction) -> Result<(), Box<dyn Error>> {
    match action {
        ExpenseAction::List => print_json(&expense::list_expenses(&app.db, &app.session).await?),
        ExpenseAction::Add { amount, note } => {
            let input = ExpenseInput { amount, note };
            print_json(&expense::add_expense(&app.db, &app.session, &input).await?)
        }
        ExpenseAction::Delete { id } => {
            expense::delete_expense(&app.db, &app.session, &app.pending, &id).await?;
            println!("Deleted expense {id}");
            Ok(())
        }
    }
}

/// Prints every view the live dashboard publishes until the process is
/// interrupted.
async fn watch_dashboard(app: &App, window: DateWindow) -> Result<(), Box<dyn Error>> {
    app.session.authorize(Capability::ViewReports)?;

    let handle = app.live_dashboard(window);
    let mut views = handle.subscribe();
    while views.changed().await.is_ok() {
        let view = views.borrow_and_update().clone();
        if let Some(view) = view {
            print_json(&view.snapshot)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
