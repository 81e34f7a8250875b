//! Tally CLI
//!
//! Terminal dashboard and tools:
//! - Show the dashboard (stats, recent orders, monthly summary)
//! - Submit issue reports
//! - Convert HTML to plain text
//! - Print a default config file

use anyhow::Context;
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use tally::api::dto::IssueReport;
use tally::client::{BackendClient, BackendConfig, DashboardSummary, Order, ReportClient};
use tally::config::{generate_default_config, Config};
use tally::view::{DashboardView, ViewState};

#[derive(Parser)]
#[command(name = "tally")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operations dashboard in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides config and TALLY_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show stats, recent orders and the monthly summary
    Dashboard {
        /// Summary month (default: current)
        #[arg(short, long)]
        month: Option<u32>,
        /// Summary year (default: current)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// List recent orders
    Orders,

    /// Show the summary for a month
    Summary {
        #[arg(short, long)]
        month: u32,
        #[arg(short, long)]
        year: i32,
    },

    /// Submit an issue report to a Tally server
    Report {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        /// Description (HTML allowed)
        #[arg(long)]
        description: String,
        #[arg(long)]
        organization: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Server root URL
        #[arg(long, default_value = "http://localhost:8090")]
        server: String,
    },

    /// Convert HTML to plain text
    Sanitize {
        html: String,
        /// Keep line breaks from <br> and </p>
        #[arg(long)]
        keep_lines: bool,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print a default config file
    Init,
    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let loaded = Config::load_default();
    tally::logging::init(&tally::config::LoggingConfig {
        level: "warn".to_string(),
        ..loaded.config.logging.clone()
    });
    loaded.log_outcome();
    let config = loaded.config;

    let backend = BackendConfig {
        url: cli.api_url.clone().unwrap_or_else(|| config.backend.url.clone()),
        ..config.backend.clone()
    };

    match cli.command {
        Commands::Dashboard { month, year } => {
            let today = chrono::Local::now().date_naive();
            let month = month.unwrap_or_else(|| today.month());
            let year = year.unwrap_or_else(|| today.year());

            let client = BackendClient::new(backend)?;
            let view = DashboardView::new(month, year);
            view.mount(&client);
            let snapshot = view.settled().await;

            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                return Ok(());
            }

            println!("Dashboard ({:02}/{})", month, year);
            println!();
            print_stats(&snapshot.stats);
            println!();
            print_orders(&snapshot.orders);
            println!();
            print_summary(&snapshot.summary);
        }

        Commands::Orders => {
            let client = BackendClient::new(backend)?;
            let orders = client.recent_orders().await?;
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&orders)?);
            } else {
                print_order_table(&orders);
            }
        }

        Commands::Summary { month, year } => {
            let client = BackendClient::new(backend)?;
            let summary = client.dashboard_summary(month, year).await?;
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary_table(&summary);
            }
        }

        Commands::Report {
            name,
            email,
            subject,
            description,
            organization,
            priority,
            category,
            server,
        } => {
            let report = IssueReport {
                organization,
                priority,
                category,
                ..IssueReport::new(name, email, subject, description)
            };

            let client = ReportClient::new(&server)?;
            let result = client
                .submit(&report)
                .await
                .context("Issue report was not sent")?;

            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Issue report sent.");
            }
        }

        Commands::Sanitize { html, keep_lines } => {
            if keep_lines {
                println!("{}", tally::strip_html_tags(&html));
            } else {
                println!("{}", tally::html_to_plain_text(&html));
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Init => print!("{}", generate_default_config()),
            ConfigAction::Show => {
                println!("backend.url     = {}", config.backend.url);
                println!("api.addr        = {}", config.api.addr());
                println!("relay.url       = {}", config.relay.url);
                println!(
                    "relay.recipient = {}",
                    config.relay.recipient.as_deref().unwrap_or("-")
                );
                println!("logging         = {} ({})", config.logging.level, config.logging.format);
            }
        },
    }

    Ok(())
}

fn print_stats(state: &ViewState<tally::DashboardStats>) {
    println!("== Stats");
    if let Some(error) = state.error() {
        println!("  {}", error);
        return;
    }

    let stats = state.data();
    println!("  Total orders     {:>12}", stats.total_orders);
    println!("  Total revenue    {:>12.2}", stats.total_revenue);
    println!("  Active users     {:>12}", stats.active_users);
    println!("  Conversion rate  {:>11.1}%", stats.conversion_rate);
}

fn print_orders(state: &ViewState<Vec<Order>>) {
    println!("== Recent orders");
    match state.error() {
        Some(error) => println!("  {}", error),
        None => print_order_table(state.data()),
    }
}

fn print_order_table(orders: &[Order]) {
    if orders.is_empty() {
        println!("  No recent orders");
        return;
    }

    println!("  {:<12} {:<24} {:<12} {:>10}", "ID", "CUSTOMER", "STATUS", "AMOUNT");
    for order in orders {
        println!(
            "  {:<12} {:<24} {:<12} {:>10.2}",
            order.id, order.customer, order.status, order.amount
        );
    }
}

fn print_summary(state: &ViewState<DashboardSummary>) {
    println!("== Summary");
    match state.error() {
        Some(error) => println!("  {}", error),
        None => print_summary_table(state.data()),
    }
}

fn print_summary_table(summary: &DashboardSummary) {
    for (name, group) in summary.groups() {
        println!("  {} (total {:.2})", name, group.total());
        for (label, value) in group.iter() {
            println!("    {:<22} {:>10.2}", label, value);
        }
    }
}
