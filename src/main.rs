//! # Admin Console CLI
//!
//! Loads both collections from the backend, runs one command and shuts the stores down.
//!
//! ```bash
//! admin-console products
//! admin-console orders
//! admin-console stats
//! admin-console export products csv
//! admin-console set-status <order-id> "Out for delivery"
//! admin-console remove-product <product-id>
//! ```

use admin_console::clients::{OrderClient, ProductClient};
use admin_console::config::Settings;
use admin_console::export::ExportOptions;
use admin_console::lifecycle::AdminConsole;
use admin_console::model::{OrderId, OrderStatus, ProductId};
use admin_console::remote::HttpAdminApi;
use admin_console::report::CsvOptions;
use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use sync_framework::tracing::setup_tracing;
use sync_framework::SyncClient;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "admin-console", version, about = "Catalog and order administration")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List products
    Products,
    /// List orders, newest first
    Orders,
    /// Show dashboard figures
    Stats,
    /// Write a report into the output directory
    Export {
        #[arg(value_enum)]
        resource: Resource,
        #[arg(value_enum)]
        format: Format,
    },
    /// Change the status of an order
    SetStatus { order_id: String, status: OrderStatus },
    /// Remove a product from the catalog
    RemoveProduct { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Resource {
    Products,
    Orders,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Pdf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    let settings = Settings::load().context("Failed to load settings")?;
    info!(backend = %settings.backend_url, "Starting admin console");

    let console = AdminConsole::new(
        Arc::new(HttpAdminApi::from_settings(&settings)),
        settings.store_buffer,
        ExportOptions {
            currency: settings.currency.clone(),
            csv: CsvOptions {
                delimiter: settings.csv_delimiter,
            },
        },
    );

    let result = run(&console, &settings, cli.command).await;
    console.shutdown().await?;
    result
}

async fn run(console: &AdminConsole, settings: &Settings, command: Command) -> anyhow::Result<()> {
    console.refresh_all().await?;

    match command {
        Command::Products => print_products(&console.product_client, &settings.currency).await?,
        Command::Orders => print_orders(&console.order_client, &settings.currency).await?,
        Command::Stats => {
            let stats = console.stats().await?;
            println!("Products:      {}", stats.total_products);
            println!("Orders:        {}", stats.total_orders);
            println!("Paid orders:   {}", stats.paid_orders);
            println!("Paid revenue:  {}{}", settings.currency, stats.paid_revenue.normalize());
            for (status, count) in &stats.orders_by_status {
                println!("  {:<18} {}", status.label(), count);
            }
        }
        Command::Export { resource, format } => {
            let now = Utc::now();
            let export = match (resource, format) {
                (Resource::Products, Format::Csv) => console.export_products_csv(now).await?,
                (Resource::Products, Format::Pdf) => console.export_products_document(now).await?,
                (Resource::Orders, Format::Csv) => console.export_orders_csv(now).await?,
                (Resource::Orders, Format::Pdf) => console.export_orders_document(now).await?,
            };
            let path = export
                .write_to(&settings.output_dir)
                .with_context(|| format!("Failed to write {}", export.file_name))?;
            println!("{}", path.display());
        }
        Command::SetStatus { order_id, status } => {
            let order = console
                .order_client
                .set_order_status(OrderId(order_id), status)
                .await?;
            println!("{} -> {}", order.id, order.status);
        }
        Command::RemoveProduct { id } => {
            console.product_client.remove_product(ProductId(id.clone())).await?;
            println!("Removed {id}");
        }
    }
    Ok(())
}

async fn print_products(client: &ProductClient, currency: &str) -> anyhow::Result<()> {
    for product in client.items().await? {
        println!(
            "{}\t{}\t{}/{}\t{}{}{}",
            product.id,
            product.name,
            product.category,
            product.sub_category,
            currency,
            product.price.normalize(),
            if product.bestseller { "\tbestseller" } else { "" }
        );
    }
    Ok(())
}

async fn print_orders(client: &OrderClient, currency: &str) -> anyhow::Result<()> {
    for order in client.items().await? {
        println!(
            "{}\t{}\t{}\t{}\t{}{}\t{}\t{}",
            order.id,
            order.date.format("%Y-%m-%d %H:%M"),
            order.address.full_name(),
            order.items_summary(),
            currency,
            order.amount.normalize(),
            if order.payment { "paid" } else { "pending" },
            order.status
        );
    }
    Ok(())
}
