//! Report command - aggregate statistics over the invoice store.

use clap::Args;
use console::style;
use rust_decimal::Decimal;
use tracing::debug;

use invex_core::report::NamedAmount;
use invex_core::{ReportOptions, ReportService, ReportSummary};

use super::load_config;

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Show only the N best vendors and invoices
    #[arg(long)]
    top: Option<usize>,

    /// Add a monthly revenue breakdown for this year
    #[arg(long)]
    year: Option<i32>,

    /// Hide categories below this revenue
    #[arg(long)]
    min_revenue: Option<Decimal>,

    /// Hide vendors with fewer invoices
    #[arg(long)]
    min_count: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ReportFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ReportFormat {
    /// Human readable tables
    Text,
    /// JSON document
    Json,
}

pub async fn run(args: ReportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = invex_core::open_store(&config.store);
    let service = ReportService::from_store(store.as_ref())?;
    debug!("Loaded {} invoices from {}", service.total_invoices(), config.store.path.display());

    let options = ReportOptions {
        top: args.top,
        year: args.year,
        min_revenue: args.min_revenue,
        min_count: args.min_count,
    };
    let summary = service.summary(&options);

    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        ReportFormat::Text => print_summary(&summary),
    }

    Ok(())
}

fn print_summary(summary: &ReportSummary) {
    if summary.total_invoices == 0 {
        println!("{} No invoices stored yet.", style("ℹ").blue());
        return;
    }

    println!("{}", style("Overview").bold());
    println!("  Invoices:        {}", summary.total_invoices);
    println!("  Total revenue:   {}", summary.total_revenue);
    println!("  Average invoice: {}", summary.average_invoice_value);

    print_amounts("Revenue by vendor", &summary.revenue_by_vendor, "");
    print_amounts("Revenue by category", &summary.revenue_by_category, "");
    print_amounts("Category share", &summary.category_share, "%");

    section("Invoices by year");
    for entry in &summary.invoices_by_year {
        println!("  {:<30} {:>8}", entry.label, entry.count);
    }

    section("Invoices per vendor");
    for entry in &summary.vendor_invoice_counts {
        println!("  {:<30} {:>8}", entry.label, entry.count);
    }

    if let Some(monthly) = &summary.monthly_revenue {
        print_amounts(&format!("Monthly revenue {}", monthly.year), &monthly.months, "");
    }

    section("Top invoices");
    for invoice in &summary.top_invoices {
        println!(
            "  {:<14} {:<28} {:<10} {:>12}",
            invoice.invoice_no, invoice.vendor, invoice.date, invoice.total_amount
        );
    }
}

fn print_amounts(title: &str, rows: &[NamedAmount], suffix: &str) {
    section(title);
    if rows.is_empty() {
        println!("  {}", style("(none)").dim());
    }
    for row in rows {
        println!("  {:<30} {:>12}{}", row.label, row.amount, suffix);
    }
}

fn section(title: &str) {
    println!();
    println!("{}", style(title).bold());
}
