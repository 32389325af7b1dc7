//! Process command - extract data from a single invoice file.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use invex_core::invoice::{InvoiceParser, LayoutParser};
use invex_core::models::invoice::{InvoiceRecord, RawDocument, SourceKind};
use invex_core::{Categorizer, DocumentTextSource, InvoiceAssembler, TextSource};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// List fields that fell back to their defaults
    #[arg(long)]
    show_missing: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per line item
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Reading document...");
    let doc = RawDocument::read(&args.input)?;

    pb.set_message(if doc.kind == SourceKind::Pdf {
        "Extracting PDF text..."
    } else {
        "Running OCR..."
    });
    let source = DocumentTextSource::from_config(&config.ocr);
    let text = source.acquire(&doc)?;
    debug!("Acquired text:\n{}", text);

    pb.set_message("Extracting fields...");
    let parser = LayoutParser::for_document(doc.kind, &text)?;
    let fields = parser.parse(&text);
    let missing = fields.missing_fields.clone();

    let assembler = InvoiceAssembler::new(Categorizer::new(&config.categories));
    let record = assembler.build(&doc, fields);

    pb.finish_and_clear();

    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_missing {
        if missing.is_empty() {
            eprintln!("{} All fields extracted ({} layout)", style("ℹ").blue(), parser.layout());
        } else {
            eprintln!(
                "{} Defaulted fields ({} layout): {}",
                style("ℹ").blue(),
                parser.layout(),
                missing.join(", ")
            );
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_record(record: &InvoiceRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &InvoiceRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "invoice_id",
        "invoice_no",
        "vendor",
        "date",
        "total_amount",
        "item_name",
        "item_price",
        "item_category",
    ])?;

    let invoice_id = record.invoice_id.to_string();
    let total = record.total_amount.to_string();
    if record.items.is_empty() {
        wtr.write_record([
            invoice_id.as_str(),
            record.invoice_no.as_str(),
            record.vendor.as_str(),
            record.date.as_str(),
            total.as_str(),
            "",
            "",
            "",
        ])?;
    }
    for item in &record.items {
        wtr.write_record([
            invoice_id.as_str(),
            record.invoice_no.as_str(),
            record.vendor.as_str(),
            record.date.as_str(),
            total.as_str(),
            item.name.as_str(),
            item.price.to_string().as_str(),
            item.category.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &InvoiceRecord) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Invoice: {}", record.invoice_no);
    let _ = writeln!(output, "Vendor:  {}", record.vendor);
    let _ = writeln!(output, "Date:    {}", record.date);
    let _ = writeln!(output, "Total:   {}", record.total_amount);
    output.push('\n');

    if record.items.is_empty() {
        output.push_str("No line items found.\n");
    } else {
        output.push_str("Items:\n");
        for item in &record.items {
            let _ = writeln!(output, "  {:<40} {:>12}  {}", item.name, item.price, item.category);
        }
    }

    let _ = writeln!(output, "\nFingerprint: {}", record.content_fingerprint);
    output
}
