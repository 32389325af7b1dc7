//! New-invoice notifications.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::NotifyError;
use crate::models::config::NotifyConfig;
use crate::models::invoice::InvoiceRecord;

/// A rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Summary of a newly stored invoice.
    pub fn render(record: &InvoiceRecord) -> Self {
        let mut body = String::from("Invoice Summary\n\n");
        // Writing to a String cannot fail.
        let _ = writeln!(body, "Invoice No: {}", record.invoice_no);
        let _ = writeln!(body, "Vendor: {}", record.vendor);
        let _ = writeln!(body, "Date: {}", record.date);
        let _ = writeln!(body, "Total Amount: ${}", format_money(record.total_amount));
        body.push_str("\nItems:\n");
        for item in &record.items {
            let _ = writeln!(
                body,
                "- {} | ${} | {}",
                item.name,
                format_money(item.price),
                item.category
            );
        }

        Self {
            subject: format!("New Invoice Processed - {}", record.invoice_no),
            body,
        }
    }
}

/// Delivers notifications somewhere.
pub trait Notifier {
    fn notify(&self, record: &InvoiceRecord) -> Result<(), NotifyError>;
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, record: &InvoiceRecord) -> Result<(), NotifyError> {
        let message = Notification::render(record);
        info!("{}", message.subject);
        debug!("{}", message.body);
        Ok(())
    }
}

/// Writes one `<invoice_id>.txt` file per notification into a directory.
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    dir: PathBuf,
}

impl OutboxNotifier {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Notifier for OutboxNotifier {
    fn notify(&self, record: &InvoiceRecord) -> Result<(), NotifyError> {
        let message = Notification::render(record);
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(format!("{}.txt", record.invoice_id));
        fs::write(&path, format!("Subject: {}\n\n{}", message.subject, message.body))?;
        info!("Notification written to {}", path.display());
        Ok(())
    }
}

/// Notifier selected by configuration, `None` when disabled.
pub fn notifier_from_config(config: &NotifyConfig) -> Option<Box<dyn Notifier>> {
    if !config.enabled {
        return None;
    }
    Some(match &config.outbox {
        Some(dir) => Box::new(OutboxNotifier::new(dir.clone())),
        None => Box::new(LogNotifier),
    })
}

/// `1234.5` as `1,234.50`.
fn format_money(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2));
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::new();
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{}{}.{}", sign, grouped, fraction)
}
