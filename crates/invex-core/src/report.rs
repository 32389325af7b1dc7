//! Aggregate queries over stored invoices.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::StoreError;
use crate::invoice::rules::dates::DATE_FORMAT;
use crate::models::invoice::InvoiceRecord;
use crate::store::InvoiceStore;

/// A labelled money amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedAmount {
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl NamedAmount {
    fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// A labelled count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCount {
    pub label: String,
    pub count: usize,
}

/// Filters applied to [`ReportService::summary`].
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Keep only the N best vendors and invoices.
    pub top: Option<usize>,
    /// Include a monthly breakdown for this year.
    pub year: Option<i32>,
    /// Drop categories below this revenue.
    pub min_revenue: Option<Decimal>,
    /// Drop vendors with fewer invoices.
    pub min_count: Option<usize>,
}

/// All report sections at once.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub total_invoices: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_invoice_value: Decimal,
    pub revenue_by_vendor: Vec<NamedAmount>,
    pub revenue_by_category: Vec<NamedAmount>,
    /// Percent of item revenue per category.
    pub category_share: Vec<NamedAmount>,
    pub invoices_by_year: Vec<NamedCount>,
    pub vendor_invoice_counts: Vec<NamedCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_revenue: Option<MonthlyRevenue>,
    pub top_invoices: Vec<InvoiceRecord>,
}

/// Revenue per calendar month of one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    pub year: i32,
    /// January first.
    pub months: Vec<NamedAmount>,
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Number of invoices listed when no top-N is requested.
const DEFAULT_TOP_INVOICES: usize = 5;

/// Reporting over a snapshot of the store.
#[derive(Debug, Clone, Default)]
pub struct ReportService {
    invoices: Vec<InvoiceRecord>,
}

impl ReportService {
    pub fn new(invoices: Vec<InvoiceRecord>) -> Self {
        Self { invoices }
    }

    /// Snapshot every record currently in `store`.
    pub fn from_store(store: &dyn InvoiceStore) -> Result<Self, StoreError> {
        Ok(Self::new(store.load()?))
    }

    pub fn total_revenue(&self) -> Decimal {
        saturating_sum(self.invoices.iter().map(|i| i.total_amount))
    }

    pub fn total_invoices(&self) -> usize {
        self.invoices.len()
    }

    /// Mean invoice total rounded to cents; zero for an empty store.
    pub fn average_invoice_value(&self) -> Decimal {
        if self.invoices.is_empty() {
            return Decimal::ZERO;
        }
        (self.total_revenue() / Decimal::from(self.invoices.len())).round_dp(2)
    }

    /// Invoice totals per vendor, largest first.
    pub fn revenue_by_vendor(&self, top: Option<usize>) -> Vec<NamedAmount> {
        let mut totals: HashMap<&str, Decimal> = HashMap::new();
        for invoice in &self.invoices {
            let total = totals.entry(invoice.vendor.as_str()).or_default();
            *total = total.saturating_add(invoice.total_amount);
        }

        let mut ranked = sorted_amounts(totals);
        if let Some(n) = top {
            ranked.truncate(n);
        }
        ranked
    }

    /// Item prices summed per category, largest first.
    pub fn revenue_by_category(&self, min_revenue: Option<Decimal>) -> Vec<NamedAmount> {
        let mut ranked = sorted_amounts(self.category_totals());
        if let Some(min) = min_revenue {
            ranked.retain(|entry| entry.amount >= min);
        }
        ranked
    }

    /// Each category's share of total item revenue, in percent.
    pub fn category_share(&self) -> Vec<NamedAmount> {
        let item_revenue = saturating_sum(self.invoices.iter().map(|i| i.items_total()));
        if item_revenue.is_zero() {
            return Vec::new();
        }

        sorted_amounts(self.category_totals())
            .into_iter()
            .map(|entry| {
                let percent = (entry.amount / item_revenue * Decimal::ONE_HUNDRED).round_dp(2);
                NamedAmount::new(entry.label, percent)
            })
            .collect()
    }

    /// Invoice count per year; undated invoices count under "Unknown".
    pub fn invoices_by_year(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for invoice in &self.invoices {
            *counts.entry(invoice.year().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Twelve monthly totals for `year`. Undated invoices are skipped.
    pub fn monthly_revenue(&self, year: i32) -> MonthlyRevenue {
        let mut buckets = [Decimal::ZERO; 12];
        for invoice in &self.invoices {
            let Ok(date) = NaiveDate::parse_from_str(&invoice.date, DATE_FORMAT) else {
                continue;
            };
            if date.year() == year {
                let bucket = &mut buckets[date.month0() as usize];
                *bucket = bucket.saturating_add(invoice.total_amount);
            }
        }

        MonthlyRevenue {
            year,
            months: MONTHS
                .iter()
                .zip(buckets)
                .map(|(month, amount)| NamedAmount::new(*month, amount))
                .collect(),
        }
    }

    /// Invoices per vendor, most first.
    pub fn vendor_invoice_counts(&self, min_count: Option<usize>) -> Vec<NamedCount> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for invoice in &self.invoices {
            *counts.entry(invoice.vendor.as_str()).or_insert(0) += 1;
        }

        let mut ranked: Vec<NamedCount> = counts
            .into_iter()
            .filter(|(_, count)| min_count.is_none_or(|min| *count >= min))
            .map(|(label, count)| NamedCount {
                label: label.to_string(),
                count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
        ranked
    }

    /// The `n` invoices with the largest totals.
    pub fn top_invoices(&self, n: usize) -> Vec<&InvoiceRecord> {
        let mut ranked: Vec<&InvoiceRecord> = self.invoices.iter().collect();
        ranked.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
        ranked.truncate(n);
        ranked
    }

    pub fn summary(&self, options: &ReportOptions) -> ReportSummary {
        ReportSummary {
            total_invoices: self.total_invoices(),
            total_revenue: self.total_revenue(),
            average_invoice_value: self.average_invoice_value(),
            revenue_by_vendor: self.revenue_by_vendor(options.top),
            revenue_by_category: self.revenue_by_category(options.min_revenue),
            category_share: self.category_share(),
            invoices_by_year: self
                .invoices_by_year()
                .into_iter()
                .map(|(label, count)| NamedCount { label, count })
                .collect(),
            vendor_invoice_counts: self.vendor_invoice_counts(options.min_count),
            monthly_revenue: options.year.map(|year| self.monthly_revenue(year)),
            top_invoices: self
                .top_invoices(options.top.unwrap_or(DEFAULT_TOP_INVOICES))
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    fn category_totals(&self) -> HashMap<&str, Decimal> {
        let mut totals: HashMap<&str, Decimal> = HashMap::new();
        for item in self.invoices.iter().flat_map(|i| &i.items) {
            let total = totals.entry(item.category.as_str()).or_default();
            *total = total.saturating_add(item.price);
        }
        totals
    }
}

/// Sum that stops at `Decimal::MAX` instead of panicking.
fn saturating_sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

fn sorted_amounts(totals: HashMap<&str, Decimal>) -> Vec<NamedAmount> {
    let mut ranked: Vec<NamedAmount> = totals
        .into_iter()
        .map(|(label, amount)| NamedAmount::new(label, amount))
        .collect();
    ranked.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.label.cmp(&b.label)));
    ranked
}
