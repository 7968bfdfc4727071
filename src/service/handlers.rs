use chrono::NaiveDate;

use super::format::{format_currency, format_date};
use crate::db::InvoiceStore;
use crate::models::{Intent, Invoice};

pub const FAREWELL: &str = "Goodbye! Thanks for using the Invoice Chatbot.";

/// 根据意图查询发票库并生成回复
pub fn answer(intent: &Intent, store: &InvoiceStore, today: NaiveDate) -> String {
    match intent {
        Intent::Exit => FAREWELL.to_string(),
        Intent::ShowAll => show_all(store),
        Intent::DueSoon { days } => due_soon(store, *days, today),
        Intent::VendorTotal { vendor } => vendor_total(store, vendor),
        Intent::VendorsAbove { amount } => {
            let invoices = store.above(amount);
            let threshold = format_currency(amount);
            if invoices.is_empty() {
                return format!("No vendors have invoices above {}.", threshold);
            }
            let lines = invoices
                .iter()
                .map(|inv| format!("- {} ({})", inv.vendor, format_currency(&inv.total)));
            with_header(format!("Vendors with invoices > {}:", threshold), lines)
        }
        Intent::Overdue => {
            let invoices = store.overdue(today);
            if invoices.is_empty() {
                return "No invoices are overdue.".to_string();
            }
            let header = format!(
                "{} overdue invoice{}:",
                invoices.len(),
                plural(invoices.len())
            );
            with_header(header, invoices.iter().map(|inv| due_line(inv)))
        }
    }
}

fn show_all(store: &InvoiceStore) -> String {
    let lines = store.all().iter().map(|inv| {
        format!(
            "- {}: {}, due {}, {}",
            inv.vendor,
            inv.invoice_number,
            format_date(&inv.due_date),
            format_currency(&inv.total)
        )
    });
    with_header("All invoices:".to_string(), lines)
}

fn due_soon(store: &InvoiceStore, days: u64, today: NaiveDate) -> String {
    let invoices = store.due_within(days, today);
    if invoices.is_empty() {
        return format!("No invoices are due in the next {} days.", days);
    }
    let header = format!(
        "{} invoice{} due in the next {} days:",
        invoices.len(),
        plural(invoices.len()),
        days
    );
    with_header(header, invoices.iter().map(|inv| due_line(inv)))
}

fn vendor_total(store: &InvoiceStore, vendor: &str) -> String {
    match store.by_vendor(vendor) {
        Some(inv) => format!(
            "Total value of invoice from {}: {}",
            inv.vendor,
            format_currency(&inv.total)
        ),
        None => format!("No invoice found from {}.", vendor),
    }
}

fn due_line(inv: &Invoice) -> String {
    format!(
        "- {}, due {}, {}",
        inv.vendor,
        format_date(&inv.due_date),
        format_currency(&inv.total)
    )
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn with_header(header: String, lines: impl Iterator<Item = String>) -> String {
    let mut out = header;
    for line in lines {
        out.push('\n');
        out.push_str(&line);
    }
    out
}
