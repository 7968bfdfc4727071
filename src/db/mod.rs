pub mod source;
pub mod store;

pub use source::{load_invoices, load_store, sample_invoices};
pub use store::{today, InvoiceStore};
