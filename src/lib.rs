pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;
pub mod shell;

pub use crate::config::AppConfig;
pub use db::{load_store, InvoiceStore};
pub use error::AppError;
pub use service::{Dispatcher, LlmResponder, Responder, Unavailable};
