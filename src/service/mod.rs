pub mod dispatcher;
pub mod format;
pub mod handlers;
pub mod matcher;
pub mod responder;

pub use dispatcher::{Dispatcher, HELP_TEXT};
pub use format::{format_currency, format_date};
pub use matcher::{recognize, IntentMatcher, MATCHERS};
pub use responder::{LlmResponder, Responder, Unavailable};
