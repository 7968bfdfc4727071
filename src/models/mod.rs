pub mod intent;
pub mod invoice;
pub mod reply;

pub use intent::{Intent, IntentKind};
pub use invoice::Invoice;
pub use reply::{Reply, ReplySource};
