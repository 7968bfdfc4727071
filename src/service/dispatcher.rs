use chrono::NaiveDate;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;

use super::handlers;
use super::matcher::recognize_lower;
use super::responder::Responder;
use crate::db::{self, InvoiceStore};
use crate::error::ResponderError;
use crate::models::{Intent, Reply, ReplySource};

pub const HELP_TEXT: &str = r#"I can help you with invoice queries! Try asking:

• "How many invoices are due in the next 7 days?"
• "What is the total value of the invoice from Amazon?"
• "List all vendors with invoices > $2,000"
• "Show me all invoices"
• "What invoices are overdue?"

Type 'quit', 'exit', or 'bye' to exit."#;

/// 查询分发: 规则优先, 其次自然语言兜底, 最后返回帮助信息
pub struct Dispatcher {
    store: InvoiceStore,
    responder: Box<dyn Responder>,
    running: bool,
    today: Option<NaiveDate>, // 固定日期, 为空时取本地当天
}

impl Dispatcher {
    pub fn new(store: InvoiceStore, responder: Box<dyn Responder>) -> Self {
        Self {
            store,
            responder,
            running: true,
            today: None,
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn responder_available(&self) -> bool {
        self.responder.is_available()
    }

    pub async fn process_query(&mut self, query: &str) -> String {
        self.handle(query).await.text
    }

    /// 处理单条查询, 任何失败都转成文本回复
    pub async fn handle(&mut self, query: &str) -> Reply {
        let reply = match AssertUnwindSafe(self.dispatch(query)).catch_unwind().await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                tracing::error!("Responder failed: {}", e);
                error_reply(&e)
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!("Query processing panicked: {}", message);
                error_reply(&message)
            }
        };

        tracing::debug!(source = ?reply.source, "Query handled");
        reply
    }

    async fn dispatch(&mut self, query: &str) -> Result<Reply, ResponderError> {
        let lower = query.to_lowercase();

        if let Some(intent) = recognize_lower(&lower) {
            let kind = intent.kind();
            tracing::debug!("Matched intent {}", kind.as_str());
            if matches!(intent, Intent::Exit) {
                self.running = false;
            }
            let today = self.today.unwrap_or_else(db::today);
            let text = handlers::answer(&intent, &self.store, today);
            return Ok(Reply::new(text, ReplySource::Intent(kind)));
        }

        if self.responder.is_available() {
            tracing::debug!("No intent matched, forwarding to responder");
            let text = self.responder.respond(query).await?;
            return Ok(Reply::new(text, ReplySource::Responder));
        }

        Ok(Reply::new(HELP_TEXT, ReplySource::Help))
    }
}

fn error_reply(message: &dyn std::fmt::Display) -> Reply {
    Reply::new(
        format!("Sorry, I encountered an error: {}", message),
        ReplySource::Error,
    )
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
