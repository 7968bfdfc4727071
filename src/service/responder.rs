//! 自然语言兜底: 没有规则命中时把原始问题交给 OpenAI 兼容的模型接口

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ResponderConfig;
use crate::error::ResponderError;
use crate::models::Invoice;

/// 模型回答为空时的回复
pub const NO_ANSWER: &str = "I'm not sure how to answer that question.";

#[async_trait]
pub trait Responder: Send + Sync {
    fn is_available(&self) -> bool;

    async fn respond(&self, query: &str) -> Result<String, ResponderError>;
}

/// 不可用的兜底 (未配置模型时使用)
#[derive(Debug, Default)]
pub struct Unavailable;

#[async_trait]
impl Responder for Unavailable {
    fn is_available(&self) -> bool {
        false
    }

    async fn respond(&self, _query: &str) -> Result<String, ResponderError> {
        Err(ResponderError::Unavailable)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// 基于 chat/completions 的兜底应答
pub struct LlmResponder {
    client: reqwest::Client,
    config: ResponderConfig,
    context: String,
    available: bool,
}

impl LlmResponder {
    /// 创建并探测模型服务, 探测失败则标记为不可用
    pub async fn connect(config: ResponderConfig, invoices: &[Invoice]) -> Result<Self, ResponderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let mut responder = Self {
            client,
            context: invoice_context(invoices),
            config,
            available: false,
        };

        tracing::info!("Checking model endpoint {}", responder.config.base_url);
        match responder.check_endpoint().await {
            Ok(()) => {
                tracing::info!("Model {} is available", responder.config.model);
                responder.available = true;
            }
            Err(e) => {
                tracing::warn!("Could not reach model endpoint: {}", e);
                tracing::warn!("Falling back to rule-based responses only");
            }
        }

        Ok(responder)
    }

    async fn check_endpoint(&self) -> Result<(), ResponderError> {
        let url = format!("{}/models", self.config.base_url.trim_end_matches('/'));
        let response = self.authorized(self.client.get(url)).send().await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(())
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl Responder for LlmResponder {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn respond(&self, query: &str) -> Result<String, ResponderError> {
        if !self.available {
            return Err(ResponderError::Unavailable);
        }

        let request = ChatRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            messages: vec![Message {
                role: "user",
                content: build_prompt(&self.context, query),
            }],
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self.authorized(self.client.post(url)).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .ok_or(ResponderError::EmptyCompletion)?
            .message
            .content
            .unwrap_or_default();

        tracing::debug!("Model answered with {} chars", content.len());
        Ok(first_line_answer(&content))
    }
}

async fn status_error(response: reqwest::Response) -> ResponderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ResponderError::Status { status, body }
}

/// 发票数据上下文
pub fn invoice_context(invoices: &[Invoice]) -> String {
    let mut context = String::from("Available invoice data:\n");
    for inv in invoices {
        context.push_str(&format!(
            "- {}: Invoice #{}, Date: {}, Due: {}, Total: ${}\n",
            inv.vendor,
            inv.invoice_number,
            inv.invoice_date,
            inv.due_date,
            inv.total.with_scale(2)
        ));
    }
    context
}

pub fn build_prompt(context: &str, query: &str) -> String {
    format!(
        "You are an invoice assistant. Based on the following invoice data, answer the user's question concisely.\n\n\
         {}\n\
         User question: {}\n\
         Assistant: ",
        context, query
    )
}

/// 只取回答的第一行, 去掉模型回显的 "Assistant:" 前缀
pub fn first_line_answer(generated: &str) -> String {
    let answer = generated
        .rsplit("Assistant: ")
        .next()
        .unwrap_or_default()
        .trim()
        .lines()
        .next()
        .unwrap_or_default()
        .trim();

    if answer.is_empty() {
        NO_ANSWER.to_string()
    } else {
        answer.to_string()
    }
}
