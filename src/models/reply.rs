use super::IntentKind;

/// 回复来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Intent(IntentKind),
    Responder,
    Help,
    Error,
}

/// 单次查询的处理结果 (不持久化)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    pub fn new(text: impl Into<String>, source: ReplySource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}
