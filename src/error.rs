//! 错误类型

use std::path::PathBuf;

use thiserror::Error;

/// 启动阶段的顶层错误
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("invoice source error: {0}")]
    Source(#[from] SourceError),

    #[error("responder error: {0}")]
    Responder(#[from] ResponderError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[from] config::ConfigError),
}

/// 发票数据加载错误
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid csv in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid json in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported invoice file type: {0}")]
    UnsupportedFormat(PathBuf),
}

/// 自然语言兜底调用错误
#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("responder is not available")]
    Unavailable,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("empty completion")]
    EmptyCompletion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SourceError::UnsupportedFormat(PathBuf::from("invoices.xml"));
        assert_eq!(err.to_string(), "unsupported invoice file type: invoices.xml");

        let err = ResponderError::Status {
            status: 503,
            body: "loading".to_string(),
        };
        assert_eq!(err.to_string(), "model endpoint returned 503: loading");

        let err: AppError = ResponderError::Unavailable.into();
        assert_eq!(err.to_string(), "responder error: responder is not available");
    }
}
