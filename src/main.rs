use invoice_chatbot::{load_store, shell, AppConfig, AppError, Dispatcher, LlmResponder, Responder, Unavailable};
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 加载配置
    let config_path = AppConfig::resolve_path(std::env::args().nth(1));
    let config = AppConfig::load(config_path.as_deref())?;

    // 初始化日志 - 输出到 stderr, 不干扰对话内容
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(EnvFilter::new(&config.log.level))
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting invoice chatbot: data={:?}, responder enabled={}, model={}",
        config.data.path, config.responder.enabled, config.responder.model
    );

    // 加载发票数据
    let store = load_store(config.data.path.as_deref())?;
    info!("Invoice store ready: {} invoices", store.len());

    // 自然语言兜底
    let responder: Box<dyn Responder> = if config.responder.enabled {
        Box::new(LlmResponder::connect(config.responder.clone(), store.all()).await?)
    } else {
        info!("Responder disabled, using rule-based responses only");
        Box::new(Unavailable)
    };

    let mut dispatcher = Dispatcher::new(store, responder);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    shell::run(&mut dispatcher, stdin, tokio::io::stdout()).await?;

    info!("Session closed");
    Ok(())
}
