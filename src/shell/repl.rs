use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::service::handlers::FAREWELL;
use crate::service::Dispatcher;

/// 交互式会话: 逐行读取问题直到退出、EOF 或 Ctrl-C
pub async fn run<R, W>(dispatcher: &mut Dispatcher, input: R, output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    run_until(dispatcher, input, output, ctrl_c).await
}

/// 同 run, 中断信号由调用方提供; 等待输入和处理查询期间都会响应中断
pub async fn run_until<R, W, I>(
    dispatcher: &mut Dispatcher,
    input: R,
    mut output: W,
    interrupt: I,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    I: Future<Output = ()>,
{
    tokio::pin!(interrupt);
    write_banner(dispatcher, &mut output).await?;

    let mut lines = input.lines();
    while dispatcher.is_running() {
        output.write_all(b"You: ").await?;
        output.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = &mut interrupt => {
                write_interrupted(&mut output).await?;
                break;
            }
        };

        let Some(line) = line else {
            tracing::info!("Input closed, closing session");
            break;
        };

        let query = line.trim();
        if query.is_empty() {
            continue;
        }

        let reply = tokio::select! {
            reply = dispatcher.process_query(query) => reply,
            _ = &mut interrupt => {
                write_interrupted(&mut output).await?;
                break;
            }
        };
        output.write_all(format!("Bot: {}\n\n", reply).as_bytes()).await?;
    }

    output.flush().await
}

async fn write_interrupted<W: AsyncWrite + Unpin>(output: &mut W) -> std::io::Result<()> {
    tracing::info!("Interrupted, closing session");
    output.write_all(format!("\n\n{}\n", FAREWELL).as_bytes()).await
}

async fn write_banner<W: AsyncWrite + Unpin>(dispatcher: &Dispatcher, output: &mut W) -> std::io::Result<()> {
    let status = if dispatcher.responder_available() {
        "Language model connected - natural language questions are supported."
    } else {
        "Language model not available - using rule-based responses only."
    };

    let banner = format!(
        "Invoice Chatbot\n{}\n{}\nAsk me about your invoices! Type 'help' for examples.\n\n",
        "=".repeat(50),
        status
    );
    output.write_all(banner.as_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{sample_invoices, InvoiceStore};
    use crate::error::ResponderError;
    use crate::service::{Responder, Unavailable};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;

    /// 回答很慢的兜底
    struct SlowResponder;

    #[async_trait]
    impl Responder for SlowResponder {
        fn is_available(&self) -> bool {
            true
        }

        async fn respond(&self, _query: &str) -> Result<String, ResponderError> {
            tokio::time::sleep(Duration::from_millis(800)).await;
            Ok("slow answer".to_string())
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(InvoiceStore::new(sample_invoices()), Box::new(Unavailable))
            .with_today(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap())
    }

    async fn session(input: &str) -> (String, Dispatcher) {
        let mut d = dispatcher();
        let mut out = Vec::new();
        run(&mut d, input.as_bytes(), &mut out).await.unwrap();
        (String::from_utf8(out).unwrap(), d)
    }

    #[tokio::test]
    async fn test_session_skips_blank_lines_and_stops_on_exit() {
        let (out, d) = session("\n   \nWhat invoices are overdue?\nbye\nshow all\n").await;

        assert!(out.contains("Language model not available"));
        assert!(out.contains("Bot: 1 overdue invoice:\n- Google, due Aug 30, 2025, $1,800.00\n\n"));
        assert!(out.contains(&format!("Bot: {}\n\n", FAREWELL)));
        assert!(!out.contains("All invoices:"));
        assert_eq!(out.matches("Bot: ").count(), 2);
        assert!(!d.is_running());
    }

    #[tokio::test]
    async fn test_session_ends_on_eof() {
        let (out, d) = session("  Show me all invoices  ").await;
        assert!(out.contains("Bot: All invoices:\n- Amazon: INV-0012"));
        assert!(d.is_running());
    }

    #[tokio::test]
    async fn test_interrupt_during_query_stops_session() {
        let mut d = Dispatcher::new(InvoiceStore::new(sample_invoices()), Box::new(SlowResponder));
        let mut out = Vec::new();
        let interrupt = tokio::time::sleep(Duration::from_millis(300));

        run_until(&mut d, "who owes the most?\nshow all\n".as_bytes(), &mut out, interrupt)
            .await
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.ends_with(&format!("\n\n{}\n", FAREWELL)));
        assert!(!out.contains("slow answer"));
        assert!(!out.contains("All invoices:"));
        assert_eq!(out.matches("Bot: ").count(), 0);
    }

    #[tokio::test]
    async fn test_interrupt_while_waiting_for_input() {
        let mut d = dispatcher();
        let mut out = Vec::new();
        let (mut writer, reader) = tokio::io::duplex(64);
        writer.write_all(b"What invoices are overdue?\n").await.unwrap();

        let interrupt = tokio::time::sleep(Duration::from_millis(200));
        run_until(&mut d, tokio::io::BufReader::new(reader), &mut out, interrupt)
            .await
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Bot: 1 overdue invoice:"));
        assert!(out.ends_with(&format!("\n\n{}\n", FAREWELL)));
        assert!(d.is_running());
        drop(writer);
    }
}
