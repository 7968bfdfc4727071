use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::InvoiceStore;
use crate::error::SourceError;
use crate::models::Invoice;

/// 发票文件中的一行 (CSV 与 JSON 共用)
#[derive(Debug, Deserialize)]
struct InvoiceRecord {
    vendor: String,
    invoice_number: String,
    invoice_date: NaiveDate,
    due_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_amount")]
    total: BigDecimal,
}

impl From<InvoiceRecord> for Invoice {
    fn from(r: InvoiceRecord) -> Self {
        Invoice::new(r.vendor, r.invoice_number, r.invoice_date, r.due_date, r.total)
    }
}

/// 内置样例数据
pub fn sample_invoices() -> Vec<Invoice> {
    vec![
        sample("Amazon", "INV-0012", (2025, 8, 20), (2025, 9, 5), 245000),
        sample("Microsoft", "INV-0043", (2025, 8, 25), (2025, 9, 10), 310000),
        sample("Google", "INV-0089", (2025, 8, 15), (2025, 8, 30), 180000),
    ]
}

fn sample(
    vendor: &str,
    number: &str,
    invoice_date: (i32, u32, u32),
    due_date: (i32, u32, u32),
    cents: i64,
) -> Invoice {
    let date = |(y, m, d): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
    Invoice::new(
        vendor,
        number,
        date(invoice_date),
        date(due_date),
        BigDecimal::new(cents.into(), 2),
    )
}

/// 创建发票库: 指定文件则按扩展名加载, 否则使用内置样例
pub fn load_store(path: Option<&Path>) -> Result<InvoiceStore, SourceError> {
    let invoices = match path {
        Some(path) => load_invoices(path)?,
        None => {
            tracing::info!("No invoice file configured, using built-in sample data");
            sample_invoices()
        }
    };
    Ok(InvoiceStore::new(invoices))
}

pub fn load_invoices(path: &Path) -> Result<Vec<Invoice>, SourceError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let invoices = match ext.as_deref() {
        Some("csv") => load_csv(path)?,
        Some("json") => load_json(path)?,
        _ => return Err(SourceError::UnsupportedFormat(path.to_path_buf())),
    };

    tracing::info!("Loaded {} invoices from {}", invoices.len(), path.display());
    Ok(invoices)
}

fn load_csv(path: &Path) -> Result<Vec<Invoice>, SourceError> {
    let csv_err = |source| SourceError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let mut invoices = Vec::new();
    for record in reader.deserialize::<InvoiceRecord>() {
        invoices.push(record.map_err(csv_err)?.into());
    }
    Ok(invoices)
}

fn load_json(path: &Path) -> Result<Vec<Invoice>, SourceError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<InvoiceRecord> =
        serde_json::from_str(&raw).map_err(|source| SourceError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(records.into_iter().map(Invoice::from).collect())
}

/// 金额可以是数字或十进制字符串
fn deserialize_amount<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = BigDecimal;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a decimal amount")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<BigDecimal, E> {
            BigDecimal::from_str(v.trim()).map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigDecimal, E> {
            Ok(BigDecimal::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigDecimal, E> {
            Ok(BigDecimal::from(v))
        }

        // f64 的 Display 是最短往返表示, 不会带入二进制误差
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<BigDecimal, E> {
            BigDecimal::from_str(&v.to_string()).map_err(E::custom)
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}
