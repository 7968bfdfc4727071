use bigdecimal::BigDecimal;
use chrono::NaiveDate;

/// 发票记录 (加载后只读)
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub vendor: String,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total: BigDecimal, // 含税总额
}

impl Invoice {
    pub fn new(
        vendor: impl Into<String>,
        invoice_number: impl Into<String>,
        invoice_date: NaiveDate,
        due_date: NaiveDate,
        total: BigDecimal,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            invoice_number: invoice_number.into(),
            invoice_date,
            due_date,
            total,
        }
    }

    /// 供应商名称比较 (忽略大小写)
    pub fn is_from(&self, vendor: &str) -> bool {
        self.vendor.to_lowercase() == vendor.to_lowercase()
    }
}
