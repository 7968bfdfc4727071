use bigdecimal::BigDecimal;
use chrono::{Days, Local, NaiveDate};

use crate::models::Invoice;

/// 当前本地日期
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// 内存发票库 (构建后只读, 保持加载顺序)
#[derive(Debug, Clone, Default)]
pub struct InvoiceStore {
    invoices: Vec<Invoice>,
}

impl InvoiceStore {
    pub fn new(invoices: Vec<Invoice>) -> Self {
        Self { invoices }
    }

    /// 全部发票, 按加载顺序
    pub fn all(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    /// 到期日落在 [today, today + days] 闭区间内的发票
    pub fn due_within(&self, days: u64, today: NaiveDate) -> Vec<&Invoice> {
        // 上界溢出日历范围时视为无上界
        let until = today.checked_add_days(Days::new(days));
        self.invoices
            .iter()
            .filter(|inv| inv.due_date >= today && until.map_or(true, |end| inv.due_date <= end))
            .collect()
    }

    /// 按供应商名称查找 (忽略大小写, 取第一条)
    pub fn by_vendor(&self, name: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|inv| inv.is_from(name))
    }

    /// 总额严格大于 amount 的发票
    pub fn above(&self, amount: &BigDecimal) -> Vec<&Invoice> {
        self.invoices.iter().filter(|inv| &inv.total > amount).collect()
    }

    /// 到期日早于 today 的发票
    pub fn overdue(&self, today: NaiveDate) -> Vec<&Invoice> {
        self.invoices.iter().filter(|inv| inv.due_date < today).collect()
    }
}
