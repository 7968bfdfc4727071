use bigdecimal::BigDecimal;

/// 意图类别，顺序即匹配优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Exit,
    ShowAll,
    DueSoon,
    VendorTotal,
    VendorsAbove,
    Overdue,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::Exit => "exit",
            IntentKind::ShowAll => "show_all",
            IntentKind::DueSoon => "due_soon",
            IntentKind::VendorTotal => "vendor_total",
            IntentKind::VendorsAbove => "vendors_above",
            IntentKind::Overdue => "overdue",
        }
    }
}

/// 识别出的意图及其提取参数
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Exit,
    ShowAll,
    DueSoon { days: u64 },
    /// 供应商取 "from" 之后的第一个词 (已小写)
    VendorTotal { vendor: String },
    VendorsAbove { amount: BigDecimal },
    Overdue,
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::Exit => IntentKind::Exit,
            Intent::ShowAll => IntentKind::ShowAll,
            Intent::DueSoon { .. } => IntentKind::DueSoon,
            Intent::VendorTotal { .. } => IntentKind::VendorTotal,
            Intent::VendorsAbove { .. } => IntentKind::VendorsAbove,
            Intent::Overdue => IntentKind::Overdue,
        }
    }
}
