//! 意图匹配表
//!
//! 每条规则由 (谓词, 参数提取) 组成, 按固定顺序求值。谓词成立但提取失败时
//! 继续尝试下一条规则。

use bigdecimal::BigDecimal;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::models::{Intent, IntentKind};

/// 未指定天数时的默认值
pub const DEFAULT_DUE_DAYS: u64 = 7;

const EXIT_WORDS: &[&str] = &["quit", "exit", "bye"];

// 只识别 ASCII 数字
static DAYS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*days?").expect("Invalid days regex"));

static VENDOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"from\s+(\w+)").expect("Invalid vendor regex"));

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:>|above)\s*\$?([0-9]+(?:,[0-9]{3})*)").expect("Invalid amount regex")
});

/// 一条意图规则
pub struct IntentMatcher {
    pub kind: IntentKind,
    predicate: fn(&str) -> bool,
    extract: fn(&str) -> Option<Intent>,
}

impl IntentMatcher {
    /// 谓词与提取都成功时返回意图 (入参为小写文本)
    pub fn try_match(&self, lower: &str) -> Option<Intent> {
        if !(self.predicate)(lower) {
            return None;
        }
        let intent = (self.extract)(lower);
        if intent.is_none() {
            tracing::debug!("{} matched but extraction failed, falling through", self.kind.as_str());
        }
        intent
    }
}

/// 匹配顺序即优先级
pub static MATCHERS: [IntentMatcher; 6] = [
    IntentMatcher {
        kind: IntentKind::Exit,
        predicate: |q| EXIT_WORDS.iter().any(|w| q.contains(w)),
        extract: |_| Some(Intent::Exit),
    },
    IntentMatcher {
        kind: IntentKind::ShowAll,
        predicate: |q| q.contains("show") && q.contains("all"),
        extract: |_| Some(Intent::ShowAll),
    },
    IntentMatcher {
        kind: IntentKind::DueSoon,
        predicate: |q| q.contains("due") && (q.contains("next") || q.contains("days")),
        extract: |q| {
            Some(Intent::DueSoon {
                days: extract_days(q).unwrap_or(DEFAULT_DUE_DAYS),
            })
        },
    },
    IntentMatcher {
        kind: IntentKind::VendorTotal,
        predicate: |q| q.contains("total") && q.contains("from"),
        extract: |q| extract_vendor(q).map(|vendor| Intent::VendorTotal { vendor }),
    },
    IntentMatcher {
        kind: IntentKind::VendorsAbove,
        predicate: |q| {
            q.contains("list") && q.contains("vendors") && (q.contains('>') || q.contains("above"))
        },
        extract: |q| extract_amount(q).map(|amount| Intent::VendorsAbove { amount }),
    },
    IntentMatcher {
        kind: IntentKind::Overdue,
        predicate: |q| q.contains("overdue"),
        extract: |_| Some(Intent::Overdue),
    },
];

/// 识别查询意图, 返回第一个谓词成立且提取成功的规则结果
pub fn recognize(query: &str) -> Option<Intent> {
    let lower = query.to_lowercase();
    recognize_lower(&lower)
}

pub(crate) fn recognize_lower(lower: &str) -> Option<Intent> {
    MATCHERS.iter().find_map(|m| m.try_match(lower))
}

/// "<数字> day(s)" 中的天数
pub fn extract_days(lower: &str) -> Option<u64> {
    DAYS_RE
        .captures(lower)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// "from" 之后的第一个词
pub fn extract_vendor(lower: &str) -> Option<String> {
    VENDOR_RE
        .captures(lower)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// ">" 或 "above" 之后的金额, 允许 $ 前缀和千分位逗号
pub fn extract_amount(lower: &str) -> Option<BigDecimal> {
    let raw = AMOUNT_RE.captures(lower)?.get(1)?.as_str().replace(',', "");
    BigDecimal::from_str(&raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(query: &str) -> Option<IntentKind> {
        recognize(query).map(|i| i.kind())
    }

    #[test]
    fn test_matcher_table_order() {
        let kinds: Vec<_> = MATCHERS.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IntentKind::Exit,
                IntentKind::ShowAll,
                IntentKind::DueSoon,
                IntentKind::VendorTotal,
                IntentKind::VendorsAbove,
                IntentKind::Overdue,
            ]
        );
    }

    #[test]
    fn test_exit_keywords_any_case() {
        assert_eq!(recognize("Bye"), Some(Intent::Exit));
        assert_eq!(recognize("please exit now"), Some(Intent::Exit));
        assert_eq!(recognize("BYE BYE"), Some(Intent::Exit));
        assert_eq!(recognize("QUIT"), Some(Intent::Exit));
    }

    #[test]
    fn test_exit_is_substring_match() {
        // "exit" 出现在任何位置都触发
        assert_eq!(kind("show all invoices before I exit"), Some(IntentKind::Exit));
    }

    #[test]
    fn test_show_all_beats_overdue() {
        assert_eq!(recognize("show all overdue invoices"), Some(Intent::ShowAll));
    }

    #[test]
    fn test_due_soon_days() {
        assert_eq!(
            recognize("How many invoices are due in the next 30 days?"),
            Some(Intent::DueSoon { days: 30 })
        );
        assert_eq!(
            recognize("anything due within 1 day"),
            None,
            "needs 'next' or 'days'"
        );
        assert_eq!(
            recognize("what is due in 3days"),
            Some(Intent::DueSoon { days: 3 })
        );
    }

    #[test]
    fn test_due_soon_defaults_to_seven() {
        assert_eq!(
            recognize("What is due next?"),
            Some(Intent::DueSoon { days: 7 })
        );
        assert_eq!(
            recognize("invoices due next 99999999999999999999999 days"),
            Some(Intent::DueSoon { days: 7 })
        );
    }

    #[test]
    fn test_vendor_total_extracts_first_token_lowercased() {
        assert_eq!(
            recognize("What is the total value of the invoice from Amazon?"),
            Some(Intent::VendorTotal {
                vendor: "amazon".to_string()
            })
        );
        assert_eq!(
            recognize("total from Acme Corp"),
            Some(Intent::VendorTotal {
                vendor: "acme".to_string()
            })
        );
    }

    #[test]
    fn test_vendor_total_without_token_falls_through() {
        // "from" 后没有词, 落到后面的 overdue 规则
        assert_eq!(kind("total overdue from"), Some(IntentKind::Overdue));
        assert_eq!(recognize("what is the total from"), None);
    }

    #[test]
    fn test_vendors_above_amount() {
        assert_eq!(
            recognize("List all vendors with invoices > $2,000"),
            Some(Intent::VendorsAbove {
                amount: BigDecimal::from(2000)
            })
        );
        assert_eq!(
            recognize("list vendors above 1500"),
            Some(Intent::VendorsAbove {
                amount: BigDecimal::from(1500)
            })
        );
        assert_eq!(
            recognize("List vendors with invoices ABOVE $1,234,567"),
            Some(Intent::VendorsAbove {
                amount: BigDecimal::from(1234567)
            })
        );
    }

    #[test]
    fn test_vendors_above_without_amount_falls_through() {
        assert_eq!(recognize("list vendors above average"), None);
        assert_eq!(kind("list vendors > lots that are overdue"), Some(IntentKind::Overdue));
    }

    #[test]
    fn test_overdue() {
        assert_eq!(recognize("What invoices are overdue?"), Some(Intent::Overdue));
    }

    #[test]
    fn test_unmatched() {
        assert_eq!(recognize("Which vendor has the highest invoice?"), None);
        assert_eq!(recognize(""), None);
    }

    #[test]
    fn test_non_ascii_digits_are_not_numbers() {
        assert_eq!(extract_days("due in the next ٣ days"), None);
        assert_eq!(
            recognize("due in the next ٣ days"),
            Some(Intent::DueSoon { days: DEFAULT_DUE_DAYS })
        );
        assert_eq!(extract_amount("list vendors > ٢٠٠٠"), None);
        assert_eq!(kind("list vendors > ٢٠٠٠ overdue"), Some(IntentKind::Overdue));
    }

    #[test]
    fn test_extract_amount_grouping() {
        assert_eq!(extract_amount("> 2,000"), Some(BigDecimal::from(2000)));
        assert_eq!(extract_amount(">$12,345,678"), Some(BigDecimal::from(12345678)));
        // 逗号分组不足三位时只取前面的数字
        assert_eq!(extract_amount("> 2,00"), Some(BigDecimal::from(2)));
        assert_eq!(extract_amount("above $"), None);
    }
}
