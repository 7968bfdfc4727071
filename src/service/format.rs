use bigdecimal::BigDecimal;
use chrono::NaiveDate;

/// 金额格式化: $ 前缀, 千分位, 两位小数 (四舍五入)
pub fn format_currency(amount: &BigDecimal) -> String {
    let (cents, _) = amount.round(2).with_scale(2).as_bigint_and_exponent();
    let digits = cents.to_string();
    let (negative, digits) = match digits.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, digits.as_str()),
    };

    let padded = format!("{:0>3}", digits);
    let (int_part, frac_part) = padded.split_at(padded.len() - 2);

    format!(
        "${}{}.{}",
        if negative { "-" } else { "" },
        group_thousands(int_part),
        frac_part
    )
}

/// 日期格式化, 例如 "Aug 30, 2025"
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
