use crate::models::transaction::Transaction;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const CURRENCY_SYMBOL: &str = "₹";

/// `Jan 05, 2024`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Rupees in en-IN style: `₹12,34,567.89`. Input is in paise.
pub fn format_amount(minor_units: i64) -> String {
    let value = Decimal::new(minor_units, 2);
    let text = format!("{:.2}", value.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    format!("{}{}{}.{}", sign, CURRENCY_SYMBOL, group_indian(whole), fraction)
}

/// Amount as shown on a card: `-` for expenses, `+` for everything else.
pub fn signed_amount(tx: &Transaction) -> String {
    format!("{}{}", tx.transaction_type.sign(), format_amount(tx.amount))
}

/// Control characters (newlines, tabs) become spaces.
pub fn single_line(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
}

/// Flattens `text` to one line and cuts it to at most `max_width` terminal
/// columns, marking the cut with `…`.
pub fn truncate(text: &str, max_width: usize) -> String {
    let line = single_line(text);
    if line.width() <= max_width {
        return line;
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in line.chars() {
        let width = ch.width().unwrap_or(0);
        if used + width > budget {
            break;
        }
        used += width;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Last three digits together, then groups of two: 1234567 -> 12,34,567.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while head.len() > 2 {
        let (rest, pair) = head.split_at(head.len() - 2);
        groups.push(pair);
        head = rest;
    }
    groups.push(head);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}
