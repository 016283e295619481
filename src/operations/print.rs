use crate::models::transaction::Transaction;
use crate::operations::format::{format_date, signed_amount, single_line, truncate};
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

const CARD_WIDTH: usize = 48;
const LABEL_WIDTH: usize = 16;

/// Plain-text rendering of the transaction list, one card per row.
pub fn render_plain(transactions: &[Transaction]) -> String {
    let mut out = String::from("Your Transactions\n\n");

    if transactions.is_empty() {
        out.push_str("No transactions to show.\n");
        return out;
    }

    for tx in transactions {
        let amount = signed_amount(tx);
        let title_width = CARD_WIDTH.saturating_sub(amount.width() + 1);
        let title = truncate(&tx.title, title_width);
        let padding = " ".repeat(title_width.saturating_sub(title.width()));

        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}{} {}", title, padding, amount);
        for (label, value) in card_fields(tx) {
            let _ = writeln!(out, "  {:<width$}{}", label, value, width = LABEL_WIDTH);
        }
        out.push('\n');
    }

    out
}

/// Label/value rows shown under the title on every card.
pub fn card_fields(tx: &Transaction) -> [(&'static str, String); 4] {
    [
        ("Date", format_date(&tx.date)),
        ("Category", single_line(&tx.category)),
        ("Payment Method", single_line(&tx.payment_method)),
        ("Account", single_line(&tx.account)),
    ]
}
