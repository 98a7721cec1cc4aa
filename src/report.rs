use crate::domain::{Transaction, TxKind};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::BTreeMap;

/// Income/expense totals over some slice of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub income: Decimal,
    pub expense: Decimal,
}

impl Summary {
    pub fn balance(&self) -> Decimal {
        self.income - self.expense
    }

    fn add(&mut self, t: &Transaction) {
        match t.kind {
            TxKind::Income => self.income += t.amount,
            TxKind::Expense => self.expense += t.amount,
        }
    }
}

/// Totals over the whole history. `None` when there is nothing to report,
/// which is distinct from a genuine all-zero summary.
pub fn dashboard_summary(transactions: &[Transaction]) -> Option<Summary> {
    if transactions.is_empty() {
        return None;
    }
    let mut summary = Summary::default();
    for t in transactions {
        summary.add(t);
    }
    Some(summary)
}

/// Totals over the transactions whose date carries the given "YYYY-MM" prefix.
/// The caller validates the month format; `None` means no transactions fell in
/// that month.
pub fn monthly_summary(transactions: &[Transaction], month: &str) -> Option<Summary> {
    let mut summary = Summary::default();
    let mut any = false;
    for t in transactions.iter().filter(|t| t.date.starts_with(month)) {
        summary.add(t);
        any = true;
    }
    any.then_some(summary)
}

/// Per-category income/expense totals, grouped on the literal category string
/// (case-sensitive, untrimmed) in first-seen order.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<(String, Summary)> {
    let mut out: Vec<(String, Summary)> = Vec::new();
    for t in transactions {
        let idx = match out.iter().position(|(c, _)| *c == t.category) {
            Some(idx) => idx,
            None => {
                out.push((t.category.clone(), Summary::default()));
                out.len() - 1
            }
        };
        out[idx].1.add(t);
    }
    out
}

/// Month key a date string buckets under: its 7-char "YYYY-MM" prefix, or a
/// sentinel when the string is too short to carry one.
pub fn month_key(date: &str) -> &str {
    date.get(..7).unwrap_or("unknown")
}

/// Expense totals bucketed by month, ascending by month key (lexicographic,
/// which is chronological for well-formed dates).
pub fn spending_trends(transactions: &[Transaction]) -> Vec<(String, Decimal)> {
    let mut monthly: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in transactions {
        if t.kind == TxKind::Expense {
            *monthly
                .entry(month_key(&t.date).to_string())
                .or_insert(Decimal::ZERO) += t.amount;
        }
    }
    monthly.into_iter().collect()
}

/// Common scale for a set of bars: the largest magnitude, floored at 1 so a
/// run of zeros never divides by zero.
pub fn bar_scale(values: &[Decimal]) -> Decimal {
    values.iter().copied().fold(Decimal::ONE, Decimal::max)
}

fn bar_len(value: Decimal, scale: Decimal, width: usize) -> usize {
    (value / scale * Decimal::from(width as u64))
        .floor()
        .to_usize()
        .unwrap_or(0)
        .min(width)
}

/// Fixed-width bar: filled portion in the fill glyph, remainder space-padded.
pub fn padded_bar(value: Decimal, scale: Decimal, width: usize, fill: char) -> String {
    let filled = bar_len(value, scale, width);
    let mut bar = fill.to_string().repeat(filled);
    bar.push_str(&" ".repeat(width - filled));
    bar
}

/// Proportional bar with no trailing padding (trend rows).
pub fn plain_bar(value: Decimal, scale: Decimal, width: usize, fill: char) -> String {
    fill.to_string().repeat(bar_len(value, scale, width))
}
