use crate::domain::Transaction;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt::Write as _;

pub const DATE_FMT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

/// Matches of a date-range search, plus the count of stored transactions whose
/// own date failed to parse and were skipped (a data fault the caller reports).
pub struct DateRangeMatches<'a> {
    pub matches: Vec<&'a Transaction>,
    pub skipped: usize,
}

/// Inclusive on both ends.
pub fn filter_by_date_range<'a>(
    transactions: &'a [Transaction],
    start: NaiveDate,
    end: NaiveDate,
) -> DateRangeMatches<'a> {
    let mut matches = Vec::new();
    let mut skipped = 0usize;
    for t in transactions {
        match NaiveDate::parse_from_str(&t.date, DATE_FMT) {
            Ok(date) => {
                if start <= date && date <= end {
                    matches.push(t);
                }
            }
            Err(_) => skipped += 1,
        }
    }
    DateRangeMatches { matches, skipped }
}

/// Case-insensitive exact match on the category field.
pub fn filter_by_category<'a>(
    transactions: &'a [Transaction],
    category: &str,
) -> Vec<&'a Transaction> {
    let wanted = category.to_lowercase();
    transactions
        .iter()
        .filter(|t| t.category.to_lowercase() == wanted)
        .collect()
}

/// Inclusive numeric range on the amount.
pub fn filter_by_amount(
    transactions: &[Transaction],
    min: Decimal,
    max: Decimal,
) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|t| min <= t.amount && t.amount <= max)
        .collect()
}

/// Stable sort into a new ordering; the stored list is never reordered. Date
/// compares the raw date string (chronological for well-formed ISO dates),
/// amount compares numerically.
pub fn sort_transactions(
    transactions: &[Transaction],
    key: SortKey,
    dir: SortDir,
) -> Vec<&Transaction> {
    let mut out: Vec<&Transaction> = transactions.iter().collect();
    out.sort_by(|a, b| {
        let ord = match key {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Amount => a.amount.cmp(&b.amount),
        };
        match dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
    out
}

/// Shared renderer for every search/filter/sort result set (and the plain
/// listing): results numbered from 1, one line per transaction, trailing
/// count. The empty set gets its own message instead of a zero count.
pub fn render_results(results: &[&Transaction]) -> String {
    if results.is_empty() {
        return "No matching transactions found.".to_string();
    }

    let mut out = String::from("=== SEARCH RESULTS ===\n");
    for (i, t) in results.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. [{}] {} | {} | {} | {}",
            i + 1,
            t.kind.label().to_uppercase(),
            t.amount,
            t.category,
            t.date,
            t.note
        );
    }
    out.push_str("======================\n");
    let _ = write!(out, "Total found: {} transaction(s).", results.len());
    out
}
