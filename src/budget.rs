use crate::domain::{Transaction, TxKind, User, goal_progress};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy)]
pub struct BudgetStatus {
    pub budget: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub pct_used: Decimal,
}

/// Consumption of one month's budget. Spent is the sum of expense amounts
/// whose date carries the month prefix; remaining may go negative (overspend
/// is representable, not clamped).
pub fn budget_status(budget: Decimal, transactions: &[Transaction], month: &str) -> BudgetStatus {
    let spent = spent_in_month(transactions, month);
    let pct_used = if budget > Decimal::ZERO {
        spent / budget * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };
    BudgetStatus {
        budget,
        spent,
        remaining: budget - spent,
        pct_used,
    }
}

pub fn spent_in_month(transactions: &[Transaction], month: &str) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.kind == TxKind::Expense && t.date.starts_with(month))
        .map(|t| t.amount)
        .sum()
}

const BUDGET_ALERT_PCT: Decimal = Decimal::from_parts(9, 0, 0, false, 1); // 0.9
const GOAL_ALERT_PCT: Decimal = Decimal::from_parts(8, 0, 0, false, 1); // 0.8

/// Alerts in a fixed order: budgets first, then goals, each in stored
/// sequence order. A reached goal emits only the achieved message, never the
/// close-to-goal one as well. Empty output means nothing to report.
pub fn notifications(user: &User) -> Vec<String> {
    let mut out = Vec::new();

    for b in &user.monthly_budgets {
        let spent = spent_in_month(&user.transactions, &b.month);
        if spent >= b.amount * BUDGET_ALERT_PCT {
            out.push(format!(
                "You're close to your budget limit for {} ({:.2}/{:.2})",
                b.month, spent, b.amount
            ));
        }
    }

    for g in &user.savings_goals {
        if goal_progress(g).reached {
            out.push(format!("Goal '{}' achieved!", g.name));
        } else if g.saved_amount >= g.target_amount * GOAL_ALERT_PCT {
            out.push(format!(
                "You're close to achieving your goal '{}' ({:.2}/{:.2})",
                g.name, g.saved_amount, g.target_amount
            ));
        }
    }

    out
}
