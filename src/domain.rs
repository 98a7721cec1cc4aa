use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn label(self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TxKind,
    /// Stored as a native JSON number (legacy float format).
    #[serde(with = "amount_number")]
    pub amount: Decimal,
    pub category: String,
    #[serde(default)]
    pub note: String,
    /// Calendar date as typed, "YYYY-MM-DD".
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: Uuid,
    pub name: String,
    /// Stored as a decimal string (legacy format).
    #[serde(with = "amount_string")]
    pub target_amount: Decimal,
    #[serde(with = "amount_string")]
    pub saved_amount: Decimal,
    /// Empty string means no deadline (legacy format).
    #[serde(default)]
    pub deadline: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyBudget {
    pub month: String,
    #[serde(with = "amount_string")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub pin: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub savings_goals: Vec<SavingsGoal>,
    #[serde(default)]
    pub monthly_budgets: Vec<MonthlyBudget>,
}

/// Coerce a raw string into an exact decimal.
///
/// Malformed input yields zero, never an error: one bad stored record must
/// contribute nothing to an aggregation instead of aborting it.
pub fn to_decimal(raw: &str) -> Decimal {
    raw.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO)
}

/// Coerce a float into a decimal via its shortest display form, so a stored
/// `25.5` becomes exactly `25.5` rather than its binary expansion.
pub fn decimal_from_f64(value: f64) -> Decimal {
    to_decimal(&value.to_string())
}

struct LenientDecimal;

impl serde::de::Visitor<'_> for LenientDecimal {
    type Value = Decimal;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "a number or a decimal string")
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Decimal, E> {
        Ok(decimal_from_f64(v))
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Decimal, E> {
        Ok(to_decimal(v))
    }

    fn visit_bool<E: serde::de::Error>(self, _v: bool) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }
}

/// Transaction amounts: JSON numbers on disk, decimals in memory.
pub mod amount_number {
    use super::LenientDecimal;
    use rust_decimal::Decimal;
    use rust_decimal::prelude::ToPrimitive;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(value.to_f64().unwrap_or(0.0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        d.deserialize_any(LenientDecimal)
    }
}

/// Goal and budget amounts: decimal strings on disk.
pub mod amount_string {
    use super::LenientDecimal;
    use rust_decimal::Decimal;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        d.deserialize_any(LenientDecimal)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GoalProgress {
    pub pct: Decimal,
    pub reached: bool,
}

pub fn goal_progress(goal: &SavingsGoal) -> GoalProgress {
    let pct = if goal.target_amount > Decimal::ZERO {
        goal.saved_amount / goal.target_amount * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };
    GoalProgress {
        pct,
        reached: goal.saved_amount >= goal.target_amount,
    }
}
