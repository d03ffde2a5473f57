use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::reminders_errors::ReminderError;
use crate::transactions::normalize_symbol;
use crate::utils::time_utils::{add_months, days_between};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderFrequency {
    Weekly,
    Monthly,
    #[default]
    Quarterly,
    SemiAnnually,
    Annually,
    /// One-time payment. Never rescheduled.
    Special,
}

impl ReminderFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderFrequency::Weekly => "WEEKLY",
            ReminderFrequency::Monthly => "MONTHLY",
            ReminderFrequency::Quarterly => "QUARTERLY",
            ReminderFrequency::SemiAnnually => "SEMI_ANNUALLY",
            ReminderFrequency::Annually => "ANNUALLY",
            ReminderFrequency::Special => "SPECIAL",
        }
    }

    pub fn is_recurring(&self) -> bool {
        *self != ReminderFrequency::Special
    }

    /// Moves `date` forward one period. `None` for one-time reminders or when
    /// the result is out of range.
    pub fn advance(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            ReminderFrequency::Weekly => date.checked_add_signed(Duration::days(7)),
            ReminderFrequency::Monthly => add_months(date, 1),
            ReminderFrequency::Quarterly => add_months(date, 3),
            ReminderFrequency::SemiAnnually => add_months(date, 6),
            ReminderFrequency::Annually => add_months(date, 12),
            ReminderFrequency::Special => None,
        }
    }
}

impl fmt::Display for ReminderFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderFrequency {
    type Err = ReminderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "WEEKLY" => Ok(ReminderFrequency::Weekly),
            "MONTHLY" => Ok(ReminderFrequency::Monthly),
            "QUARTERLY" => Ok(ReminderFrequency::Quarterly),
            "SEMI_ANNUALLY" | "SEMI_ANNUAL" => Ok(ReminderFrequency::SemiAnnually),
            "ANNUALLY" | "ANNUAL" => Ok(ReminderFrequency::Annually),
            "SPECIAL" | "ONE_TIME" => Ok(ReminderFrequency::Special),
            other => Err(ReminderError::InvalidReminder(format!(
                "Unknown frequency '{}'",
                other
            ))),
        }
    }
}

/// Where a reminder stands relative to `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderState {
    Scheduled,
    Due,
    Settled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendReminder {
    pub id: String,
    pub symbol: String,
    pub ex_date: NaiveDate,
    pub pay_date: NaiveDate,
    pub per_share_amount: Decimal,
    pub frequency: ReminderFrequency,
    pub auto_reschedule: bool,
    /// Number of cycles this reminder has been moved forward.
    #[serde(default)]
    pub times_advanced: u32,
    /// Dividend transaction that settled the current cycle.
    #[serde(default)]
    pub settled_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DividendReminder {
    pub fn state(&self, today: NaiveDate) -> ReminderState {
        if self.settled_by.is_some() {
            ReminderState::Settled
        } else if self.pay_date <= today {
            ReminderState::Due
        } else {
            ReminderState::Scheduled
        }
    }

    pub fn expected_amount(&self, shares: Decimal) -> Decimal {
        shares * self.per_share_amount
    }

    /// Days from ex-date to pay date.
    pub fn ex_to_pay_gap(&self) -> i64 {
        days_between(self.ex_date, self.pay_date)
    }

    /// Next cycle's `(ex_date, pay_date)`. The pay date moves one period from
    /// its current value and the ex-date keeps the same gap before it.
    pub fn next_occurrence(&self) -> Result<(NaiveDate, NaiveDate), ReminderError> {
        if !self.frequency.is_recurring() {
            return Err(ReminderError::NotRecurring(self.id.clone()));
        }
        let out_of_range =
            || ReminderError::InvalidReminder(format!("next date for {} is out of range", self.id));
        let pay_date = self.frequency.advance(self.pay_date).ok_or_else(out_of_range)?;
        let ex_date = pay_date
            .checked_sub_signed(Duration::days(self.ex_to_pay_gap()))
            .ok_or_else(out_of_range)?;
        Ok((ex_date, pay_date))
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.pay_date < today
    }
}

/// Input for creating or replacing a reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDividendReminder {
    pub symbol: String,
    pub ex_date: NaiveDate,
    pub pay_date: NaiveDate,
    pub per_share_amount: Decimal,
    #[serde(default)]
    pub frequency: ReminderFrequency,
    #[serde(default = "default_auto_reschedule")]
    pub auto_reschedule: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_auto_reschedule() -> bool {
    true
}

impl NewDividendReminder {
    pub fn new(
        symbol: &str,
        ex_date: NaiveDate,
        pay_date: NaiveDate,
        per_share_amount: Decimal,
        frequency: ReminderFrequency,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            ex_date,
            pay_date,
            per_share_amount,
            frequency,
            auto_reschedule: true,
            notes: None,
        }
    }

    pub fn validate(&self) -> Result<(), ReminderError> {
        if normalize_symbol(&self.symbol).is_empty() {
            return Err(ReminderError::InvalidReminder("symbol is required".to_string()));
        }
        if self.per_share_amount <= Decimal::ZERO {
            return Err(ReminderError::InvalidReminder(format!(
                "per-share amount must be positive, got {}",
                self.per_share_amount
            )));
        }
        if self.ex_date > self.pay_date {
            return Err(ReminderError::InvalidReminder(format!(
                "ex-date {} is after pay date {}",
                self.ex_date, self.pay_date
            )));
        }
        Ok(())
    }
}
