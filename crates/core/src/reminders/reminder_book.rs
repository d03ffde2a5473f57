use chrono::{NaiveDate, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::reminders_errors::ReminderError;
use super::reminders_model::{DividendReminder, NewDividendReminder, ReminderState};
use crate::errors::Result;
use crate::transactions::{normalize_symbol, Transaction};

/// All dividend reminders, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderBook {
    reminders: Vec<DividendReminder>,
}

impl ReminderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_reminders(reminders: Vec<DividendReminder>) -> Self {
        Self { reminders }
    }

    pub fn reminders(&self) -> &[DividendReminder] {
        &self.reminders
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&DividendReminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: &str) -> std::result::Result<&mut DividendReminder, ReminderError> {
        self.reminders
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ReminderError::NotFound(id.to_string()))
    }

    pub fn add(&mut self, new_reminder: NewDividendReminder) -> Result<&DividendReminder> {
        new_reminder.validate()?;
        let now = Utc::now();
        let reminder = DividendReminder {
            id: Uuid::new_v4().to_string(),
            symbol: normalize_symbol(&new_reminder.symbol),
            ex_date: new_reminder.ex_date,
            pay_date: new_reminder.pay_date,
            per_share_amount: new_reminder.per_share_amount,
            frequency: new_reminder.frequency,
            auto_reschedule: new_reminder.auto_reschedule,
            times_advanced: 0,
            settled_by: None,
            notes: new_reminder.notes,
            created_at: now,
            updated_at: now,
        };
        debug!("Adding dividend reminder {} for {}", reminder.id, reminder.symbol);
        self.reminders.push(reminder);
        let index = self.reminders.len() - 1;
        Ok(&self.reminders[index])
    }

    /// Replaces the editable fields. Creation time and advance count are kept.
    pub fn update(&mut self, id: &str, changes: NewDividendReminder) -> Result<&DividendReminder> {
        changes.validate()?;
        let reminder = self.get_mut(id)?;
        reminder.symbol = normalize_symbol(&changes.symbol);
        reminder.ex_date = changes.ex_date;
        reminder.pay_date = changes.pay_date;
        reminder.per_share_amount = changes.per_share_amount;
        reminder.frequency = changes.frequency;
        reminder.auto_reschedule = changes.auto_reschedule;
        reminder.notes = changes.notes;
        reminder.updated_at = Utc::now();
        Ok(&*reminder)
    }

    pub fn delete(&mut self, id: &str) -> Result<DividendReminder> {
        let index = self
            .reminders
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| ReminderError::NotFound(id.to_string()))?;
        Ok(self.reminders.remove(index))
    }

    /// Moves a recurring reminder to its next cycle. Any settlement belonged
    /// to the previous cycle and is cleared.
    pub fn advance(&mut self, id: &str) -> Result<&DividendReminder> {
        let reminder = self.get_mut(id)?;
        advance_reminder(reminder)?;
        Ok(&*reminder)
    }

    /// Advances every auto-rescheduling recurring reminder whose pay date is
    /// before `today`, one cycle each. Returns the ids that moved.
    pub fn advance_overdue(&mut self, today: NaiveDate) -> Vec<String> {
        let mut advanced = Vec::new();
        for reminder in self.reminders.iter_mut().filter(|r| {
            r.is_overdue(today) && r.auto_reschedule && r.frequency.is_recurring()
        }) {
            match advance_reminder(reminder) {
                Ok(()) => advanced.push(reminder.id.clone()),
                Err(e) => debug!("Skipping reminder {}: {}", reminder.id, e),
            }
        }
        if !advanced.is_empty() {
            info!("Advanced {} overdue dividend reminder(s)", advanced.len());
        }
        advanced
    }

    /// Marks a reminder as settled by a recorded dividend for the same symbol.
    pub fn settle(&mut self, id: &str, dividend: &Transaction) -> Result<&DividendReminder> {
        let reminder = self.get_mut(id)?;
        let reminder_id = reminder.id.clone();
        let mismatch = |reason: String| ReminderError::SettlementMismatch {
            reminder_id: reminder_id.clone(),
            transaction_id: dividend.id.clone(),
            reason,
        };
        if !dividend.is_dividend() {
            return Err(mismatch(format!("{} is not a dividend", dividend.kind)).into());
        }
        if dividend.symbol != reminder.symbol {
            return Err(mismatch(format!(
                "symbol {} does not match {}",
                dividend.symbol, reminder.symbol
            ))
            .into());
        }
        reminder.settled_by = Some(dividend.id.clone());
        reminder.updated_at = Utc::now();
        Ok(&*reminder)
    }

    /// Unsettled reminders paying on or before `today + within_days`, soonest
    /// first. Overdue ones are included.
    pub fn upcoming(&self, today: NaiveDate, within_days: i64) -> Vec<&DividendReminder> {
        let horizon = chrono::Duration::try_days(within_days)
            .and_then(|window| today.checked_add_signed(window))
            .unwrap_or(NaiveDate::MAX);
        let mut upcoming: Vec<&DividendReminder> = self
            .reminders
            .iter()
            .filter(|r| r.state(today) != ReminderState::Settled && r.pay_date <= horizon)
            .collect();
        upcoming.sort_by_key(|r| r.pay_date);
        upcoming
    }
}

fn advance_reminder(reminder: &mut DividendReminder) -> std::result::Result<(), ReminderError> {
    let (ex_date, pay_date) = reminder.next_occurrence()?;
    debug!(
        "Reminder {} for {}: pay date {} -> {}",
        reminder.id, reminder.symbol, reminder.pay_date, pay_date
    );
    reminder.ex_date = ex_date;
    reminder.pay_date = pay_date;
    reminder.times_advanced += 1;
    reminder.settled_by = None;
    reminder.updated_at = Utc::now();
    Ok(())
}
