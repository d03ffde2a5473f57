use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReminderError {
    #[error("Invalid reminder: {0}")]
    InvalidReminder(String),

    #[error("Reminder {0} is one-time and cannot be advanced")]
    NotRecurring(String),

    #[error("Reminder not found: {0}")]
    NotFound(String),

    #[error("Transaction {transaction_id} does not settle reminder {reminder_id}: {reason}")]
    SettlementMismatch {
        reminder_id: String,
        transaction_id: String,
        reason: String,
    },
}
