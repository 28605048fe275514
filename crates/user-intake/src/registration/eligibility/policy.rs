use serde::{Deserialize, Serialize};

use super::super::domain::ClientId;

/// Enumerates why an applicant was turned away without reaching the user store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    MissingName { field: NameField },
    InvalidEmail,
    Underage { age: i32, minimum: u32 },
    UnknownClient { client_id: ClientId },
    CreditLimitBelowMinimum { credit_limit: u32, minimum: u32 },
}

/// Which half of the applicant's name failed the presence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameField {
    FirstName,
    Surname,
}

impl RejectionReason {
    pub fn summary(&self) -> String {
        match self {
            RejectionReason::MissingName { field } => match field {
                NameField::FirstName => "rejected for missing first name".to_string(),
                NameField::Surname => "rejected for missing surname".to_string(),
            },
            RejectionReason::InvalidEmail => "rejected for invalid email address".to_string(),
            RejectionReason::Underage { age, minimum } => {
                format!("rejected for age {age} (minimum {minimum})")
            }
            RejectionReason::UnknownClient { client_id } => {
                format!("rejected for unknown client {client_id}")
            }
            RejectionReason::CreditLimitBelowMinimum {
                credit_limit,
                minimum,
            } => format!("rejected for credit limit {credit_limit} below minimum {minimum}"),
        }
    }
}
