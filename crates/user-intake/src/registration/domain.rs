use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for clients held in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u32);

impl From<u32> for ClientId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client classification governing credit-limit policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientTier {
    Default,
    Important,
    VeryImportant,
}

impl ClientTier {
    /// Resolve a directory label into a tier. Unrecognised labels fall back to `Default`.
    pub fn from_label(value: &str) -> Self {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "veryimportantclient" | "veryimportant" => Self::VeryImportant,
            "importantclient" | "important" => Self::Important,
            _ => Self::Default,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClientTier::Default => "default",
            ClientTier::Important => "important",
            ClientTier::VeryImportant => "very_important",
        }
    }
}

/// Directory entry for an organisation that applicants register under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub tier: ClientTier,
}

/// Registration request as captured from the caller. Discarded after evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub client_id: ClientId,
}

/// Outcome of credit-limit resolution for a single applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditDecision {
    pub has_credit_limit: bool,
    pub credit_limit: u32,
}

impl CreditDecision {
    pub fn unlimited() -> Self {
        Self {
            has_credit_limit: false,
            credit_limit: 0,
        }
    }

    pub fn limited(credit_limit: u32) -> Self {
        Self {
            has_credit_limit: true,
            credit_limit,
        }
    }

    /// Whether the decision clears the eligibility threshold.
    pub fn meets(&self, minimum: u32) -> bool {
        !self.has_credit_limit || self.credit_limit >= minimum
    }
}

/// Record written to the user store once an applicant is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedUser {
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub client_id: ClientId,
    pub client_tier: ClientTier,
    pub has_credit_limit: bool,
    pub credit_limit: u32,
}

impl PersistedUser {
    pub fn new(applicant: Applicant, client: &Client, decision: CreditDecision) -> Self {
        Self {
            first_name: applicant.first_name,
            surname: applicant.surname,
            email: applicant.email,
            date_of_birth: applicant.date_of_birth,
            client_id: client.id,
            client_tier: client.tier,
            has_credit_limit: decision.has_credit_limit,
            credit_limit: decision.credit_limit,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }
}
