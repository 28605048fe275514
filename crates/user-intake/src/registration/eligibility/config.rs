use serde::{Deserialize, Serialize};

pub const DEFAULT_MINIMUM_AGE: u32 = 21;
pub const DEFAULT_MINIMUM_CREDIT_LIMIT: u32 = 500;
pub const DEFAULT_IMPORTANT_MULTIPLIER: u32 = 2;

/// Thresholds and policy dials applied during eligibility evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    pub minimum_age: u32,
    pub minimum_credit_limit: u32,
    pub important_multiplier: u32,
    pub email_policy: EmailPolicy,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            minimum_age: DEFAULT_MINIMUM_AGE,
            minimum_credit_limit: DEFAULT_MINIMUM_CREDIT_LIMIT,
            important_multiplier: DEFAULT_IMPORTANT_MULTIPLIER,
            email_policy: EmailPolicy::default(),
        }
    }
}

/// Marker policy for the email guard.
///
/// `AnyMarker` keeps the long-standing behavior of accepting an address that carries
/// either an `@` or a `.`. `AllMarkers` requires both and rejects addresses that were
/// previously accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailPolicy {
    #[default]
    AnyMarker,
    AllMarkers,
}

impl EmailPolicy {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "any" | "any_marker" => Some(Self::AnyMarker),
            "all" | "all_markers" | "strict" => Some(Self::AllMarkers),
            _ => None,
        }
    }

    pub fn accepts(&self, email: &str) -> bool {
        let has_at = email.contains('@');
        let has_dot = email.contains('.');
        match self {
            EmailPolicy::AnyMarker => has_at || has_dot,
            EmailPolicy::AllMarkers => has_at && has_dot,
        }
    }
}
