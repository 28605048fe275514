use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::info;

use super::credit::{CreditLimitError, CreditLimitService};
use super::directory::{ClientDirectory, DirectoryError};
use super::domain::{Applicant, ClientId, PersistedUser};
use super::eligibility::{Eligibility, EligibilityConfig, EligibilityEvaluator, RejectionReason};
use super::repository::{RepositoryError, UserRepository};

/// Entry point composing the evaluator with the user store.
pub struct UserRegistrationService<D, C, R> {
    evaluator: EligibilityEvaluator<D, C>,
    repository: Arc<R>,
}

impl<D, C, R> UserRegistrationService<D, C, R>
where
    D: ClientDirectory + 'static,
    C: CreditLimitService + 'static,
    R: UserRepository + 'static,
{
    pub fn new(
        directory: Arc<D>,
        credit_service: Arc<C>,
        repository: Arc<R>,
        config: EligibilityConfig,
    ) -> Self {
        Self {
            evaluator: EligibilityEvaluator::new(directory, credit_service, config),
            repository,
        }
    }

    pub fn config(&self) -> &EligibilityConfig {
        self.evaluator.config()
    }

    /// Register a user, evaluating age against today's local date.
    ///
    /// Returns `Ok(false)` when the applicant is rejected; nothing is stored in that case.
    pub fn add_user(
        &self,
        first_name: &str,
        surname: &str,
        email: &str,
        date_of_birth: NaiveDate,
        client_id: ClientId,
    ) -> Result<bool, RegistrationError> {
        let today = Local::now().date_naive();
        self.add_user_as_of(today, first_name, surname, email, date_of_birth, client_id)
    }

    pub fn add_user_as_of(
        &self,
        today: NaiveDate,
        first_name: &str,
        surname: &str,
        email: &str,
        date_of_birth: NaiveDate,
        client_id: ClientId,
    ) -> Result<bool, RegistrationError> {
        let applicant = Applicant {
            first_name: first_name.to_string(),
            surname: surname.to_string(),
            email: email.to_string(),
            date_of_birth,
            client_id,
        };

        let outcome = self.register(applicant, today)?;
        Ok(outcome.is_registered())
    }

    /// Evaluate an applicant and store it exactly once when accepted.
    pub fn register(
        &self,
        applicant: Applicant,
        today: NaiveDate,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        match self.evaluator.evaluate(applicant, today)? {
            Eligibility::Accepted(user) => {
                self.repository.save(user.clone())?;
                info!(
                    client_id = %user.client_id,
                    tier = user.client_tier.label(),
                    has_credit_limit = user.has_credit_limit,
                    credit_limit = user.credit_limit,
                    "user registered"
                );
                Ok(RegistrationOutcome::Registered(user))
            }
            Eligibility::Rejected(reason) => Ok(RegistrationOutcome::Rejected(reason)),
        }
    }
}

/// What happened to a registration attempt that did not hit a collaborator failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RegistrationOutcome {
    Registered(PersistedUser),
    Rejected(RejectionReason),
}

impl RegistrationOutcome {
    pub fn is_registered(&self) -> bool {
        matches!(self, RegistrationOutcome::Registered(_))
    }

    pub fn summary(&self) -> String {
        match self {
            RegistrationOutcome::Registered(user) => {
                if user.has_credit_limit {
                    format!(
                        "registered {} with credit limit {}",
                        user.full_name(),
                        user.credit_limit
                    )
                } else {
                    format!("registered {} without credit limit", user.full_name())
                }
            }
            RegistrationOutcome::Rejected(reason) => reason.summary(),
        }
    }
}

/// Collaborator failure raised while registering. Validation failures never land here.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Credit(#[from] CreditLimitError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
