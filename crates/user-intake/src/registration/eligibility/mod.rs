mod config;
mod policy;
mod rules;

pub use config::{
    EligibilityConfig, EmailPolicy, DEFAULT_IMPORTANT_MULTIPLIER, DEFAULT_MINIMUM_AGE,
    DEFAULT_MINIMUM_CREDIT_LIMIT,
};
pub use policy::{NameField, RejectionReason};
pub use rules::age_on;

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use super::credit::{CreditLimitResolver, CreditLimitService};
use super::directory::ClientDirectory;
use super::domain::{Applicant, PersistedUser};
use super::service::RegistrationError;

/// Result of running an applicant through every guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    Accepted(PersistedUser),
    Rejected(RejectionReason),
}

/// Stateless evaluator: validation, client lookup, credit resolution, then threshold.
///
/// Validation failures are reported as [`Eligibility::Rejected`]; only collaborator
/// failures surface as errors.
pub struct EligibilityEvaluator<D, C> {
    config: EligibilityConfig,
    directory: Arc<D>,
    resolver: CreditLimitResolver<C>,
}

impl<D, C> EligibilityEvaluator<D, C>
where
    D: ClientDirectory,
    C: CreditLimitService,
{
    pub fn new(directory: Arc<D>, credit_service: Arc<C>, config: EligibilityConfig) -> Self {
        let resolver = CreditLimitResolver::new(credit_service, config.important_multiplier);
        Self {
            config,
            directory,
            resolver,
        }
    }

    pub fn config(&self) -> &EligibilityConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        applicant: Applicant,
        today: NaiveDate,
    ) -> Result<Eligibility, RegistrationError> {
        if let Err(reason) = rules::check_applicant(&applicant, &self.config, today) {
            return Ok(reject(&applicant, reason));
        }

        let client = match self.directory.find(applicant.client_id)? {
            Some(client) => client,
            None => {
                let reason = RejectionReason::UnknownClient {
                    client_id: applicant.client_id,
                };
                return Ok(reject(&applicant, reason));
            }
        };

        let decision = self.resolver.resolve(client.tier, &applicant)?;

        if !decision.meets(self.config.minimum_credit_limit) {
            let reason = RejectionReason::CreditLimitBelowMinimum {
                credit_limit: decision.credit_limit,
                minimum: self.config.minimum_credit_limit,
            };
            return Ok(reject(&applicant, reason));
        }

        Ok(Eligibility::Accepted(PersistedUser::new(
            applicant, &client, decision,
        )))
    }
}

fn reject(applicant: &Applicant, reason: RejectionReason) -> Eligibility {
    info!(
        client_id = %applicant.client_id,
        reason = %reason.summary(),
        "applicant rejected"
    );
    Eligibility::Rejected(reason)
}
