//! Registration of users under a client, gated by validation, age and credit-limit checks.
//!
//! Collaborators (client directory, remote credit service, user store) are injected as
//! traits so the workflow runs unchanged against in-memory stand-ins and test doubles.

pub mod credit;
pub mod directory;
pub mod domain;
pub mod eligibility;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use credit::{
    CreditLimitError, CreditLimitResolver, CreditLimitService, TimedCreditLimitService,
};
pub use directory::{ClientDirectory, DirectoryError, InMemoryClientDirectory};
pub use domain::{Applicant, Client, ClientId, ClientTier, CreditDecision, PersistedUser};
pub use eligibility::{
    age_on, Eligibility, EligibilityConfig, EligibilityEvaluator, EmailPolicy, NameField,
    RejectionReason,
};
pub use repository::{InMemoryUserRepository, RepositoryError, UserRepository};
pub use router::{registration_router, RegistrationRequest};
pub use service::{RegistrationError, RegistrationOutcome, UserRegistrationService};
