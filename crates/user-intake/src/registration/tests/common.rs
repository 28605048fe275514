use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::registration::credit::{CreditLimitError, CreditLimitService};
use crate::registration::directory::{ClientDirectory, DirectoryError, InMemoryClientDirectory};
use crate::registration::domain::{Applicant, Client, ClientId, ClientTier, PersistedUser};
use crate::registration::eligibility::EligibilityConfig;
use crate::registration::repository::{RepositoryError, UserRepository};
use crate::registration::service::UserRegistrationService;

pub(super) const VERY_IMPORTANT: ClientId = ClientId(1);
pub(super) const IMPORTANT: ClientId = ClientId(2);
pub(super) const STANDARD: ClientId = ClientId(3);
pub(super) const MISSING: ClientId = ClientId(99);

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn eligibility_config() -> EligibilityConfig {
    EligibilityConfig::default()
}

pub(super) fn directory() -> InMemoryClientDirectory {
    InMemoryClientDirectory::from_clients(vec![
        Client {
            id: VERY_IMPORTANT,
            name: "Very Important Client".to_string(),
            tier: ClientTier::VeryImportant,
        },
        Client {
            id: IMPORTANT,
            name: "Important Client".to_string(),
            tier: ClientTier::Important,
        },
        Client {
            id: STANDARD,
            name: "Standard Client".to_string(),
            tier: ClientTier::Default,
        },
    ])
    .expect("unique client ids")
}

pub(super) fn applicant(client_id: ClientId) -> Applicant {
    Applicant {
        first_name: "John".to_string(),
        surname: "Doe".to_string(),
        email: "john@test.com".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date"),
        client_id,
    }
}

pub(super) type TestService =
    UserRegistrationService<InMemoryClientDirectory, CountingCreditService, RecordingRepository>;

pub(super) fn build_service(
    remote_limit: u32,
) -> (
    TestService,
    Arc<CountingCreditService>,
    Arc<RecordingRepository>,
) {
    let credit = Arc::new(CountingCreditService::new(remote_limit));
    let repository = Arc::new(RecordingRepository::default());
    let service = UserRegistrationService::new(
        Arc::new(directory()),
        credit.clone(),
        repository.clone(),
        eligibility_config(),
    );
    (service, credit, repository)
}

/// Credit service answering a fixed limit and counting every call.
pub(super) struct CountingCreditService {
    limit: u32,
    calls: AtomicUsize,
}

impl CountingCreditService {
    pub(super) fn new(limit: u32) -> Self {
        Self {
            limit,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CreditLimitService for CountingCreditService {
    fn credit_limit(
        &self,
        _first_name: &str,
        _surname: &str,
        _date_of_birth: NaiveDate,
    ) -> Result<u32, CreditLimitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.limit)
    }
}

pub(super) struct UnreachableCreditService;

impl CreditLimitService for UnreachableCreditService {
    fn credit_limit(
        &self,
        _first_name: &str,
        _surname: &str,
        _date_of_birth: NaiveDate,
    ) -> Result<u32, CreditLimitError> {
        Err(CreditLimitError::Unavailable("connection refused".to_string()))
    }
}

pub(super) struct SlowCreditService {
    pub(super) delay: Duration,
    pub(super) limit: u32,
}

impl CreditLimitService for SlowCreditService {
    fn credit_limit(
        &self,
        _first_name: &str,
        _surname: &str,
        _date_of_birth: NaiveDate,
    ) -> Result<u32, CreditLimitError> {
        thread::sleep(self.delay);
        Ok(self.limit)
    }
}

#[derive(Default)]
pub(super) struct RecordingRepository {
    saved: Mutex<Vec<PersistedUser>>,
}

impl RecordingRepository {
    pub(super) fn saved(&self) -> Vec<PersistedUser> {
        self.saved.lock().expect("repository mutex poisoned").clone()
    }
}

impl UserRepository for RecordingRepository {
    fn save(&self, user: PersistedUser) -> Result<(), RepositoryError> {
        self.saved
            .lock()
            .expect("repository mutex poisoned")
            .push(user);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl UserRepository for UnavailableRepository {
    fn save(&self, _user: PersistedUser) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct UnavailableDirectory;

impl ClientDirectory for UnavailableDirectory {
    fn find(&self, _id: ClientId) -> Result<Option<Client>, DirectoryError> {
        Err(DirectoryError::Unavailable(
            "stored procedure failed".to_string(),
        ))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
