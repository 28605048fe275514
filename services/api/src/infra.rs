use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info};
use user_intake::config::RegistrationConfig;
use user_intake::registration::{
    Client, ClientId, ClientTier, CreditLimitError, CreditLimitService, DirectoryError,
    InMemoryClientDirectory, InMemoryUserRepository, RegistrationError,
    TimedCreditLimitService, UserRegistrationService,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Stand-in for the remote credit bureau: every applicant receives the same base limit.
pub(crate) struct StubCreditService {
    limit: u32,
}

impl StubCreditService {
    pub(crate) fn new(limit: u32) -> Self {
        Self { limit }
    }
}

impl CreditLimitService for StubCreditService {
    fn credit_limit(
        &self,
        _first_name: &str,
        surname: &str,
        date_of_birth: NaiveDate,
    ) -> Result<u32, CreditLimitError> {
        debug!(%surname, %date_of_birth, limit = self.limit, "stub credit lookup");
        Ok(self.limit)
    }
}

pub(crate) type RegistrationService = UserRegistrationService<
    InMemoryClientDirectory,
    TimedCreditLimitService<StubCreditService>,
    InMemoryUserRepository,
>;

pub(crate) fn default_clients() -> Vec<Client> {
    vec![
        Client {
            id: ClientId(1),
            name: "Northwind Traders".to_string(),
            tier: ClientTier::VeryImportant,
        },
        Client {
            id: ClientId(2),
            name: "Contoso".to_string(),
            tier: ClientTier::Important,
        },
        Client {
            id: ClientId(3),
            name: "Fabrikam".to_string(),
            tier: ClientTier::Default,
        },
    ]
}

pub(crate) fn load_directory(
    config: &RegistrationConfig,
) -> Result<InMemoryClientDirectory, DirectoryError> {
    let directory = match &config.clients_csv {
        Some(path) => InMemoryClientDirectory::from_path(path)?,
        None => InMemoryClientDirectory::from_clients(default_clients())?,
    };
    info!(clients = directory.len(), "client directory loaded");
    Ok(directory)
}

pub(crate) fn build_registration_service(
    config: &RegistrationConfig,
) -> Result<(Arc<RegistrationService>, Arc<InMemoryUserRepository>), RegistrationError> {
    let directory = Arc::new(load_directory(config)?);
    let credit = Arc::new(
        TimedCreditLimitService::new(
            Arc::new(StubCreditService::new(config.stub_credit_limit)),
            config.credit_timeout,
        )
        .with_max_in_flight(config.credit_max_in_flight),
    );
    let repository = Arc::new(InMemoryUserRepository::default());

    let service = Arc::new(UserRegistrationService::new(
        directory,
        credit,
        repository.clone(),
        config.eligibility.clone(),
    ));
    Ok((service, repository))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
