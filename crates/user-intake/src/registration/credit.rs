use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::domain::{Applicant, ClientTier, CreditDecision};

/// Remote credit-limit lookup keyed on applicant identity.
pub trait CreditLimitService: Send + Sync {
    fn credit_limit(
        &self,
        first_name: &str,
        surname: &str,
        date_of_birth: NaiveDate,
    ) -> Result<u32, CreditLimitError>;
}

/// Failure reported by the remote credit service. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreditLimitError {
    #[error("credit service unavailable: {0}")]
    Unavailable(String),
    #[error("credit service did not answer within {after_ms} ms")]
    TimedOut { after_ms: u64 },
    #[error("credit service has {limit} lookups outstanding")]
    Saturated { limit: usize },
    #[error("credit service rejected the lookup: {0}")]
    Rejected(String),
}

/// Maps a client tier onto a credit decision, calling the remote service at most once.
pub struct CreditLimitResolver<C> {
    service: Arc<C>,
    important_multiplier: u32,
}

impl<C> CreditLimitResolver<C>
where
    C: CreditLimitService,
{
    pub fn new(service: Arc<C>, important_multiplier: u32) -> Self {
        Self {
            service,
            important_multiplier,
        }
    }

    pub fn resolve(
        &self,
        tier: ClientTier,
        applicant: &Applicant,
    ) -> Result<CreditDecision, CreditLimitError> {
        match tier {
            ClientTier::VeryImportant => Ok(CreditDecision::unlimited()),
            ClientTier::Important => {
                let limit = self.remote_limit(applicant)?;
                Ok(CreditDecision::limited(
                    limit.saturating_mul(self.important_multiplier),
                ))
            }
            ClientTier::Default => self.remote_limit(applicant).map(CreditDecision::limited),
        }
    }

    fn remote_limit(&self, applicant: &Applicant) -> Result<u32, CreditLimitError> {
        debug!(client_id = %applicant.client_id, "requesting remote credit limit");
        self.service.credit_limit(
            &applicant.first_name,
            &applicant.surname,
            applicant.date_of_birth,
        )
    }
}

/// Default cap on lookups that may be running at once, abandoned ones included.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

/// Bounds every lookup on the wrapped service with a deadline.
///
/// The inner call runs on a worker thread; when the deadline passes the worker is
/// abandoned and its eventual answer discarded. Workers hold a slot until the inner call
/// returns, so at most `max_in_flight` of them exist. Once every slot is taken, lookups
/// fail with [`CreditLimitError::Saturated`] without spawning.
pub struct TimedCreditLimitService<S> {
    inner: Arc<S>,
    timeout: Duration,
    max_in_flight: usize,
    in_flight: Arc<AtomicUsize>,
}

impl<S> TimedCreditLimitService<S>
where
    S: CreditLimitService + 'static,
{
    pub fn new(inner: Arc<S>, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Workers currently running the inner lookup, including abandoned ones.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    fn acquire_slot(&self) -> Option<WorkerSlot> {
        let limit = self.max_in_flight;
        self.in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current < limit).then_some(current + 1)
            })
            .ok()
            .map(|_| WorkerSlot(Arc::clone(&self.in_flight)))
    }
}

/// Released when the worker holding it finishes, whether or not anyone still waits.
struct WorkerSlot(Arc<AtomicUsize>);

impl Drop for WorkerSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl<S> CreditLimitService for TimedCreditLimitService<S>
where
    S: CreditLimitService + 'static,
{
    fn credit_limit(
        &self,
        first_name: &str,
        surname: &str,
        date_of_birth: NaiveDate,
    ) -> Result<u32, CreditLimitError> {
        let Some(slot) = self.acquire_slot() else {
            warn!(
                limit = self.max_in_flight,
                "credit lookup refused, every worker is busy"
            );
            return Err(CreditLimitError::Saturated {
                limit: self.max_in_flight,
            });
        };

        let (sender, receiver) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let first_name = first_name.to_string();
        let surname = surname.to_string();

        thread::Builder::new()
            .name("credit-lookup".to_string())
            .spawn(move || {
                let _slot = slot;
                let result = inner.credit_limit(&first_name, &surname, date_of_birth);
                // The receiver is gone once the deadline has passed.
                let _ = sender.send(result);
            })
            .map_err(|err| CreditLimitError::Unavailable(err.to_string()))?;

        match receiver.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let after_ms = self.timeout.as_millis() as u64;
                warn!(after_ms, in_flight = self.in_flight(), "credit lookup timed out");
                Err(CreditLimitError::TimedOut { after_ms })
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(CreditLimitError::Unavailable(
                "credit lookup worker exited without answering".to_string(),
            )),
        }
    }
}
