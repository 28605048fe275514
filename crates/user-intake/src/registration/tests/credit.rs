use super::common::*;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::registration::credit::{
    CreditLimitError, CreditLimitResolver, CreditLimitService, TimedCreditLimitService,
};
use crate::registration::domain::{ClientTier, CreditDecision};

#[test]
fn very_important_clients_skip_the_remote_call() {
    let credit = Arc::new(CountingCreditService::new(10));
    let resolver = CreditLimitResolver::new(credit.clone(), 2);

    let decision = resolver
        .resolve(ClientTier::VeryImportant, &applicant(VERY_IMPORTANT))
        .expect("resolves");

    assert_eq!(decision, CreditDecision::unlimited());
    assert_eq!(credit.calls(), 0);
}

#[test]
fn important_clients_receive_a_doubled_limit_from_one_call() {
    let credit = Arc::new(CountingCreditService::new(300));
    let resolver = CreditLimitResolver::new(credit.clone(), 2);

    let decision = resolver
        .resolve(ClientTier::Important, &applicant(IMPORTANT))
        .expect("resolves");

    assert_eq!(decision, CreditDecision::limited(600));
    assert_eq!(credit.calls(), 1);
}

#[test]
fn default_clients_receive_the_remote_limit_from_one_call() {
    let credit = Arc::new(CountingCreditService::new(499));
    let resolver = CreditLimitResolver::new(credit.clone(), 2);

    let decision = resolver
        .resolve(ClientTier::Default, &applicant(STANDARD))
        .expect("resolves");

    assert_eq!(decision, CreditDecision::limited(499));
    assert_eq!(credit.calls(), 1);
}

#[test]
fn multiplied_limits_saturate() {
    let resolver = CreditLimitResolver::new(Arc::new(CountingCreditService::new(u32::MAX)), 2);

    let decision = resolver
        .resolve(ClientTier::Important, &applicant(IMPORTANT))
        .expect("resolves");

    assert_eq!(decision.credit_limit, u32::MAX);
}

#[test]
fn remote_failures_surface_unchanged() {
    let resolver = CreditLimitResolver::new(Arc::new(UnreachableCreditService), 2);

    let result = resolver.resolve(ClientTier::Default, &applicant(STANDARD));

    assert_eq!(
        result,
        Err(CreditLimitError::Unavailable(
            "connection refused".to_string()
        ))
    );
}

#[test]
fn timed_service_passes_through_prompt_answers() {
    let inner = Arc::new(CountingCreditService::new(700));
    let timed = TimedCreditLimitService::new(inner.clone(), Duration::from_secs(5));
    let candidate = applicant(STANDARD);

    let limit = timed
        .credit_limit(
            &candidate.first_name,
            &candidate.surname,
            candidate.date_of_birth,
        )
        .expect("answers in time");

    assert_eq!(limit, 700);
    assert_eq!(inner.calls(), 1);
}

#[test]
fn timed_service_reports_slow_answers_as_timeouts() {
    let inner = Arc::new(SlowCreditService {
        delay: Duration::from_millis(500),
        limit: 700,
    });
    let timed = TimedCreditLimitService::new(inner, Duration::from_millis(20));
    let candidate = applicant(STANDARD);

    let result = timed.credit_limit(
        &candidate.first_name,
        &candidate.surname,
        candidate.date_of_birth,
    );

    assert_eq!(result, Err(CreditLimitError::TimedOut { after_ms: 20 }));
}

#[test]
fn timed_service_passes_through_remote_errors() {
    let timed =
        TimedCreditLimitService::new(Arc::new(UnreachableCreditService), Duration::from_secs(5));
    let candidate = applicant(STANDARD);

    let result = timed.credit_limit(
        &candidate.first_name,
        &candidate.surname,
        candidate.date_of_birth,
    );

    assert!(matches!(result, Err(CreditLimitError::Unavailable(_))));
}

#[test]
fn abandoned_lookups_stay_within_the_worker_budget() {
    let inner = Arc::new(SlowCreditService {
        delay: Duration::from_millis(800),
        limit: 700,
    });
    let timed = TimedCreditLimitService::new(inner, Duration::from_millis(5)).with_max_in_flight(4);
    let candidate = applicant(STANDARD);

    let mut saturated = 0;
    for _ in 0..50 {
        let result = timed.credit_limit(
            &candidate.first_name,
            &candidate.surname,
            candidate.date_of_birth,
        );
        match result {
            Err(CreditLimitError::TimedOut { after_ms: 5 }) => {}
            Err(CreditLimitError::Saturated { limit: 4 }) => saturated += 1,
            other => panic!("expected timeout or saturation, got {other:?}"),
        }
        assert!(
            timed.in_flight() <= 4,
            "{} workers outstanding",
            timed.in_flight()
        );
    }

    assert!(saturated >= 40, "only {saturated} lookups were refused");
}

#[test]
fn worker_slots_are_released_once_abandoned_lookups_finish() {
    let inner = Arc::new(SlowCreditService {
        delay: Duration::from_millis(100),
        limit: 700,
    });
    let timed = TimedCreditLimitService::new(inner, Duration::from_millis(5)).with_max_in_flight(1);
    let candidate = applicant(STANDARD);
    let lookup = || {
        timed.credit_limit(
            &candidate.first_name,
            &candidate.surname,
            candidate.date_of_birth,
        )
    };

    assert_eq!(lookup(), Err(CreditLimitError::TimedOut { after_ms: 5 }));
    assert_eq!(lookup(), Err(CreditLimitError::Saturated { limit: 1 }));

    let deadline = Instant::now() + Duration::from_secs(5);
    while timed.in_flight() > 0 {
        assert!(Instant::now() < deadline, "abandoned worker never finished");
        std::thread::sleep(Duration::from_millis(10));
    }

    assert_eq!(lookup(), Err(CreditLimitError::TimedOut { after_ms: 5 }));
}
