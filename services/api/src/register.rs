use crate::infra::build_registration_service;
use chrono::{Local, NaiveDate};
use clap::Args;
use user_intake::config::AppConfig;
use user_intake::error::AppError;
use user_intake::registration::{Applicant, ClientId, RegistrationOutcome};
use user_intake::telemetry;

#[derive(Args, Debug)]
pub(crate) struct RegisterArgs {
    /// Applicant first name
    #[arg(long)]
    pub(crate) first_name: String,
    /// Applicant surname
    #[arg(long)]
    pub(crate) surname: String,
    /// Applicant email address
    #[arg(long)]
    pub(crate) email: String,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date_of_birth: NaiveDate,
    /// Client the applicant registers under
    #[arg(long)]
    pub(crate) client_id: u32,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_register(args: RegisterArgs) -> Result<(), AppError> {
    let RegisterArgs {
        first_name,
        surname,
        email,
        date_of_birth,
        client_id,
        today,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let (service, _) = build_registration_service(&config.registration)?;

    let applicant = Applicant {
        first_name,
        surname,
        email,
        date_of_birth,
        client_id: ClientId(client_id),
    };

    let outcome = service.register(applicant, today)?;
    println!("{}", render_outcome(&outcome, today));
    Ok(())
}

fn render_outcome(outcome: &RegistrationOutcome, today: NaiveDate) -> String {
    let verdict = if outcome.is_registered() {
        "ACCEPTED"
    } else {
        "REJECTED"
    };
    format!("[{today}] {verdict}: {}", outcome.summary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use user_intake::registration::{NameField, RejectionReason};

    #[test]
    fn register_command_installs_the_subscriber() {
        let args = RegisterArgs {
            first_name: "Grace".to_string(),
            surname: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1970, 12, 9).expect("valid"),
            client_id: 1,
            today: NaiveDate::from_ymd_opt(2025, 6, 15),
        };

        run_register(args).expect("register command succeeds");

        assert!(tracing::dispatcher::has_been_set());
    }

    #[test]
    fn rejected_outcomes_render_their_reason() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid");
        let outcome = RegistrationOutcome::Rejected(RejectionReason::MissingName {
            field: NameField::FirstName,
        });

        assert_eq!(
            render_outcome(&outcome, today),
            "[2025-06-15] REJECTED: rejected for missing first name"
        );
    }
}
