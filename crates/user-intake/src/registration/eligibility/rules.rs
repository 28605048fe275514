use chrono::{Datelike, NaiveDate};

use super::super::domain::Applicant;
use super::config::{EligibilityConfig, EmailPolicy};
use super::policy::{NameField, RejectionReason};

pub(crate) fn check_applicant(
    applicant: &Applicant,
    config: &EligibilityConfig,
    today: NaiveDate,
) -> Result<(), RejectionReason> {
    check_name(applicant)?;
    check_email(&applicant.email, config.email_policy)?;
    check_age(applicant.date_of_birth, today, config.minimum_age)
}

pub(crate) fn check_name(applicant: &Applicant) -> Result<(), RejectionReason> {
    if applicant.first_name.trim().is_empty() {
        return Err(RejectionReason::MissingName {
            field: NameField::FirstName,
        });
    }
    if applicant.surname.trim().is_empty() {
        return Err(RejectionReason::MissingName {
            field: NameField::Surname,
        });
    }
    Ok(())
}

pub(crate) fn check_email(email: &str, policy: EmailPolicy) -> Result<(), RejectionReason> {
    if policy.accepts(email) {
        Ok(())
    } else {
        Err(RejectionReason::InvalidEmail)
    }
}

pub(crate) fn check_age(
    date_of_birth: NaiveDate,
    today: NaiveDate,
    minimum: u32,
) -> Result<(), RejectionReason> {
    let age = age_on(date_of_birth, today);
    // Widen both sides: a minimum above i32::MAX must not wrap negative.
    if i64::from(age) < i64::from(minimum) {
        return Err(RejectionReason::Underage { age, minimum });
    }
    Ok(())
}

/// Age in whole years on `today`. Negative when the birth date lies in the future.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}
