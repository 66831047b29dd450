//! Job Application Validator
//!
//! The applicant contact block mirrors the application form; its errors
//! are reported under `contact.<field>`.

use accounts::domain::value_object::{Email, MobileNumber};
use kernel::id::JobId;
use kernel::validation::{FieldErrors, non_blank, optional_text, require_text};
use serde::Deserialize;

use super::finish;
use crate::domain::entity::ApplicantContact;

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantContactInput {
    pub full_name: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub region: Option<String>,
    pub experience: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyInput {
    pub job_id: Option<String>,
    pub message: Option<String>,
    pub contact: Option<ApplicantContactInput>,
}

/// Validated application
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationForm {
    pub job_id: JobId,
    pub message: Option<String>,
    pub contact: Option<ApplicantContact>,
}

pub fn validate_application(input: ApplyInput) -> Result<ApplicationForm, FieldErrors> {
    let mut errors = FieldErrors::new();

    let job_id = match non_blank(input.job_id.as_deref()) {
        None => {
            errors.add("jobId", "Job is required");
            None
        }
        Some(raw) => {
            let parsed = raw.parse::<JobId>().ok();
            if parsed.is_none() {
                errors.add("jobId", "Job id is not valid");
            }
            parsed
        }
    };

    let contact = match input.contact {
        None => Some(None),
        Some(contact) => match validate_contact(contact) {
            Ok(c) => Some(Some(c)),
            Err(contact_errors) => {
                errors.merge_prefixed("contact", contact_errors);
                None
            }
        },
    };

    finish(errors, || {
        Some(ApplicationForm {
            job_id: job_id?,
            message: optional_text(input.message.as_deref()),
            contact: contact?,
        })
    })
}

fn validate_contact(input: ApplicantContactInput) -> Result<ApplicantContact, FieldErrors> {
    let mut errors = FieldErrors::new();

    let full_name = require_text(
        &mut errors,
        "fullName",
        input.full_name.as_deref(),
        "Full name is required",
    );
    let address = require_text(&mut errors, "address", input.address.as_deref(), "Address is required");
    let region = require_text(
        &mut errors,
        "region",
        input.region.as_deref(),
        "Please select your region",
    );

    let contact_number = match non_blank(input.contact_number.as_deref()) {
        None => {
            errors.add("contactNumber", "Contact number is required");
            None
        }
        Some(raw) => {
            let parsed = MobileNumber::parse(raw);
            if parsed.is_none() {
                errors.add("contactNumber", "Please enter a valid Indian mobile number");
            }
            parsed
        }
    };

    let email = match non_blank(input.email.as_deref()) {
        None => Some(None),
        Some(raw) => {
            let parsed = Email::parse(raw);
            if parsed.is_none() {
                errors.add("email", "Please enter a valid email address");
            }
            parsed.map(Some)
        }
    };

    finish(errors, || {
        Some(ApplicantContact {
            full_name: full_name?,
            contact_number: contact_number?,
            email: email?,
            address: address?,
            region: region?,
            experience: optional_text(input.experience.as_deref()),
        })
    })
}
