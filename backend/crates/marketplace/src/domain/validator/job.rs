//! Job Validator

use chrono::{DateTime, NaiveDate};
use kernel::validation::{FieldErrors, NumberInput, non_blank, optional_text, parse_code, require_text};
use serde::Deserialize;

use super::{NumberField, clean_list, finish, overlay, read_number};
use crate::domain::entity::Job;
use crate::domain::value_objects::{JobStatus, JobType, Salary, SalaryPeriod};

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryInput {
    pub amount: Option<NumberInput>,
    pub period: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub salary: Option<SalaryInput>,
    pub duration: Option<String>,
    pub experience_required: Option<String>,
    pub skills: Option<Vec<String>>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl JobInput {
    pub fn merge(self, patch: JobInput) -> JobInput {
        JobInput {
            title: overlay(self.title, patch.title),
            description: overlay(self.description, patch.description),
            job_type: overlay(self.job_type, patch.job_type),
            location: overlay(self.location, patch.location),
            salary: overlay(self.salary, patch.salary),
            duration: overlay(self.duration, patch.duration),
            experience_required: overlay(self.experience_required, patch.experience_required),
            skills: overlay(self.skills, patch.skills),
            status: overlay(self.status, patch.status),
            start_date: overlay(self.start_date, patch.start_date),
            end_date: overlay(self.end_date, patch.end_date),
        }
    }
}

impl From<&Job> for JobInput {
    fn from(j: &Job) -> Self {
        JobInput {
            title: Some(j.title.clone()),
            description: Some(j.description.clone()),
            job_type: Some(j.job_type.code().to_string()),
            location: Some(j.location.clone()),
            salary: Some(SalaryInput {
                amount: j.salary.amount.map(NumberInput::Number),
                period: j.salary.period.map(|p| p.code().to_string()),
            }),
            duration: j.duration.clone(),
            experience_required: j.experience_required.clone(),
            skills: Some(j.skills.clone()),
            status: Some(j.status.code().to_string()),
            start_date: j.start_date.map(|d| d.to_string()),
            end_date: j.end_date.map(|d| d.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub job_type: JobType,
    pub location: String,
    pub salary: Salary,
    pub duration: Option<String>,
    pub experience_required: Option<String>,
    pub skills: Vec<String>,
    pub status: JobStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub fn validate_job(input: JobInput) -> Result<JobDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = require_text(&mut errors, "title", input.title.as_deref(), "Job title is required");
    let description = require_text(
        &mut errors,
        "description",
        input.description.as_deref(),
        "Description is required",
    );
    let location = require_text(
        &mut errors,
        "location",
        input.location.as_deref(),
        "Location is required",
    );
    let job_type = parse_code(
        &mut errors,
        "jobType",
        input.job_type.as_deref(),
        None,
        JobType::from_code,
        &format!("Job type must be one of: {}", JobType::codes()),
    );
    let status = parse_code(
        &mut errors,
        "status",
        input.status.as_deref(),
        Some(JobStatus::default()),
        JobStatus::from_code,
        &format!("Status must be one of: {}", JobStatus::codes()),
    );

    let salary_input = input.salary.unwrap_or_default();
    let amount = match read_number(salary_input.amount.as_ref()) {
        NumberField::Missing => Some(None),
        NumberField::Value(v) if v >= 0.0 => Some(Some(v)),
        NumberField::Value(_) => {
            errors.add("salary.amount", "Salary cannot be negative");
            None
        }
        NumberField::Invalid => {
            errors.add("salary.amount", "Salary must be a number");
            None
        }
    };
    let period = match non_blank(salary_input.period.as_deref()) {
        None => Some(None),
        Some(code) => {
            let parsed = SalaryPeriod::from_code(code);
            if parsed.is_none() {
                errors.add(
                    "salary.period",
                    format!("Salary period must be one of: {}", SalaryPeriod::codes()),
                );
            }
            parsed.map(Some)
        }
    };

    let start_date = parse_date(&mut errors, "startDate", input.start_date.as_deref());
    let end_date = parse_date(&mut errors, "endDate", input.end_date.as_deref());
    if let (Some(Some(start)), Some(Some(end))) = (start_date, end_date) {
        if end < start {
            errors.add("endDate", "End date cannot be before start date");
        }
    }

    finish(errors, || {
        Some(JobDraft {
            title: title?,
            description: description?,
            job_type: job_type?,
            location: location?,
            salary: Salary {
                amount: amount?,
                period: period?,
            },
            duration: optional_text(input.duration.as_deref()),
            experience_required: optional_text(input.experience_required.as_deref()),
            skills: clean_list(input.skills),
            status: status?,
            start_date: start_date?,
            end_date: end_date?,
        })
    })
}

/// `YYYY-MM-DD`, or an RFC 3339 timestamp whose date part is taken.
/// `Some(None)` when blank, `None` when unparsable.
fn parse_date(errors: &mut FieldErrors, field: &str, raw: Option<&str>) -> Option<Option<NaiveDate>> {
    let Some(value) = non_blank(raw) else {
        return Some(None);
    };

    let parsed = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()));

    if parsed.is_none() {
        errors.add(field, "Please enter a valid date (YYYY-MM-DD)");
    }
    parsed.map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_form() -> JobInput {
        JobInput {
            title: Some("Harvest helpers needed".into()),
            description: Some("Sugarcane harvest, 3 weeks".into()),
            job_type: Some("seasonal".into()),
            location: Some("Mandya".into()),
            salary: Some(SalaryInput {
                amount: Some(NumberInput::Text("600".into())),
                period: Some("daily".into()),
            }),
            skills: Some(vec![" cutting ".into(), " ".into(), "loading".into()]),
            start_date: Some("2025-01-10".into()),
            end_date: Some("2025-01-31".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_job() {
        let draft = validate_job(job_form()).unwrap();
        assert_eq!(draft.job_type, JobType::Seasonal);
        assert_eq!(draft.status, JobStatus::Open);
        assert_eq!(draft.salary.amount, Some(600.0));
        assert_eq!(draft.salary.period, Some(SalaryPeriod::Daily));
        assert_eq!(draft.skills, vec!["cutting".to_string(), "loading".to_string()]);
        assert_eq!(draft.start_date, NaiveDate::from_ymd_opt(2025, 1, 10));
    }

    #[test]
    fn test_salary_is_optional_but_checked() {
        let draft = validate_job(JobInput {
            salary: None,
            ..job_form()
        })
        .unwrap();
        assert_eq!(draft.salary, Salary::default());

        let errors = validate_job(JobInput {
            salary: Some(SalaryInput {
                amount: Some(NumberInput::Number(-5.0)),
                period: Some("hourly".into()),
            }),
            ..job_form()
        })
        .unwrap_err();
        assert_eq!(errors.get("salary.amount"), Some("Salary cannot be negative"));
        assert!(errors.contains("salary.period"));
    }

    #[test]
    fn test_end_before_start() {
        let errors = validate_job(JobInput {
            start_date: Some("2025-02-01".into()),
            end_date: Some("2025-01-01".into()),
            ..job_form()
        })
        .unwrap_err();
        assert_eq!(errors.get("endDate"), Some("End date cannot be before start date"));

        let errors = validate_job(JobInput {
            start_date: Some("next week".into()),
            ..job_form()
        })
        .unwrap_err();
        assert!(errors.contains("startDate"));
    }

    #[test]
    fn test_rfc3339_dates_accepted() {
        let draft = validate_job(JobInput {
            start_date: Some("2025-01-10T00:00:00Z".into()),
            ..job_form()
        })
        .unwrap();
        assert_eq!(draft.start_date, NaiveDate::from_ymd_opt(2025, 1, 10));
    }

    #[test]
    fn test_required_fields() {
        let errors = validate_job(JobInput::default()).unwrap_err();
        for field in ["title", "description", "jobType", "location"] {
            assert!(errors.contains(field), "{field}");
        }
    }
}
