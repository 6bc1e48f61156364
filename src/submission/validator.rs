use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::models::NewLead;

use super::honeypot;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"));

/// Raw lead form as posted by the landing page. Every field is optional here
/// so that a missing field is reported by the validator, not the decoder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub workflow: Option<String>,
    /// Honeypot. Hidden on the page, so people leave it empty.
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub kind: ValidationErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    Missing,
    TooShort { min: usize },
    TooLong { max: usize },
    Malformed,
    Honeypot,
}

impl ValidationError {
    pub fn new(field: &'static str, kind: ValidationErrorKind) -> Self {
        Self { field, kind }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ValidationErrorKind::Missing => write!(f, "{} is required", self.field),
            ValidationErrorKind::TooShort { min } => {
                write!(f, "{} must be at least {min} characters", self.field)
            }
            ValidationErrorKind::TooLong { max } => {
                write!(f, "{} must be at most {max} characters", self.field)
            }
            ValidationErrorKind::Malformed => write!(f, "{} is malformed", self.field),
            ValidationErrorKind::Honeypot => write!(f, "{} was filled in", self.field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a raw form and return the trimmed lead.
///
/// The honeypot is checked first so a bot never gets past it by also
/// sending bad fields.
pub fn validate(form: &LeadForm) -> Result<NewLead, ValidationError> {
    if honeypot::is_spam(form.website.as_deref()) {
        return Err(ValidationError::new("website", ValidationErrorKind::Honeypot));
    }

    let name = required("name", form.name.as_deref(), 2, 100)?;
    let company = required("company", form.company.as_deref(), 2, 120)?;
    let role = optional("role", form.role.as_deref(), 120)?;
    let email = required("email", form.email.as_deref(), 5, 200)?;
    if !EMAIL_RE.is_match(&email) {
        return Err(ValidationError::new("email", ValidationErrorKind::Malformed));
    }
    let system = optional("system", form.system.as_deref(), 120)?;
    let workflow = required("workflow", form.workflow.as_deref(), 10, 4000)?;

    Ok(NewLead {
        name,
        company,
        role,
        email,
        system,
        workflow,
    })
}

fn required(
    field: &'static str,
    value: Option<&str>,
    min: usize,
    max: usize,
) -> Result<String, ValidationError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::new(field, ValidationErrorKind::Missing))?;

    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::new(field, ValidationErrorKind::TooShort { min }));
    }
    if len > max {
        return Err(ValidationError::new(field, ValidationErrorKind::TooLong { max }));
    }
    Ok(value.to_string())
}

fn optional(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if value.chars().count() > max {
        return Err(ValidationError::new(field, ValidationErrorKind::TooLong { max }));
    }
    Ok(Some(value.to_string()))
}
