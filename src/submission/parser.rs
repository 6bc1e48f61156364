use serde_json::{Map, Value};

use super::validator::{LeadForm, ValidationError, ValidationErrorKind};

/// Decode a lead form from the request body based on the Content-Type header.
pub fn parse_lead(content_type: Option<&str>, body: &[u8]) -> Result<LeadForm, ValidationError> {
    let value = parse_body(content_type, body).map_err(|e| {
        tracing::debug!("Unparseable lead body: {e}");
        ValidationError::new("body", ValidationErrorKind::Malformed)
    })?;

    serde_json::from_value(value).map_err(|e| {
        tracing::debug!("Lead body has unexpected shape: {e}");
        ValidationError::new("body", ValidationErrorKind::Malformed)
    })
}

/// Parse a request body into a JSON value.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<Value, String> {
    let ct = content_type.unwrap_or("application/json");

    if ct.contains("application/json") {
        serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))
    } else if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)
    } else {
        // Try JSON first, then form-urlencoded
        serde_json::from_slice(body)
            .or_else(|_| parse_form_urlencoded(body))
            .map_err(|e| format!("Unable to parse body: {e}"))
    }
}

fn parse_form_urlencoded(body: &[u8]) -> Result<Value, String> {
    std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;

    let map: Map<String, Value> = form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect();
    Ok(Value::Object(map))
}
