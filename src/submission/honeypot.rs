/// Check the honeypot value. Returns true if spam detected.
pub fn is_spam(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
