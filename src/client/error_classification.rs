//! Error classification for provider HTTP statuses.

/// Map an HTTP status from the provider to an error class and whether a
/// repeated call could plausibly succeed.
pub fn classify_status(status: u16) -> (&'static str, bool) {
    match status {
        400 | 422 => ("invalid_request", false),
        401 => ("authentication", false),
        402 => ("quota_exhausted", false),
        403 => ("permission_denied", false),
        404 => ("not_found", false),
        408 => ("timeout", true),
        409 => ("conflict", true),
        413 => ("request_too_large", false),
        429 => ("rate_limited", true),
        500 | 502 => ("server_error", true),
        503 | 529 => ("overloaded", true),
        504 => ("timeout", true),
        s if s >= 500 => ("server_error", true),
        _ => ("unknown", false),
    }
}
