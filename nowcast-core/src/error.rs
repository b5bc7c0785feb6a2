use reqwest::StatusCode;

/// Errors returned by the location and forecast providers.
///
/// Every variant aborts the refresh that produced it; callers are expected
/// to keep whatever they displayed last and try again on the next tick.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport failure or a non-success HTTP status.
    #[error("network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Malformed JSON, unexpected value shape or an unparsable timestamp.
    #[error("decode error: {0}")]
    Decode(String),

    /// The remote service reported a failure itself. Message is verbatim.
    #[error("service error: {0}")]
    Service(String),

    /// A required field is absent from an otherwise well-formed response.
    #[error("missing field `{0}` in response")]
    MissingField(String),
}

impl FetchError {
    pub(crate) fn transport(context: &str, source: reqwest::Error) -> Self {
        FetchError::Network {
            message: format!("{context}: {source}"),
            source: Some(source),
        }
    }

    pub(crate) fn status(context: &str, status: StatusCode, body: &str) -> Self {
        FetchError::Network {
            message: format!(
                "{context} failed with status {status}: {}",
                truncate_body(body)
            ),
            source: None,
        }
    }

    pub(crate) fn decode(context: &str, err: impl std::fmt::Display) -> Self {
        FetchError::Decode(format!("{context}: {err}"))
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }

    #[test]
    fn status_error_is_a_network_error() {
        let err = FetchError::status("IP API request", StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(err, FetchError::Network { source: None, .. }));
        let msg = err.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("upstream down"));
    }

    #[test]
    fn service_error_keeps_message_verbatim() {
        let err = FetchError::Service("invalid query".into());
        assert_eq!(err.to_string(), "service error: invalid query");
    }
}
