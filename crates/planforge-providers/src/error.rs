//! Errors raised while resolving, calling, or decoding a vendor.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API Key is required")]
    MissingApiKey,

    #[error("No model selected for provider '{0}'")]
    MissingModel(String),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Provider '{0}' needs an endpoint URL")]
    MissingEndpoint(String),

    #[error("Invalid value for header '{0}'")]
    InvalidHeader(&'static str),

    #[error("Request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(
        "Cannot reach the relay at {url}. Check that the relay is running \
         (`planforge relay`), that the address is correct, and that the network is up. \
         Cause: {source}"
    )]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The vendor (or the relay on its behalf) answered with a non-2xx status.
    #[error("API call failed ({status}): {message}")]
    Upstream {
        status: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Unexpected response format from the AI service")]
    EmptyReply,
}

impl ProviderError {
    /// Errors the caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ProviderError::MissingApiKey
                | ProviderError::MissingModel(_)
                | ProviderError::UnsupportedProvider(_)
                | ProviderError::MissingEndpoint(_)
                | ProviderError::InvalidHeader(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_relay_wording() {
        assert_eq!(ProviderError::MissingApiKey.to_string(), "API Key is required");
        assert_eq!(
            ProviderError::UnsupportedProvider("mistral".into()).to_string(),
            "Unsupported provider: mistral"
        );
    }

    #[test]
    fn test_upstream_display() {
        let err = ProviderError::Upstream {
            status: 401,
            message: "invalid x-api-key".into(),
            details: None,
        };
        assert_eq!(err.to_string(), "API call failed (401): invalid x-api-key");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_client_errors() {
        assert!(ProviderError::MissingApiKey.is_client_error());
        assert!(ProviderError::MissingEndpoint("custom".into()).is_client_error());
        assert!(!ProviderError::EmptyReply.is_client_error());
    }
}
