use thiserror::Error;

/// Failures surfaced by the weather data client.
///
/// Lower layers (store, search controller) never pass these to presentation
/// directly; they convert them with [`WeatherError::user_message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// Transport failure or non-success HTTP status.
    #[error("Network error: {0}")]
    Network(String),

    /// Required structural fields are missing or the body is not valid JSON.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A well-formed lookup that matched nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Search query must not be empty")]
    InvalidQuery,
}

impl WeatherError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(msg) => format!("Failed to fetch weather data ({msg})"),
            Self::MalformedResponse(_) => {
                "Weather service returned incomplete data".to_string()
            }
            Self::NotFound(query) => format!("Nothing found for \"{query}\""),
            Self::InvalidQuery => "Enter a city name".to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_are_never_empty() {
        let errors = [
            WeatherError::Network("status 500".into()),
            WeatherError::MalformedResponse("missing `daily`".into()),
            WeatherError::NotFound("Atlantis".into()),
            WeatherError::InvalidQuery,
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "{err:?}");
        }
    }

    #[test]
    fn network_message_keeps_detail() {
        let err = WeatherError::Network("status 500 Internal Server Error".into());
        assert!(err.user_message().contains("500"));
    }

    #[test]
    fn not_found_is_distinguishable() {
        assert!(WeatherError::NotFound("x".into()).is_not_found());
        assert!(!WeatherError::Network("x".into()).is_not_found());
    }
}
