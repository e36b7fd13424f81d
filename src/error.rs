//! Error types and handling for the air-quality lookup

use thiserror::Error;

/// Main error type for a location air-quality lookup
#[derive(Error, Debug)]
pub enum AqiError {
    /// The platform has no geolocation capability
    #[error("Geolocation error: geolocation is not supported on this platform")]
    CapabilityUnavailable,

    /// The user or platform declined to share the position
    #[error("Geolocation error: permission denied: {message}")]
    PermissionDenied { message: String },

    /// The platform failed to produce a position
    #[error("Geolocation error: {message}")]
    CapabilityFailed { message: String },

    /// Request could not be sent or returned a non-success status
    #[error("Network error: {message}")]
    Network { message: String },

    /// Response body was not the expected JSON document
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// The air-quality service answered with an error status
    #[error("Service error: {message}")]
    Service { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl AqiError {
    /// Create a new permission-denied error
    pub fn permission_denied<S: Into<String>>(message: S) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create a new capability-failed error
    pub fn capability_failed<S: Into<String>>(message: S) -> Self {
        Self::CapabilityFailed {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new service error
    pub fn service<S: Into<String>>(message: S) -> Self {
        Self::Service {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True when the geolocation capability itself failed
    #[must_use]
    pub fn is_geolocation(&self) -> bool {
        matches!(
            self,
            AqiError::CapabilityUnavailable
                | AqiError::PermissionDenied { .. }
                | AqiError::CapabilityFailed { .. }
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AqiError::CapabilityUnavailable => {
                "Geolocation is not supported. Pass --lat/--lon or enable IP lookup.".to_string()
            }
            AqiError::PermissionDenied { .. } => {
                "Location access was denied.".to_string()
            }
            AqiError::CapabilityFailed { message } => {
                format!("Unable to determine your location: {message}")
            }
            AqiError::Network { .. } => {
                "Unable to reach the air-quality service. Please check your internet connection."
                    .to_string()
            }
            AqiError::Parse { .. } => {
                "The air-quality service returned data that could not be read.".to_string()
            }
            AqiError::Service { message } => {
                format!("The air-quality service rejected the request: {message}")
            }
            AqiError::Config { .. } => {
                "Configuration error. Please check your config file and service token.".to_string()
            }
        }
    }
}

impl From<serde_json::Error> for AqiError {
    fn from(err: serde_json::Error) -> Self {
        AqiError::parse(err.to_string())
    }
}
