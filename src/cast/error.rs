//! Cast framework error codes and their human-readable messages

use std::str::FromStr;
use thiserror::Error;

/// Error codes reported by the cast framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastErrorCode {
    ApiNotInitialized,
    Cancel,
    ChannelError,
    ExtensionMissing,
    InvalidParameter,
    ReceiverUnavailable,
    SessionError,
    Timeout,
    /// Reported by newer frameworks; not covered by the message table
    LoadMediaFailed,
}

impl CastErrorCode {
    /// Framework string for this code
    pub fn as_str(&self) -> &'static str {
        match self {
            CastErrorCode::ApiNotInitialized => "api_not_initialized",
            CastErrorCode::Cancel => "cancel",
            CastErrorCode::ChannelError => "channel_error",
            CastErrorCode::ExtensionMissing => "extension_missing",
            CastErrorCode::InvalidParameter => "invalid_parameter",
            CastErrorCode::ReceiverUnavailable => "receiver_unavailable",
            CastErrorCode::SessionError => "session_error",
            CastErrorCode::Timeout => "timeout",
            CastErrorCode::LoadMediaFailed => "load_media_failed",
        }
    }

    /// Message shown for this code
    pub fn message(&self) -> &'static str {
        match self {
            CastErrorCode::ApiNotInitialized => "The API is not initialized.",
            CastErrorCode::Cancel => "The operation was canceled by the user",
            CastErrorCode::ChannelError => "A channel to the receiver is not available.",
            CastErrorCode::ExtensionMissing => "The Cast extension is not available.",
            CastErrorCode::InvalidParameter => "The parameters to the operation were not valid.",
            CastErrorCode::ReceiverUnavailable => {
                "No receiver was compatible with the session request."
            }
            CastErrorCode::SessionError => {
                "A session could not be created, or a session was invalid."
            }
            CastErrorCode::Timeout => "The operation timed out.",
            CastErrorCode::LoadMediaFailed => "Unknown cast error",
        }
    }
}

/// A framework error string outside the known table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown cast error code '{0}'")]
pub struct UnknownErrorCode(pub String);

impl FromStr for CastErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "api_not_initialized" => Ok(CastErrorCode::ApiNotInitialized),
            "cancel" => Ok(CastErrorCode::Cancel),
            "channel_error" => Ok(CastErrorCode::ChannelError),
            "extension_missing" => Ok(CastErrorCode::ExtensionMissing),
            "invalid_parameter" => Ok(CastErrorCode::InvalidParameter),
            "receiver_unavailable" => Ok(CastErrorCode::ReceiverUnavailable),
            "session_error" => Ok(CastErrorCode::SessionError),
            "timeout" => Ok(CastErrorCode::Timeout),
            "load_media_failed" => Ok(CastErrorCode::LoadMediaFailed),
            _ => Err(UnknownErrorCode(code.to_string())),
        }
    }
}

/// Error reported by the cast framework
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", render(.code, .description))]
pub struct CastError {
    pub code: CastErrorCode,
    pub description: Option<String>,
}

impl CastError {
    pub fn new(code: CastErrorCode) -> Self {
        Self { code, description: None }
    }

    pub fn with_description(code: CastErrorCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: Some(description.into()),
        }
    }

    /// Human-readable message, with the framework's description appended
    pub fn message(&self) -> String {
        render(&self.code, &self.description)
    }
}

fn render(code: &CastErrorCode, description: &Option<String>) -> String {
    match description.as_deref().filter(|d| !d.is_empty()) {
        Some(description) => format!("{}: {}", code.message(), description),
        None => code.message().to_string(),
    }
}
