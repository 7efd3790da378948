use std::fmt;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::ConfigError;
use crate::intake::IntakeError;
use crate::telemetry::TelemetryError;

/// Failures surfaced by the binary and the HTTP layer.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Submission(serde_json::Error),
    Payload(JsonRejection),
    Intake(IntakeError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Telemetry(err) => fmt::Display::fmt(err, f),
            Self::Io(err) => write!(f, "i/o failure: {err}"),
            Self::Submission(err) => write!(f, "invalid submission payload: {err}"),
            Self::Payload(err) => write!(f, "invalid submission payload: {}", err.body_text()),
            // Intake messages reach clients verbatim.
            Self::Intake(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let source: &(dyn std::error::Error + 'static) = match self {
            Self::Config(err) => err,
            Self::Telemetry(err) => err,
            Self::Io(err) => err,
            Self::Submission(err) => err,
            Self::Payload(err) => err,
            Self::Intake(err) => err,
        };
        Some(source)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Submission(_) | Self::Payload(_) | Self::Intake(IntakeError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Intake(IntakeError::DuplicateEmail) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<TelemetryError> for AppError {
    fn from(err: TelemetryError) -> Self {
        Self::Telemetry(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Submission(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        Self::Payload(err)
    }
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        Self::Intake(err)
    }
}
