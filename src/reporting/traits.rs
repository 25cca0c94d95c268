//! reporting::traits
//!
//! Trait definition for the external CDP reporting service.
//!
//! # Design
//!
//! The `ReportingService` trait is async because every operation is network
//! I/O against a third-party API. All methods return `Result` so callers can
//! classify failures as dependency errors.
//!
//! The questionnaire types mirror the CDP schema loosely: sections contain
//! questions, and questions carry answer options (single select) or
//! rows/columns (matrix). Titles are free text; nothing here interprets them.
//! Mapping titles to emissions categories is `report::layout`'s job.
//!
//! # Example
//!
//! ```ignore
//! use citycatalyst_cdp::reporting::{ReportingService, SingleSelectAnswer};
//!
//! async fn answer_yes(service: &dyn ReportingService) -> Result<(), ReportingError> {
//!     let city = service.city_id("Ciudad Autónoma de Buenos Aires", "Argentina").await?;
//!     service
//!         .submit_single_select(&city, SingleSelectAnswer {
//!             question_id: "q-2.1".to_string(),
//!             option_id: "opt-yes".to_string(),
//!             answer: "Yes".to_string(),
//!         })
//!         .await
//! }
//! ```

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from reporting service operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportingError {
    /// The client has no endpoint configured.
    #[error("reporting service not configured: {0}")]
    NotConfigured(String),

    /// Authentication failed (missing, invalid or expired token).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// Identifier CDP assigns to a city.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityId(String);

impl CityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A CDP questionnaire as fetched for one city.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Questionnaire {
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// A questionnaire section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// A single question. Single-select questions carry `options`; matrix
/// questions carry `rows` and `columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
    #[serde(default)]
    pub columns: Vec<MatrixColumn>,
}

/// An option of a single-select question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: String,
    pub name: String,
}

/// A row of a matrix question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub id: String,
    pub title: String,
}

/// A column of a matrix question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixColumn {
    pub id: String,
    pub header: String,
}

/// Answer to a single-select question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleSelectAnswer {
    pub question_id: String,
    pub option_id: String,
    /// The option's text, echoed back as CDP expects
    pub answer: String,
}

/// One populated cell of a matrix answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixCell {
    pub row_id: String,
    pub column_id: String,
    pub value: String,
}

/// Answer to a matrix question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixAnswer {
    pub question_id: String,
    pub rows: Vec<MatrixCell>,
}

/// The trait for interacting with the CDP reporting service.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across request
/// handlers.
///
/// # Error Handling
///
/// All methods return `Result<T, ReportingError>`. Callers do not retry;
/// every error is surfaced as a dependency failure.
#[async_trait]
pub trait ReportingService: Send + Sync {
    /// Get the service name (e.g., "cdp", "mock").
    fn name(&self) -> &'static str;

    /// Resolve the CDP city id for a city name and country.
    ///
    /// # Errors
    ///
    /// - `NotFound` if CDP does not know the city
    async fn city_id(&self, city_name: &str, country: &str) -> Result<CityId, ReportingError>;

    /// Fetch the questionnaire for a city.
    async fn questionnaire(&self, city: &CityId) -> Result<Questionnaire, ReportingError>;

    /// Submit the answer to a single-select question.
    async fn submit_single_select(
        &self,
        city: &CityId,
        answer: SingleSelectAnswer,
    ) -> Result<(), ReportingError>;

    /// Submit a matrix answer. All-or-nothing from the caller's perspective.
    async fn submit_matrix(&self, city: &CityId, answer: MatrixAnswer)
        -> Result<(), ReportingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporting_error_display() {
        assert_eq!(
            format!("{}", ReportingError::NotConfigured("no api_base".into())),
            "reporting service not configured: no api_base"
        );
        assert_eq!(
            format!("{}", ReportingError::AuthFailed("expired token".into())),
            "authentication failed: expired token"
        );
        assert_eq!(format!("{}", ReportingError::RateLimited), "rate limited");
        assert_eq!(
            format!(
                "{}",
                ReportingError::ApiError {
                    status: 422,
                    message: "invalid option".into()
                }
            ),
            "API error: 422 - invalid option"
        );
        assert_eq!(
            format!("{}", ReportingError::NetworkError("connection refused".into())),
            "network error: connection refused"
        );
    }

    #[test]
    fn questionnaire_tolerates_missing_collections() {
        let json = r#"{"sections":[{"id":"s1","questions":[{"id":"q1"}]}]}"#;
        let q: Questionnaire = serde_json::from_str(json).unwrap();
        let question = &q.sections[0].questions[0];
        assert!(question.options.is_empty());
        assert!(question.rows.is_empty());
        assert!(question.columns.is_empty());
    }

    #[test]
    fn matrix_answer_uses_camel_case() {
        let answer = MatrixAnswer {
            question_id: "q".into(),
            rows: vec![MatrixCell {
                row_id: "r".into(),
                column_id: "c".into(),
                value: "10".into(),
            }],
        };
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["questionId"], "q");
        assert_eq!(json["rows"][0]["rowId"], "r");
        assert_eq!(json["rows"][0]["columnId"], "c");
    }
}
