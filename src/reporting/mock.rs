//! reporting::mock
//!
//! Mock reporting service for deterministic testing.
//!
//! # Design
//!
//! The mock serves a questionnaire built from a [`QuestionnaireLayout`],
//! records every call, keeps the submitted answers, and can be told to fail
//! (or stall) on one operation.
//!
//! # Example
//!
//! ```
//! use citycatalyst_cdp::reporting::mock::{MockOperation, MockReportingService};
//! use citycatalyst_cdp::reporting::ReportingService;
//!
//! # tokio_test::block_on(async {
//! let service = MockReportingService::new();
//! let city = service.city_id("Lagos", "Nigeria").await.unwrap();
//!
//! assert_eq!(city.as_str(), "mock-city-1");
//! assert!(matches!(service.operations()[0], MockOperation::CityId { .. }));
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::traits::{
    AnswerOption, CityId, MatrixAnswer, MatrixColumn, MatrixRow, Question, Questionnaire,
    ReportingError, ReportingService, Section, SingleSelectAnswer,
};
use crate::report::layout::QuestionnaireLayout;

/// Mock reporting service for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockReportingService {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockInner>>,
}

/// Internal mutable state.
#[derive(Debug)]
struct MockInner {
    /// Known cities by (name, country).
    cities: HashMap<(String, String), CityId>,
    /// Questionnaire served for every city.
    questionnaire: Questionnaire,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Method to stall on, and for how long.
    delay_on: Option<(Operation, Duration)>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
    /// Accepted single-select answers.
    answers: Vec<(CityId, SingleSelectAnswer)>,
    /// Accepted matrix answers.
    matrices: Vec<(CityId, MatrixAnswer)>,
}

/// The operations of [`ReportingService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CityId,
    Questionnaire,
    SubmitSingleSelect,
    SubmitMatrix,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail city_id with the given error.
    CityId(ReportingError),
    /// Fail questionnaire with the given error.
    Questionnaire(ReportingError),
    /// Fail submit_single_select with the given error.
    SubmitSingleSelect(ReportingError),
    /// Fail submit_matrix with the given error.
    SubmitMatrix(ReportingError),
}

impl FailOn {
    fn operation(&self) -> Operation {
        match self {
            FailOn::CityId(_) => Operation::CityId,
            FailOn::Questionnaire(_) => Operation::Questionnaire,
            FailOn::SubmitSingleSelect(_) => Operation::SubmitSingleSelect,
            FailOn::SubmitMatrix(_) => Operation::SubmitMatrix,
        }
    }

    fn error(&self) -> ReportingError {
        match self {
            FailOn::CityId(e)
            | FailOn::Questionnaire(e)
            | FailOn::SubmitSingleSelect(e)
            | FailOn::SubmitMatrix(e) => e.clone(),
        }
    }
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    CityId { city_name: String, country: String },
    Questionnaire { city: CityId },
    SubmitSingleSelect { city: CityId, answer: SingleSelectAnswer },
    SubmitMatrix { city: CityId, answer: MatrixAnswer },
}

impl MockOperation {
    /// Which trait operation this record is for.
    pub fn kind(&self) -> Operation {
        match self {
            MockOperation::CityId { .. } => Operation::CityId,
            MockOperation::Questionnaire { .. } => Operation::Questionnaire,
            MockOperation::SubmitSingleSelect { .. } => Operation::SubmitSingleSelect,
            MockOperation::SubmitMatrix { .. } => Operation::SubmitMatrix,
        }
    }
}

impl MockReportingService {
    /// Create a mock serving the default layout's questionnaire.
    ///
    /// Unknown cities resolve to `mock-city-N`.
    pub fn new() -> Self {
        Self::with_questionnaire(questionnaire_for_layout(&QuestionnaireLayout::default()))
    }

    /// Create a mock serving a specific questionnaire.
    pub fn with_questionnaire(questionnaire: Questionnaire) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockInner {
                cities: HashMap::new(),
                questionnaire,
                fail_on: None,
                delay_on: None,
                operations: Vec::new(),
                answers: Vec::new(),
                matrices: Vec::new(),
            })),
        }
    }

    /// Register a fixed CDP id for a city.
    pub fn with_city(self, city_name: &str, country: &str, id: &str) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.cities.insert(
                (city_name.to_string(), country.to_string()),
                CityId::new(id),
            );
        }
        self
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use citycatalyst_cdp::reporting::mock::{FailOn, MockReportingService};
    /// use citycatalyst_cdp::reporting::ReportingError;
    ///
    /// let service = MockReportingService::new()
    ///     .fail_on(FailOn::SubmitMatrix(ReportingError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Configure the mock to sleep before answering one operation.
    pub fn delay_on(self, operation: Operation, delay: Duration) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.delay_on = Some((operation, delay));
        }
        self
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Count recorded calls of one operation.
    pub fn count(&self, operation: Operation) -> usize {
        let inner = self.inner.lock().unwrap();
        inner
            .operations
            .iter()
            .filter(|op| op.kind() == operation)
            .count()
    }

    /// Accepted single-select answers.
    pub fn answers(&self) -> Vec<(CityId, SingleSelectAnswer)> {
        let inner = self.inner.lock().unwrap();
        inner.answers.clone()
    }

    /// Accepted matrix answers.
    pub fn matrices(&self) -> Vec<(CityId, MatrixAnswer)> {
        let inner = self.inner.lock().unwrap();
        inner.matrices.clone()
    }

    /// Record an operation, then stall or fail if configured to.
    async fn enter(&self, op: MockOperation) -> Result<(), ReportingError> {
        let kind = op.kind();
        let (delay, failure) = {
            let mut inner = self.inner.lock().unwrap();
            inner.operations.push(op);
            let delay = inner
                .delay_on
                .filter(|(target, _)| *target == kind)
                .map(|(_, d)| d);
            let failure = inner
                .fail_on
                .as_ref()
                .filter(|f| f.operation() == kind)
                .map(FailOn::error);
            (delay, failure)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for MockReportingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportingService for MockReportingService {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn city_id(&self, city_name: &str, country: &str) -> Result<CityId, ReportingError> {
        self.enter(MockOperation::CityId {
            city_name: city_name.to_string(),
            country: country.to_string(),
        })
        .await?;

        let mut inner = self.inner.lock().unwrap();
        let next = inner.cities.len() + 1;
        let id = inner
            .cities
            .entry((city_name.to_string(), country.to_string()))
            .or_insert_with(|| CityId::new(format!("mock-city-{}", next)))
            .clone();
        Ok(id)
    }

    async fn questionnaire(&self, city: &CityId) -> Result<Questionnaire, ReportingError> {
        self.enter(MockOperation::Questionnaire { city: city.clone() })
            .await?;

        let inner = self.inner.lock().unwrap();
        Ok(inner.questionnaire.clone())
    }

    async fn submit_single_select(
        &self,
        city: &CityId,
        answer: SingleSelectAnswer,
    ) -> Result<(), ReportingError> {
        self.enter(MockOperation::SubmitSingleSelect {
            city: city.clone(),
            answer: answer.clone(),
        })
        .await?;

        let mut inner = self.inner.lock().unwrap();
        inner.answers.push((city.clone(), answer));
        Ok(())
    }

    async fn submit_matrix(
        &self,
        city: &CityId,
        answer: MatrixAnswer,
    ) -> Result<(), ReportingError> {
        self.enter(MockOperation::SubmitMatrix {
            city: city.clone(),
            answer: answer.clone(),
        })
        .await?;

        let mut inner = self.inner.lock().unwrap();
        inner.matrices.push((city.clone(), answer));
        Ok(())
    }
}

/// Build a questionnaire that satisfies `layout`.
///
/// Filler sections and questions pad the indices the layout points at.
/// Row ids are `row-<category slug>`, the emissions column id is
/// `col-emissions`, and the inventory question offers Yes/No.
pub fn questionnaire_for_layout(layout: &QuestionnaireLayout) -> Questionnaire {
    let filler_question = |s: usize, q: usize| Question {
        id: format!("q-{}.{}", s, q),
        title: format!("Question {}.{}", s, q),
        options: Vec::new(),
        rows: Vec::new(),
        columns: Vec::new(),
    };

    let mut sections: Vec<Section> = (0..layout.section_index)
        .map(|s| Section {
            id: format!("s-{}", s),
            title: format!("Section {}", s),
            questions: vec![filler_question(s, 0)],
        })
        .collect();

    let s = layout.section_index;
    let question_count = layout.inventory_question_index.max(layout.emissions_question_index) + 1;
    let mut questions: Vec<Question> = (0..question_count).map(|q| filler_question(s, q)).collect();

    questions[layout.inventory_question_index].title =
        "Does your city have a community-wide emissions inventory?".to_string();
    questions[layout.inventory_question_index].options = vec![
        AnswerOption {
            id: "opt-yes".to_string(),
            name: layout.yes_option.clone(),
        },
        AnswerOption {
            id: "opt-no".to_string(),
            name: "No".to_string(),
        },
    ];

    let emissions = &mut questions[layout.emissions_question_index];
    emissions.title = "Provide a breakdown of your community-wide emissions".to_string();
    emissions.columns = vec![
        MatrixColumn {
            id: "col-emissions".to_string(),
            header: layout.emissions_column.clone(),
        },
        MatrixColumn {
            id: "col-comment".to_string(),
            header: "Comment".to_string(),
        },
    ];
    emissions.rows = layout
        .rows
        .iter()
        .map(|anchor| MatrixRow {
            id: format!("row-{}", anchor.category.slug()),
            title: anchor.title.clone(),
        })
        .collect();

    sections.push(Section {
        id: format!("s-{}", s),
        title: "Emissions".to_string(),
        questions,
    });

    Questionnaire { sections }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn city_ids_are_stable_per_city() {
        let service = MockReportingService::new();
        let a = service.city_id("Lagos", "Nigeria").await.unwrap();
        let b = service.city_id("Lagos", "Nigeria").await.unwrap();
        let c = service.city_id("Quito", "Ecuador").await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn registered_city_is_returned() {
        let service = MockReportingService::new().with_city("Lagos", "Nigeria", "cdp-42");
        let id = service.city_id("Lagos", "Nigeria").await.unwrap();
        assert_eq!(id.as_str(), "cdp-42");
    }

    #[tokio::test]
    async fn failure_is_recorded_and_returned() {
        let service = MockReportingService::new()
            .fail_on(FailOn::Questionnaire(ReportingError::RateLimited));
        let city = CityId::new("c");

        let err = service.questionnaire(&city).await.unwrap_err();

        assert_eq!(err, ReportingError::RateLimited);
        assert_eq!(service.count(Operation::Questionnaire), 1);
    }

    #[tokio::test]
    async fn rejected_submission_is_not_stored() {
        let service = MockReportingService::new().fail_on(FailOn::SubmitMatrix(
            ReportingError::ApiError {
                status: 400,
                message: "bad".into(),
            },
        ));
        let city = CityId::new("c");
        let answer = MatrixAnswer {
            question_id: "q".into(),
            rows: Vec::new(),
        };

        assert!(service.submit_matrix(&city, answer).await.is_err());
        assert!(service.matrices().is_empty());
    }

    #[test]
    fn generated_questionnaire_matches_layout_indices() {
        let layout = QuestionnaireLayout::default();
        let q = questionnaire_for_layout(&layout);

        let section = &q.sections[layout.section_index];
        assert_eq!(
            section.questions[layout.inventory_question_index].options[0].id,
            "opt-yes"
        );
        assert_eq!(
            section.questions[layout.emissions_question_index].rows.len(),
            layout.rows.len()
        );
    }
}
