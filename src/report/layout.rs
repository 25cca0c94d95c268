//! report::layout
//!
//! Versioned map from emissions categories to CDP questionnaire anchors.
//!
//! # Design
//!
//! The CDP questionnaire is loosely structured: rows and columns are only
//! identified by free-text titles. A [`QuestionnaireLayout`] records, for one
//! questionnaire version, exactly where each anchor lives:
//!
//! - the section holding the emissions questions
//! - the single-select "has an emissions inventory" question and its yes option
//! - the emissions matrix question, its emissions column, and one row title
//!   per [`Category`]
//!
//! Titles are compared after trimming, ignoring ASCII case. Any anchor that
//! cannot be found is a hard [`LayoutError`].
//!
//! The built-in layout can be replaced from config when CDP publishes a new
//! questionnaire version.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::catalog::Category;
use crate::reporting::{AnswerOption, Questionnaire};

/// Errors raised while matching a questionnaire against a layout.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("questionnaire has no section at index {index}")]
    SectionMissing { index: usize },

    #[error("section '{section}' has no question at index {index}")]
    QuestionMissing { section: String, index: usize },

    #[error("question '{question}' has no option named '{name}'")]
    OptionMissing { question: String, name: String },

    #[error("question '{question}' has no column with header '{header}'")]
    ColumnMissing { question: String, header: String },

    #[error("question '{question}' has no row titled '{title}' (category {category})")]
    RowMissing {
        question: String,
        category: Category,
        title: String,
    },

    #[error("layout {version} maps no row for category {category}")]
    UnmappedCategory { version: String, category: Category },

    #[error("layout {version} maps category {category} more than once")]
    DuplicateCategory { version: String, category: Category },

    #[error("layout {version} has an empty title for {what}")]
    EmptyTitle { version: String, what: String },
}

/// Expected title of the matrix row for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RowAnchor {
    pub category: Category,
    pub title: String,
}

/// Where the emissions answers live in one questionnaire version.
///
/// # Example
///
/// ```toml
/// [layout]
/// schema_version = "cdp-cities-2025"
/// section_index = 3
/// inventory_question_index = 0
/// yes_option = "Yes"
/// emissions_question_index = 2
/// emissions_column = "Emissions (metric tonnes CO2e)"
///
/// [[layout.rows]]
/// category = "basic"
/// title = "Total BASIC emissions"
/// # ... one entry per category
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionnaireLayout {
    /// Questionnaire version this layout was written against
    pub schema_version: String,
    /// Index of the emissions section
    pub section_index: usize,
    /// Index of the "has an emissions inventory" question within the section
    pub inventory_question_index: usize,
    /// Name of the affirmative option of that question
    pub yes_option: String,
    /// Index of the emissions matrix question within the section
    pub emissions_question_index: usize,
    /// Header of the matrix column receiving the totals
    pub emissions_column: String,
    /// One row per category
    pub rows: Vec<RowAnchor>,
}

/// Questionnaire ids resolved from a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchors {
    pub inventory_question_id: String,
    pub yes_option: AnswerOption,
    pub emissions_question_id: String,
    pub emissions_column_id: String,
    /// Row id for every category, in [`Category::ALL`] order
    pub rows: Vec<(Category, String)>,
}

impl Default for QuestionnaireLayout {
    fn default() -> Self {
        Self::cdp_cities_2024()
    }
}

impl QuestionnaireLayout {
    /// Layout of the 2024 CDP cities questionnaire.
    pub fn cdp_cities_2024() -> Self {
        let row = |category, title: &str| RowAnchor {
            category,
            title: title.to_string(),
        };

        Self {
            schema_version: "cdp-cities-2024".to_string(),
            section_index: 3,
            inventory_question_index: 0,
            yes_option: "Yes".to_string(),
            emissions_question_index: 2,
            emissions_column: "Emissions (metric tonnes CO2e)".to_string(),
            rows: vec![
                row(
                    Category::TotalScope1ExcludingGeneration,
                    "Total scope 1 emissions (excluding generation of grid-supplied energy)",
                ),
                row(
                    Category::Scope1FromGeneration,
                    "Scope 1 emissions from generation of grid-supplied energy",
                ),
                row(Category::TotalScope2, "Total scope 2 emissions"),
                row(Category::TotalScope3, "Total scope 3 emissions"),
                row(Category::StationaryEnergyScope1, "Stationary energy: scope 1"),
                row(Category::StationaryEnergyScope2, "Stationary energy: scope 2"),
                row(Category::StationaryEnergyScope3, "Stationary energy: scope 3"),
                row(Category::TransportationScope1, "Transportation: scope 1"),
                row(Category::TransportationScope2, "Transportation: scope 2"),
                row(Category::TransportationScope3, "Transportation: scope 3"),
                row(
                    Category::WasteWithinScope1,
                    "Waste generated and treated within the city boundary: scope 1",
                ),
                row(
                    Category::WasteWithinScope3,
                    "Waste generated within the city boundary, treated outside: scope 3",
                ),
                row(
                    Category::WasteOutsideScope1,
                    "Waste generated outside the city boundary, treated within: scope 1",
                ),
                row(Category::Basic, "Total BASIC emissions"),
            ],
        }
    }

    /// Check that every category is mapped exactly once and no title is blank.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let version = &self.schema_version;
        let blank = |what: &str| LayoutError::EmptyTitle {
            version: version.clone(),
            what: what.to_string(),
        };

        if self.yes_option.trim().is_empty() {
            return Err(blank("yes_option"));
        }
        if self.emissions_column.trim().is_empty() {
            return Err(blank("emissions_column"));
        }

        for category in Category::ALL {
            let mut matching = self.rows.iter().filter(|r| r.category == category);
            let anchor = matching.next().ok_or(LayoutError::UnmappedCategory {
                version: version.clone(),
                category,
            })?;
            if matching.next().is_some() {
                return Err(LayoutError::DuplicateCategory {
                    version: version.clone(),
                    category,
                });
            }
            if anchor.title.trim().is_empty() {
                return Err(blank(category.slug()));
            }
        }

        Ok(())
    }

    /// Expected row title for a category.
    pub fn row_title(&self, category: Category) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.title.as_str())
    }

    /// Resolve every anchor against a fetched questionnaire.
    ///
    /// # Errors
    ///
    /// Fails on the first anchor that is absent. Missing rows and a missing
    /// yes option are treated alike.
    pub fn locate(&self, questionnaire: &Questionnaire) -> Result<Anchors, LayoutError> {
        let section = questionnaire
            .sections
            .get(self.section_index)
            .ok_or(LayoutError::SectionMissing {
                index: self.section_index,
            })?;

        let question_at = |index: usize| {
            section
                .questions
                .get(index)
                .ok_or_else(|| LayoutError::QuestionMissing {
                    section: section.id.clone(),
                    index,
                })
        };

        let inventory_question = question_at(self.inventory_question_index)?;
        let yes_option = inventory_question
            .options
            .iter()
            .find(|o| titles_match(&o.name, &self.yes_option))
            .ok_or_else(|| LayoutError::OptionMissing {
                question: inventory_question.id.clone(),
                name: self.yes_option.clone(),
            })?;

        let emissions_question = question_at(self.emissions_question_index)?;
        let column = emissions_question
            .columns
            .iter()
            .find(|c| titles_match(&c.header, &self.emissions_column))
            .ok_or_else(|| LayoutError::ColumnMissing {
                question: emissions_question.id.clone(),
                header: self.emissions_column.clone(),
            })?;

        let mut rows = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let title = self
                .row_title(category)
                .ok_or_else(|| LayoutError::UnmappedCategory {
                    version: self.schema_version.clone(),
                    category,
                })?;
            let row = emissions_question
                .rows
                .iter()
                .find(|r| titles_match(&r.title, title))
                .ok_or_else(|| LayoutError::RowMissing {
                    question: emissions_question.id.clone(),
                    category,
                    title: title.to_string(),
                })?;
            rows.push((category, row.id.clone()));
        }

        Ok(Anchors {
            inventory_question_id: inventory_question.id.clone(),
            yes_option: yes_option.clone(),
            emissions_question_id: emissions_question.id.clone(),
            emissions_column_id: column.id.clone(),
            rows,
        })
    }
}

fn titles_match(actual: &str, expected: &str) -> bool {
    actual.trim().eq_ignore_ascii_case(expected.trim())
}
