//! Skill submission intake.
//!
//! Submissions are validated field by field and every failure is reported at
//! once. Nothing is stored: `ValidatingIntake` accepts or rejects and logs,
//! and persistence belongs to whatever implements `SubmissionIntake` later.

use crate::catalog::CatalogIndex;
use crate::messages::{Messages, category_message_key};
use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Form fields of a proposed skill.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillCandidate {
    pub name: String,
    pub description: String,
    pub category: String,
    pub github_url: String,
    pub author: String,
}

/// Form field a validation error belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Description,
    Category,
    GithubUrl,
    Author,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("name is required")]
    NameRequired,
    #[error("description is required")]
    DescriptionRequired,
    #[error("category is required")]
    CategoryRequired,
    #[error("unknown category '{0}'")]
    CategoryUnknown(String),
    #[error("GitHub URL is required")]
    GithubRequired,
    #[error("'{0}' is not a GitHub URL")]
    GithubInvalid(String),
    #[error("author is required")]
    AuthorRequired,
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            FieldError::NameRequired => Field::Name,
            FieldError::DescriptionRequired => Field::Description,
            FieldError::CategoryRequired | FieldError::CategoryUnknown(_) => Field::Category,
            FieldError::GithubRequired | FieldError::GithubInvalid(_) => Field::GithubUrl,
            FieldError::AuthorRequired => Field::Author,
        }
    }

    /// Key of the localized message in the `submit` namespace.
    pub fn message_key(&self) -> &'static str {
        match self {
            FieldError::NameRequired => "errors.nameRequired",
            FieldError::DescriptionRequired => "errors.descriptionRequired",
            FieldError::CategoryRequired => "errors.categoryRequired",
            FieldError::CategoryUnknown(_) => "errors.categoryUnknown",
            FieldError::GithubRequired => "errors.githubRequired",
            FieldError::GithubInvalid(_) => "errors.githubInvalid",
            FieldError::AuthorRequired => "errors.authorRequired",
        }
    }
}

/// Every field error of one submission, in form order.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("submission has {} invalid field(s)", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

/// A field error rendered for one locale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LocalizedFieldError {
    pub field: Field,
    pub message: String,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn localized(&self, messages: &Messages, locale: Locale) -> Vec<LocalizedFieldError> {
        self.0
            .iter()
            .map(|err| LocalizedFieldError {
                field: err.field(),
                message: messages.text(locale, "submit", err.message_key()),
            })
            .collect()
    }
}

/// Confirmation summary shown after a successful submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Accepted {
    pub name: String,
    pub author: String,
    pub category: String,
    /// Message key for the category label (`category.<key>`).
    pub category_key: String,
}

/// Validate a candidate against the catalog's categories.
pub fn validate_candidate(
    catalog: &CatalogIndex,
    candidate: &SkillCandidate,
) -> Result<Accepted, ValidationErrors> {
    let mut errors = Vec::new();

    if candidate.name.trim().is_empty() {
        errors.push(FieldError::NameRequired);
    }
    if candidate.description.trim().is_empty() {
        errors.push(FieldError::DescriptionRequired);
    }
    let category = candidate.category.trim();
    if category.is_empty() {
        errors.push(FieldError::CategoryRequired);
    } else if catalog.category_by_slug(category).is_none() {
        errors.push(FieldError::CategoryUnknown(category.to_string()));
    }
    let github_url = candidate.github_url.trim();
    if github_url.is_empty() {
        errors.push(FieldError::GithubRequired);
    } else if !github_url.contains("github.com") {
        errors.push(FieldError::GithubInvalid(github_url.to_string()));
    }
    if candidate.author.trim().is_empty() {
        errors.push(FieldError::AuthorRequired);
    }

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    Ok(Accepted {
        name: candidate.name.trim().to_string(),
        author: candidate.author.trim().to_string(),
        category: category.to_string(),
        category_key: category_message_key(category).to_string(),
    })
}

/// Receives submissions from the site.
pub trait SubmissionIntake {
    fn submit(&self, candidate: &SkillCandidate) -> Result<Accepted, ValidationErrors>;
}

/// Intake that validates and logs but never stores.
pub struct ValidatingIntake<'a> {
    catalog: &'a CatalogIndex,
}

impl<'a> ValidatingIntake<'a> {
    pub fn new(catalog: &'a CatalogIndex) -> Self {
        Self { catalog }
    }
}

impl SubmissionIntake for ValidatingIntake<'_> {
    fn submit(&self, candidate: &SkillCandidate) -> Result<Accepted, ValidationErrors> {
        match validate_candidate(self.catalog, candidate) {
            Ok(accepted) => {
                tracing::info!(
                    name = %accepted.name,
                    author = %accepted.author,
                    category = %accepted.category,
                    "skill submission accepted (not persisted)"
                );
                Ok(accepted)
            }
            Err(errors) => {
                tracing::debug!(%errors, "skill submission rejected");
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> SkillCandidate {
        SkillCandidate {
            name: "Home Lights".to_string(),
            description: "Turn lights on and off".to_string(),
            category: "smart-home".to_string(),
            github_url: "https://github.com/example/home-lights".to_string(),
            author: "example".to_string(),
        }
    }

    #[test]
    fn accepts_valid_candidate() {
        let catalog = CatalogIndex::builtin().unwrap();
        let accepted = ValidatingIntake::new(&catalog)
            .submit(&candidate())
            .expect("valid candidate");
        assert_eq!(accepted.category_key, "smartHome");
        assert_eq!(accepted.name, "Home Lights");
    }

    #[test]
    fn reports_every_missing_field() {
        let catalog = CatalogIndex::builtin().unwrap();
        let err = validate_candidate(&catalog, &SkillCandidate::default()).unwrap_err();
        assert_eq!(
            err.errors(),
            &[
                FieldError::NameRequired,
                FieldError::DescriptionRequired,
                FieldError::CategoryRequired,
                FieldError::GithubRequired,
                FieldError::AuthorRequired,
            ]
        );
        assert_eq!(err.to_string(), "submission has 5 invalid field(s)");
    }

    #[test]
    fn rejects_non_github_urls_and_unknown_categories() {
        let catalog = CatalogIndex::builtin().unwrap();
        let mut bad = candidate();
        bad.github_url = "https://gitlab.com/example/x".to_string();
        bad.category = "no-such-category".to_string();
        let err = validate_candidate(&catalog, &bad).unwrap_err();
        let fields: Vec<Field> = err.errors().iter().map(FieldError::field).collect();
        assert_eq!(fields, [Field::Category, Field::GithubUrl]);
    }

    #[test]
    fn localizes_field_messages() {
        let catalog = CatalogIndex::builtin().unwrap();
        let messages = Messages::builtin().unwrap();
        let mut bad = candidate();
        bad.name = "   ".to_string();
        let err = validate_candidate(&catalog, &bad).unwrap_err();
        let localized = err.localized(&messages, Locale::Zh);
        assert_eq!(
            localized,
            [LocalizedFieldError {
                field: Field::Name,
                message: "请填写名称".to_string(),
            }]
        );
    }
}
