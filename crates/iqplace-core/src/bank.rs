//! Question bank: the built-in catalog plus a TOML loader and validator.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::BankError;
use crate::model::{Difficulty, Question};

/// TOML source of the built-in bank.
pub const DEFAULT_BANK_TOML: &str = include_str!("../data/default_bank.toml");

/// A named group of questions testing one cognitive skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub questions: Vec<Question>,
}

/// Read-only catalog of questions grouped by category.
///
/// Category order is preserved from the source so seeded quiz generation
/// is reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    categories: Vec<Category>,
}

impl QuestionBank {
    /// Build a bank from categories, rejecting duplicate names, repeated
    /// prompts within a category and questions whose correct index is out
    /// of range.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        categories: Vec<Category>,
    ) -> Result<Self, BankError> {
        let mut names = HashSet::new();
        for category in &categories {
            if !names.insert(category.name.as_str()) {
                return Err(BankError::DuplicateCategory(category.name.clone()));
            }
            let mut prompts = HashSet::new();
            for (index, q) in category.questions.iter().enumerate() {
                if !prompts.insert(q.prompt.trim()) {
                    return Err(BankError::DuplicateQuestion {
                        category: category.name.clone(),
                        index,
                        prompt: q.prompt.clone(),
                    });
                }
                if q.options.is_empty() {
                    return Err(BankError::NoOptions {
                        category: category.name.clone(),
                        index,
                    });
                }
                if q.correct >= q.options.len() {
                    return Err(BankError::InvalidCorrectIndex {
                        category: category.name.clone(),
                        index,
                        correct: q.correct,
                        option_count: q.options.len(),
                    });
                }
            }
        }

        Ok(Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            categories,
        })
    }

    /// The built-in five-category bank.
    pub fn builtin() -> Result<Self, BankError> {
        parse_bank_str(DEFAULT_BANK_TOML, "<builtin>")
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn question_count(&self) -> usize {
        self.categories.iter().map(|c| c.questions.len()).sum()
    }
}

#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    categories: Vec<TomlCategory>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlCategory {
    name: String,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    prompt: String,
    options: Vec<String>,
    correct: usize,
    #[serde(default = "default_difficulty")]
    difficulty: String,
}

fn default_difficulty() -> String {
    "medium".to_string()
}

/// Read and parse a bank file.
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    let bank = parse_bank_str(&content, &path.display().to_string())?;
    Ok(bank)
}

/// Parse a TOML string into a bank. `source_name` is used in error messages.
pub fn parse_bank_str(content: &str, source_name: &str) -> Result<QuestionBank, BankError> {
    let parsed: TomlBankFile = toml::from_str(content).map_err(|e| BankError::Parse {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })?;

    let categories = parsed
        .categories
        .into_iter()
        .map(|c| {
            let questions = c
                .questions
                .into_iter()
                .map(|q| {
                    let difficulty: Difficulty = q
                        .difficulty
                        .parse()
                        .map_err(|_| BankError::UnknownDifficulty(q.difficulty.clone()))?;
                    Ok(Question {
                        prompt: q.prompt,
                        options: q.options,
                        correct: q.correct,
                        difficulty,
                    })
                })
                .collect::<Result<Vec<_>, BankError>>()?;
            Ok(Category {
                name: c.name,
                questions,
            })
        })
        .collect::<Result<Vec<_>, BankError>>()?;

    let mut bank = QuestionBank::new(parsed.bank.id, parsed.bank.name, categories)?;
    bank.description = parsed.bank.description;
    tracing::debug!(
        "loaded bank '{}' from {}: {} categories, {} questions",
        bank.id,
        source_name,
        bank.categories.len(),
        bank.question_count()
    );
    Ok(bank)
}

/// A soft issue found while validating a bank.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The category, if the warning is specific to one.
    pub category: Option<String>,
    pub message: String,
}

/// Check a bank for issues that do not prevent loading but will affect quizzes.
pub fn validate_bank(bank: &QuestionBank, per_category: usize) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.categories.is_empty() {
        warnings.push(ValidationWarning {
            category: None,
            message: "bank has no categories".into(),
        });
    }

    // Categories too small for the configured draw
    for category in &bank.categories {
        if category.questions.len() < per_category {
            warnings.push(ValidationWarning {
                category: Some(category.name.clone()),
                message: format!(
                    "only {} question(s), but {} are drawn per quiz",
                    category.questions.len(),
                    per_category
                ),
            });
        }
    }

    // Option arity should be uniform across the bank
    let arity = bank
        .categories
        .iter()
        .flat_map(|c| c.questions.first())
        .map(|q| q.options.len())
        .next();
    if let Some(arity) = arity {
        for category in &bank.categories {
            for q in &category.questions {
                if q.options.len() != arity {
                    warnings.push(ValidationWarning {
                        category: Some(category.name.clone()),
                        message: format!(
                            "'{}' has {} options, expected {}",
                            q.prompt,
                            q.options.len(),
                            arity
                        ),
                    });
                }
            }
        }
    }

    let mut seen_prompts = HashSet::new();
    for category in &bank.categories {
        for q in &category.questions {
            if q.prompt.trim().is_empty() {
                warnings.push(ValidationWarning {
                    category: Some(category.name.clone()),
                    message: "prompt is empty".into(),
                });
            } else if !seen_prompts.insert(q.prompt.trim()) {
                warnings.push(ValidationWarning {
                    category: Some(category.name.clone()),
                    message: format!("duplicate prompt: {}", q.prompt),
                });
            }

            let mut seen_options = HashSet::new();
            if q.options.iter().any(|o| !seen_options.insert(o.trim())) {
                warnings.push(ValidationWarning {
                    category: Some(category.name.clone()),
                    message: format!("'{}' has duplicated option text", q.prompt),
                });
            }
        }
    }

    warnings
}
