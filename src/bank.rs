//! YAML question-bank loader.
//!
//! Resolves a test definition plus transitively included category files into
//! a flat [`Test`], assigning each question a stable sequential id. All
//! structural invariants are enforced here, before anything renders:
//! exactly one payload kind per question, non-empty prompt and payload,
//! `select` within the pool size, unique category names, no include cycles.
//!
//! ## File shapes
//!
//! Test definition:
//!
//! ```yaml
//! name: Biology midterm
//! includes:
//!   - shared/plants.yaml
//! categories:
//!   Cells:
//!     select: 2
//!     questions:
//!       - question: Name the cell organelles below.
//!         text:
//!           Powerhouse: mitochondria
//!           Sketch one: { answer: free drawing, lines: 4 }
//!       - question: Which of these is a prokaryote?
//!         options:
//!           - { option: E. coli, correct: true }
//!           - yeast
//!           - amoeba
//! ```
//!
//! Include files carry `categories` (and possibly further `includes`) but no
//! test name.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::variant_engine::models::{
    Category, ChoiceOption, Field, Question, QuestionId, QuestionPayload, Test,
};

// ---------------------------------------------------------------------------
// Raw serde shapes (wire format, pre-validation)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawTest {
    name: String,
    #[serde(default)]
    includes: Vec<String>,
    #[serde(default)]
    categories: IndexMap<String, RawCategory>,
}

#[derive(Debug, Deserialize)]
struct RawIncludeFile {
    #[serde(default)]
    includes: Vec<String>,
    #[serde(default)]
    categories: IndexMap<String, RawCategory>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    select: usize,
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    #[serde(default)]
    text: Option<IndexMap<String, RawField>>,
    #[serde(default)]
    options: Option<Vec<RawOption>>,
}

/// A field is either a bare answer string or `{ answer, lines }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawField {
    Answer(String),
    Detailed {
        answer: String,
        #[serde(default = "default_lines")]
        lines: usize,
    },
}

fn default_lines() -> usize {
    1
}

/// An option is either a bare string (incorrect) or `{ option, correct }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOption {
    Plain(String),
    Flagged {
        option: String,
        #[serde(default)]
        correct: bool,
    },
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a test definition and everything it includes.
pub fn load_test(path: &Path) -> Result<Test> {
    let raw: RawTest = read_yaml(path)?;

    let mut visited = HashSet::new();
    visited.insert(canonical(path)?);

    let mut categories = IndexMap::new();
    let mut next_id: QuestionId = 0;

    merge_categories(raw.categories, path, &mut categories, &mut next_id)?;
    for include in &raw.includes {
        load_include(&sibling(path, include), &mut visited, &mut categories, &mut next_id)?;
    }

    info!(
        test = %raw.name,
        categories = categories.len(),
        questions = next_id,
        "bank loaded"
    );
    Ok(Test {
        name: raw.name,
        categories,
    })
}

fn load_include(
    path: &Path,
    visited: &mut HashSet<PathBuf>,
    categories: &mut IndexMap<String, Category>,
    next_id: &mut QuestionId,
) -> Result<()> {
    if !visited.insert(canonical(path)?) {
        return Err(Error::IncludeCycle {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), "resolving include");

    let raw: RawIncludeFile = read_yaml(path)?;
    merge_categories(raw.categories, path, categories, next_id)?;
    for include in &raw.includes {
        load_include(&sibling(path, include), visited, categories, next_id)?;
    }
    Ok(())
}

fn merge_categories(
    raw: IndexMap<String, RawCategory>,
    path: &Path,
    categories: &mut IndexMap<String, Category>,
    next_id: &mut QuestionId,
) -> Result<()> {
    for (name, raw_category) in raw {
        if categories.contains_key(&name) {
            return Err(Error::DuplicateCategory {
                name,
                path: path.to_path_buf(),
            });
        }

        let mut questions = Vec::with_capacity(raw_category.questions.len());
        for raw_question in raw_category.questions {
            questions.push(convert_question(&name, raw_question, *next_id)?);
            *next_id += 1;
        }

        if raw_category.select > questions.len() {
            return Err(Error::CategoryUnderProvisioned {
                category: name,
                select: raw_category.select,
                available: questions.len(),
            });
        }

        let category = Category {
            name: name.clone(),
            select: raw_category.select,
            questions,
        };
        categories.insert(name, category);
    }
    Ok(())
}

fn convert_question(category: &str, raw: RawQuestion, id: QuestionId) -> Result<Question> {
    let malformed = |prompt: &str, reason: &'static str| Error::MalformedQuestion {
        category: category.to_string(),
        prompt: prompt.to_string(),
        reason,
    };

    let prompt = raw.question.trim().to_string();
    if prompt.is_empty() {
        return Err(malformed(&raw.question, "prompt must not be empty"));
    }

    let payload = match (raw.text, raw.options) {
        (Some(fields), None) => {
            if fields.is_empty() {
                return Err(malformed(&prompt, "`text` must list at least one field"));
            }
            QuestionPayload::Fields(
                fields
                    .into_iter()
                    .map(|(label, field)| match field {
                        RawField::Answer(answer) => Field {
                            label,
                            answer,
                            lines: 1,
                        },
                        RawField::Detailed { answer, lines } => Field {
                            label,
                            answer,
                            lines,
                        },
                    })
                    .collect(),
            )
        }
        (None, Some(options)) => {
            if options.is_empty() {
                return Err(malformed(&prompt, "`options` must list at least one option"));
            }
            QuestionPayload::Options(
                options
                    .into_iter()
                    .map(|option| match option {
                        RawOption::Plain(text) => ChoiceOption {
                            text,
                            correct: false,
                        },
                        RawOption::Flagged { option, correct } => ChoiceOption {
                            text: option,
                            correct,
                        },
                    })
                    .collect(),
            )
        }
        (Some(_), Some(_)) | (None, None) => {
            return Err(malformed(
                &prompt,
                "expected exactly one of `text` or `options`",
            ));
        }
    };

    Ok(Question { id, prompt, payload })
}

// ---------------------------------------------------------------------------
// Filesystem helpers
// ---------------------------------------------------------------------------

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|source| Error::BankIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| Error::BankParse {
        path: path.to_path_buf(),
        source,
    })
}

fn canonical(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|source| Error::BankIo {
        path: path.to_path_buf(),
        source,
    })
}

/// Include references resolve relative to the file that names them.
fn sibling(of: &Path, include: &str) -> PathBuf {
    of.parent().unwrap_or_else(|| Path::new(".")).join(include)
}
