use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::variant_engine::seed;

// ---------------------------------------------------------------------------
// Question primitives
// ---------------------------------------------------------------------------

/// Stable integer identity of a question, assigned once at load time and
/// unique across the whole flattened bank.
pub type QuestionId = u32;

/// One fill-in-the-blank field: a label, its canonical answer, and how many
/// blank lines to print on the assignment sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub label: String,
    pub answer: String,
    pub lines: usize,
}

/// One selectable option of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub text: String,
    pub correct: bool,
}

/// The payload of a question is exactly one of the two kinds; a third or
/// mixed kind is unrepresentable once a bank has loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionPayload {
    /// Ordered fill-in-the-blank fields. Field order is as authored and is
    /// never shuffled.
    Fields(Vec<Field>),
    /// Selectable options. Their order is shuffled per group at render time.
    Options(Vec<ChoiceOption>),
}

impl QuestionPayload {
    pub fn is_empty(&self) -> bool {
        match self {
            QuestionPayload::Fields(fields) => fields.is_empty(),
            QuestionPayload::Options(options) => options.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub payload: QuestionPayload,
}

// ---------------------------------------------------------------------------
// Bank structure
// ---------------------------------------------------------------------------

/// A named pool of questions from which `select` are drawn per group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub select: usize,
    pub questions: Vec<Question>,
}

/// A whole test: display name plus categories in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    pub name: String,
    /// Insertion order is display order, hence the ordered map.
    pub categories: IndexMap<String, Category>,
}

// ---------------------------------------------------------------------------
// Group-level types
// ---------------------------------------------------------------------------

/// One labeled variant of the test, e.g. for one classroom of students.
///
/// The seed is derived from the label, so a label alone reproduces the whole
/// rendered document on any machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub label: String,
    pub seed: u64,
}

impl Group {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let seed = seed::derive(&label);
        Group { label, seed }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Question identities chosen for one group across all categories. Group N's
/// set biases group N+1's selection away from repeats.
pub type ChosenSet = HashSet<QuestionId>;

/// One rendered variant (blank or answer key) of one group.
#[derive(Debug, Clone)]
pub struct GroupSheet {
    pub label: String,
    pub chosen: ChosenSet,
    pub markdown: String,
}

/// Both renderings of one group, produced together by the run generator.
#[derive(Debug, Clone)]
pub struct GroupVariants {
    pub group: Group,
    /// Markdown with answers hidden.
    pub assignment: String,
    /// Markdown with answers revealed. Same questions, same option order.
    pub answer_key: String,
    pub chosen: ChosenSet,
}
