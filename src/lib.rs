//! # exam_sheet_gen
//!
//! A deterministic generator of randomized written-test variants.
//!
//! Given a YAML bank of categorized questions, this crate produces N
//! "groups" — labeled variants of the same test with different question
//! selections — plus a matching answer key per group, and compiles
//! everything into two merged PDFs (assignments and answer key) via an
//! external document toolchain.
//!
//! ## How it works
//!
//! 1. [`bank::load_test`] flattens the test definition and its includes into
//!    a [`Test`], giving every question a stable integer id.
//! 2. [`GroupSequencer`] enumerates group labels (A, B, …, Z, AA, …) with a
//!    school-year suffix; each label deterministically derives its RNG seed.
//! 3. [`generate_run`] folds over the groups in order: each group draws
//!    `select` questions per category, biased away from the previous
//!    group's picks, and renders both the blank sheet and the answer key
//!    from the same generator stream — so adjacent students get different
//!    questions, and a label alone reproduces a sheet bit-for-bit.
//! 4. [`pipeline::compile_run`] runs one compiler process per group/variant
//!    under a concurrency bound and merges the PDFs in generation order.
//!
//! ## Key properties
//!
//! - **Deterministic**: the group label is the seed. Two runs on two
//!   machines produce byte-identical markdown for the same label.
//! - **Anti-adjacent-overlap**: consecutive groups share zero questions per
//!   category whenever the pool allows it, and only the forced minimum when
//!   it does not.
//! - **Variant agreement**: a group's blank sheet and answer key always
//!   contain the same questions in the same order with the same option
//!   shuffle; only the answer markup differs.
//!
//! ## Quick start
//!
//! ```rust
//! use exam_sheet_gen::{
//!     generate_run, Category, ChoiceOption, GroupSequencer, Question, QuestionPayload, Test,
//! };
//! use indexmap::IndexMap;
//!
//! let question = |id, prompt: &str| Question {
//!     id,
//!     prompt: prompt.to_string(),
//!     payload: QuestionPayload::Options(vec![
//!         ChoiceOption { text: "yes".into(), correct: true },
//!         ChoiceOption { text: "no".into(), correct: false },
//!     ]),
//! };
//! let mut categories = IndexMap::new();
//! categories.insert("Basics".to_string(), Category {
//!     name: "Basics".to_string(),
//!     select: 1,
//!     questions: vec![question(0, "Is water wet?"), question(1, "Is fire hot?")],
//! });
//! let test = Test { name: "Sample".to_string(), categories };
//!
//! let sequencer = GroupSequencer::new("2025/2026");
//! let run = generate_run(&test, &sequencer, 2).unwrap();
//!
//! assert_eq!(run[0].group.label, "A 2025/2026");
//! // Group B avoids group A's question: with two questions and select 1,
//! // the second group is forced onto the other one.
//! assert_ne!(run[0].chosen, run[1].chosen);
//! ```

pub mod bank;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod variant_engine;

// Convenience re-exports so callers can use `exam_sheet_gen::generate_run`
// directly without reaching into `variant_engine::`.
pub use config::RunConfig;
pub use error::{Error, Result};
pub use pipeline::{compile_run, RunOutputs};
pub use variant_engine::{
    file_safe_name, generate_run, render_group, select_questions, Category, ChoiceOption,
    ChosenSet, Field, Group, GroupSequencer, GroupSheet, GroupVariants, Question, QuestionId,
    QuestionPayload, Test,
};
