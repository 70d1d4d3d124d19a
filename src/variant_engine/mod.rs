//! Core variant engine — deterministic group selection and rendering.
//!
//! ## Module overview
//!
//! | Module      | Purpose |
//! |-------------|---------|
//! | `models`    | All shared types: questions, categories, tests, groups |
//! | `seed`      | Label-to-seed derivation (the reproducibility anchor) |
//! | `groups`    | Prefix-stable base-26 label sequencer with display suffix |
//! | `selection` | Per-category draw with anti-adjacent-overlap backfill |
//! | `render`    | Markdown formatter for blank sheets and answer keys |
//! | `generator` | `generate_run()` — the sequential fold over the groups |

pub mod generator;
pub mod groups;
pub mod models;
pub mod render;
pub mod seed;
pub mod selection;

// Re-export the public API surface so callers can use
// `variant_engine::generate_run` without reaching into sub-modules.
pub use generator::generate_run;
pub use groups::{file_safe_name, GroupSequencer};
pub use models::{
    Category, ChoiceOption, ChosenSet, Field, Group, GroupSheet, GroupVariants, Question,
    QuestionId, QuestionPayload, Test,
};
pub use render::render_group;
pub use selection::select_questions;
