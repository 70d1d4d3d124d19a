//! Rendering formatter: one group in, one markdown document out.
//!
//! `render_group` is a pure function of (test, group, previous chosen-set,
//! reveal flag). Both variants of a group re-derive the generator from the
//! group seed and replay the identical operation script — every selection
//! draw for every category first, then one option shuffle per chosen
//! question in draw order — so the blank sheet and the answer key agree on
//! questions and option order byte-for-byte, differing only in markup.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::variant_engine::models::{
    ChoiceOption, ChosenSet, Field, Group, GroupSheet, Question, QuestionPayload, Test,
};
use crate::variant_engine::selection::select_questions;

/// Width of the name blank on the sheet header.
const NAME_BLANK: usize = 40;
/// Width of the date blank on the sheet header.
const DATE_BLANK: usize = 20;
/// Fill-in lines are padded so label + blank reach this column.
const FIELD_LINE_WIDTH: usize = 76;
/// Gap printed between options of a multiple-choice question.
const OPTION_GUTTER: &str = "          ";

/// Render one variant of one group.
///
/// `reveal = false` produces the assignment sheet (blanks, anonymous
/// options); `reveal = true` produces the answer key (answers emphasized).
pub fn render_group(
    test: &Test,
    group: &Group,
    previous: &ChosenSet,
    reveal: bool,
) -> Result<GroupSheet> {
    let mut rng = StdRng::seed_from_u64(group.seed);

    // Phase 1: selection draws for every category, in display order.
    let mut chosen = ChosenSet::new();
    let mut drawn: Vec<(&str, Vec<&Question>)> = Vec::with_capacity(test.categories.len());
    for category in test.categories.values() {
        let picks = select_questions(&mut rng, category, previous)?;
        chosen.extend(picks.iter().map(|q| q.id));
        drawn.push((category.name.as_str(), picks));
    }

    // Phase 2: formatting. Option shuffles are the only generator use here
    // and happen once per chosen question, in draw order.
    let mut out = String::new();
    out.push_str(&format!("# Test: {}\n\n", test.name));
    out.push_str(&format!("**Group**: {}\n\n", group.label));
    out.push_str(&format!(
        "**Name**: {} **Date**: {}\n\n",
        blank_run(NAME_BLANK),
        blank_run(DATE_BLANK)
    ));

    // Display numbering only; identity lives in QuestionId.
    let mut number = 0usize;
    for (category_name, picks) in &drawn {
        out.push_str(&format!("### {category_name}\n\n"));
        for &question in picks {
            number += 1;
            out.push_str(&format_question(&mut rng, question, number, reveal));
            out.push('\n');
        }
        out.push('\n');
    }

    Ok(GroupSheet {
        label: group.label.clone(),
        chosen,
        markdown: out,
    })
}

fn format_question<R: Rng>(rng: &mut R, question: &Question, number: usize, reveal: bool) -> String {
    let mut out = format!("**{number}. {}**\n\n", question.prompt);
    match &question.payload {
        QuestionPayload::Fields(fields) => {
            for field in fields {
                out.push_str(&format_field(field, reveal));
            }
        }
        QuestionPayload::Options(options) => {
            let mut shuffled: Vec<&ChoiceOption> = options.iter().collect();
            shuffle(rng, &mut shuffled);
            out.push_str(&format_options(&shuffled, reveal));
        }
    }
    out
}

fn format_field(field: &Field, reveal: bool) -> String {
    if reveal {
        return format!("{}: **{}**\n\n", field.label, field.answer);
    }
    let line = format!(
        "{}: {}\n\n",
        field.label,
        blank_run(FIELD_LINE_WIDTH.saturating_sub(field.label.len()))
    );
    line.repeat(field.lines.max(1))
}

/// All options of a question go on a single line. On the blank sheet every
/// option is parenthesized; on the key, correct ones are emphasized instead.
fn format_options(options: &[&ChoiceOption], reveal: bool) -> String {
    let rendered: Vec<String> = options
        .iter()
        .map(|option| {
            if reveal && option.correct {
                format!("**{}**", option.text)
            } else {
                format!("({})", option.text)
            }
        })
        .collect();
    format!("{}\n", rendered.join(OPTION_GUTTER))
}

/// An escaped-underscore run of the given width.
fn blank_run(width: usize) -> String {
    "\\_".repeat(width)
}

/// Fisher-Yates shuffle, one `gen_range` per position.
fn shuffle<T, R: Rng>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn shuffle_is_deterministic_per_seed() {
        let arrange = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut items: Vec<u32> = (0..10).collect();
            shuffle(&mut rng, &mut items);
            items
        };
        assert_eq!(arrange(5), arrange(5));
        assert_ne!(arrange(5), arrange(6));
    }

    #[test]
    fn blank_run_escapes_every_underscore() {
        assert_eq!(blank_run(3), "\\_\\_\\_");
        assert_eq!(blank_run(0), "");
    }

    #[test]
    fn field_blank_is_padded_to_the_line_width() {
        let field = Field {
            label: "Capital".to_string(),
            answer: "Prague".to_string(),
            lines: 1,
        };
        let blank = format_field(&field, false);
        assert!(blank.starts_with("Capital: "));
        assert_eq!(blank.matches("\\_").count(), FIELD_LINE_WIDTH - "Capital".len());

        let revealed = format_field(&field, true);
        assert_eq!(revealed, "Capital: **Prague**\n\n");
    }

    #[test]
    fn multi_line_fields_repeat_the_blank_but_not_the_answer() {
        let field = Field {
            label: "Essay".to_string(),
            answer: "free text".to_string(),
            lines: 3,
        };
        assert_eq!(format_field(&field, false).matches("Essay:").count(), 3);
        assert_eq!(format_field(&field, true).matches("Essay:").count(), 1);
    }

    #[test]
    fn options_reveal_only_marks_correct_ones() {
        let right = ChoiceOption {
            text: "right".to_string(),
            correct: true,
        };
        let wrong = ChoiceOption {
            text: "wrong".to_string(),
            correct: false,
        };
        let options = vec![&right, &wrong];
        assert_eq!(
            format_options(&options, false),
            "(right)          (wrong)\n"
        );
        assert_eq!(
            format_options(&options, true),
            "**right**          (wrong)\n"
        );
    }
}
