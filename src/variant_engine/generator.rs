//! Run generator: the sequential chain over the group sequence.
//!
//! Group N's selection depends on group N-1's chosen-id set, so this is a
//! strict left-fold in sequencer order — a hard sequential barrier. Only the
//! external document compilation downstream is parallel.

use tracing::info;

use crate::error::Result;
use crate::variant_engine::groups::GroupSequencer;
use crate::variant_engine::models::{ChosenSet, GroupVariants, Test};
use crate::variant_engine::render::render_group;

/// Render both variants of the first `count` groups.
///
/// Each step consumes the prior step's chosen-set and hands its own forward;
/// the chain resets only here, at the start of a run.
pub fn generate_run(
    test: &Test,
    sequencer: &GroupSequencer,
    count: usize,
) -> Result<Vec<GroupVariants>> {
    let mut run = Vec::with_capacity(count);
    let mut previous = ChosenSet::new();

    for group in sequencer.iter().take(count) {
        let assignment = render_group(test, &group, &previous, false)?;
        let answer_key = render_group(test, &group, &previous, true)?;
        debug_assert_eq!(
            assignment.chosen, answer_key.chosen,
            "variants of one group must select identically"
        );

        info!(
            label = %group.label,
            questions = assignment.chosen.len(),
            "rendered group"
        );

        previous = assignment.chosen.clone();
        run.push(GroupVariants {
            group,
            assignment: assignment.markdown,
            answer_key: answer_key.markdown,
            chosen: assignment.chosen,
        });
    }

    Ok(run)
}
