//! Group sequencer: lazy, ordered stream of group labels.
//!
//! Labels enumerate base-26 letter runs of increasing length (A, B, …, Z,
//! AA, AB, …), each decorated with a fixed suffix such as a school-year
//! range. Ordering matters: it is the chain order for overlap avoidance, and
//! because lengths only grow, requesting fewer groups later always yields a
//! prefix of the longer sequence.

use chrono::{Datelike, NaiveDate};

use crate::variant_engine::models::Group;

/// Produces the ordered group sequence for one run.
#[derive(Debug, Clone)]
pub struct GroupSequencer {
    suffix: String,
}

impl GroupSequencer {
    /// Sequencer with an arbitrary display suffix ("" for bare letters).
    pub fn new(suffix: impl Into<String>) -> Self {
        GroupSequencer {
            suffix: suffix.into(),
        }
    }

    /// Sequencer suffixed with the school year containing `today`,
    /// e.g. "2025/2026". The school year turns over in September.
    pub fn for_school_year(today: NaiveDate) -> Self {
        let start = if today.month() >= 9 {
            today.year()
        } else {
            today.year() - 1
        };
        Self::new(format!("{}/{}", start, start + 1))
    }

    /// Infinite lazy sequence of groups, in chain order.
    pub fn iter(&self) -> impl Iterator<Item = Group> + '_ {
        (0..).map(move |index| self.group_at(index))
    }

    /// The first `count` groups of the sequence.
    pub fn take(&self, count: usize) -> Vec<Group> {
        self.iter().take(count).collect()
    }

    fn group_at(&self, index: usize) -> Group {
        let letters = letter_run(index);
        let label = if self.suffix.is_empty() {
            letters
        } else {
            format!("{} {}", letters, self.suffix)
        };
        Group::new(label)
    }
}

/// Bijective base-26 enumeration: 0 => "A", 25 => "Z", 26 => "AA", …
///
/// This is the spreadsheet-column numbering, so run length is monotonic in
/// the index and the sequence is prefix-stable by construction.
fn letter_run(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

/// Make a label usable as a file stem by substituting separator characters.
pub fn file_safe_name(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            '/' | '\\' => '-',
            ' ' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_runs_follow_spreadsheet_order() {
        assert_eq!(letter_run(0), "A");
        assert_eq!(letter_run(25), "Z");
        assert_eq!(letter_run(26), "AA");
        assert_eq!(letter_run(27), "AB");
        assert_eq!(letter_run(26 + 26 * 26 - 1), "ZZ");
        assert_eq!(letter_run(26 + 26 * 26), "AAA");
    }

    #[test]
    fn shorter_request_is_a_prefix_of_longer_request() {
        let seq = GroupSequencer::new("2025/2026");
        let five = seq.take(5);
        let ten = seq.take(10);
        assert_eq!(five[..], ten[..5]);
    }

    #[test]
    fn suffix_is_applied_to_every_label() {
        let seq = GroupSequencer::new("2025/2026");
        for group in seq.take(30) {
            assert!(
                group.label.ends_with(" 2025/2026"),
                "label '{}' missing suffix",
                group.label
            );
        }
    }

    #[test]
    fn school_year_turns_over_in_september() {
        let spring = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let autumn = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        assert_eq!(GroupSequencer::for_school_year(spring).suffix, "2025/2026");
        assert_eq!(GroupSequencer::for_school_year(autumn).suffix, "2026/2027");
    }

    #[test]
    fn file_safe_name_substitutes_separators() {
        assert_eq!(file_safe_name("A 2025/2026"), "A_2025-2026");
        assert_eq!(file_safe_name("plain"), "plain");
    }
}
