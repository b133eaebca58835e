//! Rename tables for moving or renumbering a sequence.
//!
//! Only the table is built here. Checking for collisions, asking for
//! confirmation and touching the filesystem is up to the caller.

use crate::consts::HASH;
use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::paths::split_extension;
use crate::pattern::{count_patterns, substitute};
use crate::sequence::Sequence;
use serde::Serialize;

/// One entry of a rename table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rename {
    pub source: String,
    pub destination: String,
}

impl Rename {
    /// True when source and destination are the same name.
    pub fn is_noop(&self) -> bool {
        self.source == self.destination
    }
}

/// How a sequence gets renamed.
#[derive(Debug, Clone)]
pub struct RenumberOptions {
    /// Members whose sequence number lies outside this range are left alone.
    pub source_frames: Interval,
    /// Destination name, usually with `#`/`@` patterns.
    pub destination: String,
    /// New sequence numbers, handed out in member order. When `None` the
    /// source numbers are kept.
    pub destination_frames: Option<Interval>,
}

impl RenumberOptions {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            source_frames: Interval::starting_at(0),
            destination: destination.into(),
            destination_frames: None,
        }
    }

    pub fn source_frames(mut self, frames: Interval) -> Self {
        self.source_frames = frames;
        self
    }

    pub fn destination_frames(mut self, frames: Interval) -> Self {
        self.destination_frames = Some(frames);
        self
    }
}

/// Which source numbers end up in the destination name.
#[derive(Debug)]
struct SlotMap {
    destination: String,
    slots: Vec<usize>,
    /// Position of the sequence number within `slots`.
    counter: Option<usize>,
}

fn destination_error(name: &str, reason: String) -> Error {
    Error::Destination {
        name: name.to_owned(),
        reason,
    }
}

fn map_slots(sequence: &Sequence, options: &RenumberOptions, renumber: bool) -> Result<SlotMap> {
    let ranges = sequence.ranges();
    let counter_slot = sequence.sequence_number_index();
    let patterns = count_patterns(&options.destination);
    let total = ranges.len();
    let varying: Vec<usize> = ranges
        .iter()
        .enumerate()
        .filter(|(_, r)| r.cardinality().is_ok_and(|n| n > 1))
        .map(|(slot, _)| slot)
        .collect();
    let mut destination = options.destination.clone();

    let slots = if patterns == 0 {
        match counter_slot {
            Some(slot) if varying.len() == 1 || renumber => {
                if destination.ends_with(|c: char| c.is_ascii_digit()) {
                    tracing::warn!(
                        destination = %options.destination,
                        "destination ends in a number, which will run into the frame number"
                    );
                }
                destination.push(HASH);
                vec![slot]
            }
            _ if !varying.is_empty() => {
                return Err(destination_error(
                    &options.destination,
                    format!(
                        "cannot figure out how to number the files, {} numbers vary",
                        varying.len()
                    ),
                ));
            }
            _ => Vec::new(),
        }
    } else if patterns == total {
        (0..total).collect()
    } else if patterns == varying.len() {
        varying
    } else if patterns == 1 && renumber && counter_slot.is_some() {
        counter_slot.into_iter().collect()
    } else {
        let expected = if total == varying.len() {
            format!("{total} pattern{}", if total == 1 { "" } else { "s" })
        } else {
            format!("{} or {total} patterns", varying.len())
        };
        let excess = if patterns > total {
            "too many"
        } else {
            "too few"
        };
        return Err(destination_error(
            &options.destination,
            format!("{excess} substitution patterns (expected {expected})"),
        ));
    };

    let counter = slots.iter().position(|&s| Some(s) == counter_slot);
    tracing::debug!(%destination, ?slots, ?counter, "mapped source numbers");
    Ok(SlotMap {
        destination,
        slots,
        counter,
    })
}

/// Build the rename table for `sequence`.
///
/// Members are visited in order. When destination frames are given, the
/// table ends as soon as they run out. A destination without the source's
/// extension gets it appended.
pub fn plan_renames(sequence: &Sequence, options: &RenumberOptions) -> Result<Vec<Rename>> {
    let mut frames = options.destination_frames.as_ref().map(Interval::iter);
    plan_renames_with(sequence, options, frames.as_mut())
}

/// Like [`plan_renames`], but new sequence numbers are drawn from `frames`
/// instead of `options.destination_frames`.
///
/// Passing the same iterator for several sequences numbers them one after
/// the other, so their destinations don't collide. With `None` the source
/// numbers are kept.
pub fn plan_renames_with<I>(
    sequence: &Sequence,
    options: &RenumberOptions,
    mut frames: Option<&mut I>,
) -> Result<Vec<Rename>>
where
    I: Iterator<Item = u64>,
{
    let map = map_slots(sequence, options, frames.is_some())?;
    let mut table = Vec::new();

    for member in sequence {
        let numbers = member.numbers();
        let mut values: Vec<u64> = map
            .slots
            .iter()
            .filter_map(|&slot| numbers.get(slot).copied())
            .collect();

        if let Some(counter) = map.counter.and_then(|pos| values.get_mut(pos)) {
            if !options.source_frames.contains(*counter) {
                continue;
            }
            if let Some(frames) = frames.as_mut() {
                match frames.next() {
                    Some(next) => *counter = next,
                    None => break,
                }
            }
        }

        let source = member.to_string();
        let mut destination = substitute(&map.destination, &values)?;
        let extension = split_extension(&source).1;
        if split_extension(&destination).1 != extension {
            destination.push_str(extension);
        }
        table.push(Rename {
            source,
            destination,
        });
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::group_sequences;

    fn frames() -> Sequence {
        group_sequences(["f_0001.exr", "f_0002.exr", "f_0003.exr"], false).remove(0)
    }

    fn destinations(table: &[Rename]) -> Vec<&str> {
        table.iter().map(|r| r.destination.as_str()).collect()
    }

    #[test]
    fn keeps_numbers_by_default() {
        let table = plan_renames(&frames(), &RenumberOptions::new("g_#.exr")).unwrap();
        assert_eq!(destinations(&table), ["g_0001.exr", "g_0002.exr", "g_0003.exr"]);
        assert_eq!(table[0].source, "f_0001.exr");
    }

    #[test]
    fn renumbers_with_destination_frames() {
        let opts = RenumberOptions::new("g_@@@.exr").destination_frames("10-".parse().unwrap());
        let table = plan_renames(&frames(), &opts).unwrap();
        assert_eq!(destinations(&table), ["g_010.exr", "g_011.exr", "g_012.exr"]);
    }

    #[test]
    fn stops_when_destination_frames_run_out() {
        let opts = RenumberOptions::new("g_#.exr").destination_frames("5-6".parse().unwrap());
        let table = plan_renames(&frames(), &opts).unwrap();
        assert_eq!(destinations(&table), ["g_0005.exr", "g_0006.exr"]);
    }

    #[test]
    fn selects_source_frames() {
        let opts = RenumberOptions::new("g_#.exr").source_frames("2-3".parse().unwrap());
        let table = plan_renames(&frames(), &opts).unwrap();
        assert_eq!(destinations(&table), ["g_0002.exr", "g_0003.exr"]);
    }

    #[test]
    fn appends_pattern_and_extension() {
        let table = plan_renames(&frames(), &RenumberOptions::new("shot_")).unwrap();
        assert_eq!(destinations(&table)[0], "shot_0001.exr");
    }

    #[test]
    fn maps_only_varying_numbers() {
        let seq = group_sequences(["s02_v1_0001.exr", "s02_v1_0002.exr"], false).remove(0);
        let table = plan_renames(&seq, &RenumberOptions::new("out_@@.exr")).unwrap();
        assert_eq!(destinations(&table), ["out_01.exr", "out_02.exr"]);

        let table = plan_renames(&seq, &RenumberOptions::new("s@_v@_#.exr")).unwrap();
        assert_eq!(destinations(&table), ["s2_v1_0001.exr", "s2_v1_0002.exr"]);
    }

    #[test]
    fn noop_when_names_dont_change() {
        let table = plan_renames(&frames(), &RenumberOptions::new("f_#.exr")).unwrap();
        assert!(table.iter().all(Rename::is_noop));
    }

    #[test]
    fn rejects_unmappable_destinations() {
        let err = plan_renames(&frames(), &RenumberOptions::new("g_#_#.exr")).unwrap_err();
        assert!(matches!(err, Error::Destination { .. }));
        assert!(err.to_string().contains("too many"));

        let seq = group_sequences(["a1_1", "a1_2", "a2_1", "a2_2"], false).remove(0);
        let err = plan_renames(&seq, &RenumberOptions::new("b")).unwrap_err();
        assert!(err.to_string().contains("2 numbers vary"));

        let seq = group_sequences(["a1_1_1", "a1_2_2", "a2_1_3"], false).remove(0);
        let err = plan_renames(&seq, &RenumberOptions::new("b#")).unwrap_err();
        assert!(err.to_string().contains("too few"));
    }

    #[test]
    fn shared_frames_continue_across_sequences() {
        let sequences = group_sequences(
            ["a/f_0001", "a/f_0002", "b/f_0001", "b/f_0002"],
            true,
        );
        assert_eq!(sequences.len(), 2);

        let opts = RenumberOptions::new("out_#.exr");
        let frames: Interval = "1-".parse().unwrap();
        let mut frames = frames.iter();
        let mut all = Vec::new();
        for sequence in &sequences {
            all.extend(plan_renames_with(sequence, &opts, Some(&mut frames)).unwrap());
        }
        assert_eq!(
            destinations(&all),
            ["out_0001.exr", "out_0002.exr", "out_0003.exr", "out_0004.exr"]
        );
        assert_eq!(all[2].source, "b/f_0001");
    }

    #[test]
    fn single_pattern_renumbers_the_counter() {
        let seq = group_sequences(["a1_0001", "a1_0002", "a2_0001"], false).remove(0);
        let opts = RenumberOptions::new("b_#").destination_frames("100-".parse().unwrap());
        let table = plan_renames(&seq, &opts).unwrap();
        assert_eq!(destinations(&table), ["b_0100", "b_0101", "b_0102"]);
    }
}
