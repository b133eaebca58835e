use crate::compact::compact;
use crate::consts::{AT, HASH, HASH_WIDTH, STAR};
use crate::error::Result;
use crate::interval::Interval;
use crate::paths::split_dir;
use crate::template::TemplateString;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Names that belong to one sequence, in sorted order.
///
/// All members share the text runs of the first one; only their numbers
/// differ. Members are appended unconditionally, so it's up to the caller
/// (usually [`SequenceGrouper`]) to only add names that fit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    names: Vec<TemplateString>,
}

/// Display form of a sequence: a placeholder name and one range per varying
/// number, e.g. `render_#.exr` and `["1-24"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SequenceName {
    pub template: String,
    pub ranges: Vec<String>,
}

impl fmt::Display for SequenceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ranges.is_empty() {
            f.write_str(&self.template)
        } else {
            write!(f, "{} ({})", self.template, self.ranges.join("; "))
        }
    }
}

/// Serializable overview of a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceSummary {
    #[serde(flatten)]
    pub name: SequenceName,
    pub count: usize,
}

/// What a single number slot looks like across all members.
#[derive(Debug, Clone)]
struct SlotStats {
    values: BTreeSet<u64>,
    min_width: usize,
    max_width: usize,
    padded: bool,
    /// The slot as written in the first member.
    literal: String,
}

impl SlotStats {
    fn placeholder(&self) -> String {
        if !self.padded {
            AT.to_string()
        } else if self.min_width != self.max_width {
            STAR.to_string()
        } else if self.min_width == HASH_WIDTH {
            HASH.to_string()
        } else {
            AT.to_string().repeat(self.min_width)
        }
    }
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<TemplateString>) {
        self.names.push(name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TemplateString> {
        self.names.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TemplateString> {
        self.names.iter()
    }

    pub fn names(&self) -> &[TemplateString] {
        &self.names
    }

    /// The first member, which defines the sequence's text runs.
    pub fn template(&self) -> Option<&TemplateString> {
        self.names.first()
    }

    /// Check if `name` fits this sequence. An empty sequence accepts anything.
    pub fn matches(&self, name: &TemplateString, varying: Option<isize>) -> bool {
        self.template().is_none_or(|t| t.matches_template(name, varying))
    }

    fn slot_stats(&self) -> Vec<SlotStats> {
        let Some(first) = self.template() else {
            return Vec::new();
        };
        let mut stats: Vec<SlotStats> = first
            .tokens()
            .map(|t| SlotStats {
                values: BTreeSet::new(),
                min_width: t.width(),
                max_width: t.width(),
                padded: false,
                literal: t.to_string(),
            })
            .collect();

        for name in &self.names {
            for (slot, token) in stats.iter_mut().zip(name.tokens()) {
                slot.values.insert(token.value());
                slot.min_width = slot.min_width.min(token.width());
                slot.max_width = slot.max_width.max(token.width());
                slot.padded |= token.is_padded();
            }
        }
        stats
    }

    /// One range per number slot, in slot order.
    pub fn ranges(&self) -> Vec<Interval> {
        self.slot_stats()
            .into_iter()
            .map(|s| compact(s.values))
            .collect()
    }

    /// Index of the number that takes the most distinct values, i.e. the
    /// frame counter. Ties go to the later slot. `None` without numbers.
    pub fn sequence_number_index(&self) -> Option<usize> {
        self.slot_stats()
            .iter()
            .enumerate()
            .max_by_key(|(_, s)| s.values.len())
            .map(|(slot, _)| slot)
    }

    /// Placeholder name plus the ranges of the varying numbers.
    ///
    /// Varying numbers become `#` (4-digit padding), a run of `@` (that many
    /// digits, a single `@` for unpadded numbers) or `*` (inconsistent
    /// padding). A number with only one value across the sequence is kept as
    /// written and gets no range.
    ///
    /// Only a sequence with a single varying number can be rebuilt from this.
    pub fn sequence_name(&self) -> SequenceName {
        let Some(first) = self.template() else {
            return SequenceName::default();
        };
        let stats = self.slot_stats();

        let mut template = String::new();
        let mut ranges = Vec::new();
        for (slot, text) in first.texts().enumerate() {
            template.push_str(text);
            let Some(stat) = stats.get(slot) else {
                continue;
            };
            if stat.values.len() == 1 {
                template.push_str(&stat.literal);
            } else {
                template.push_str(&stat.placeholder());
                ranges.push(compact(stat.values.iter().copied()).to_string());
            }
        }
        SequenceName { template, ranges }
    }

    pub fn summary(&self) -> SequenceSummary {
        SequenceSummary {
            name: self.sequence_name(),
            count: self.len(),
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sequence_name())
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a TemplateString;
    type IntoIter = std::slice::Iter<'a, TemplateString>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

/// Splits a flat list of names into sequences.
///
/// ```
/// use frameseq::SequenceGrouper;
///
/// let groups = SequenceGrouper::new().group(["a2.png", "b1.png", "a1.png"]);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].to_string(), "a@.png (1-2)");
/// assert_eq!(groups[1].to_string(), "b1.png");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceGrouper {
    assume_file_paths: bool,
    varying_slot: Option<isize>,
}

impl SequenceGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat names as file paths: numbers in the directory part are frozen
    /// into text and every directory gets its own sequences.
    pub fn assume_file_paths(mut self, yes: bool) -> Self {
        self.assume_file_paths = yes;
        self
    }

    /// Only let this number slot vary within a sequence (negative counts from
    /// the end). By default every number may vary.
    pub fn varying_slot(mut self, slot: Option<isize>) -> Self {
        self.varying_slot = slot;
        self
    }

    /// Parse `name` and pair it with its directory. With file paths the
    /// directory's numbers are frozen into text; otherwise the directory key
    /// is empty.
    fn prepare(&self, name: &str) -> (TemplateString, TemplateString) {
        let mut parsed = TemplateString::parse(name);
        if !self.assume_file_paths {
            return (TemplateString::default(), parsed);
        }
        let dir = TemplateString::parse(split_dir(name).0);
        if let Err(e) = freeze_leading_numbers(&mut parsed, dir.number_count()) {
            tracing::warn!(name, error = %e, "could not freeze directory numbers");
        }
        (dir, parsed)
    }

    pub fn group<I, S>(&self, names: I) -> Vec<Sequence>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // Keyed by directory first, so numbered directories that differ only
        // in padding (`s1/`, `s01/`) don't interleave.
        let mut entries: Vec<(TemplateString, TemplateString)> = names
            .into_iter()
            .map(|n| self.prepare(n.as_ref()))
            .collect();
        entries.sort();

        let mut sequences = Vec::new();
        let mut current = Sequence::new();
        let mut current_dir: Option<TemplateString> = None;

        for (dir, name) in entries {
            let mut split = false;

            if self.assume_file_paths {
                if current_dir.as_ref().is_some_and(|d| *d != dir) {
                    split = true;
                }
                current_dir = Some(dir);
            }

            if !current.matches(&name, self.varying_slot) {
                split = true;
            }

            if split && !current.is_empty() {
                tracing::debug!(sequence = %current, members = current.len(), "closing sequence");
                sequences.push(std::mem::take(&mut current));
            }
            tracing::trace!(%name, "adding name");
            current.append(name);
        }

        if !current.is_empty() {
            tracing::debug!(sequence = %current, members = current.len(), "closing sequence");
            sequences.push(current);
        }
        sequences
    }
}

/// Turn the first `count` numbers of `name` into plain text.
fn freeze_leading_numbers(name: &mut TemplateString, count: usize) -> Result<()> {
    for _ in 0..count {
        let digits = name.number_str(0)?;
        name.replace_number(0, &digits)?;
    }
    Ok(())
}

/// Group `names` into sequences. See [`SequenceGrouper`].
pub fn group_sequences<I, S>(names: I, assume_file_paths: bool) -> Vec<Sequence>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    SequenceGrouper::new()
        .assume_file_paths(assume_file_paths)
        .group(names)
}
