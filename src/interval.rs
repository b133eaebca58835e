use crate::error::{Error, Result};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

/// One `begin-end x step` piece of an [`Interval`].
///
/// `end` is `None` for an unbounded piece. For a bounded piece `begin <= end`
/// and `end` is always reachable from `begin` in whole steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubInterval {
    begin: u64,
    end: Option<u64>,
    step: u64,
}

impl SubInterval {
    /// Build a piece, snapping `end` down onto the step grid.
    ///
    /// Returns `None` when `step` is zero or `end < begin`.
    pub fn new(begin: u64, end: Option<u64>, step: u64) -> Option<Self> {
        if step == 0 {
            return None;
        }
        let end = match end {
            Some(end) if end < begin => return None,
            Some(end) => Some(end - (end - begin) % step),
            None => None,
        };
        Some(Self { begin, end, step })
    }

    pub fn single(value: u64) -> Self {
        Self {
            begin: value,
            end: Some(value),
            step: 1,
        }
    }

    /// A bounded piece whose `end` is already on the step grid.
    pub(crate) fn spanning(begin: u64, end: u64, step: u64) -> Self {
        debug_assert!(step > 0 && begin <= end && (end - begin) % step == 0);
        Self {
            begin,
            end: Some(end),
            step,
        }
    }

    pub fn begin(&self) -> u64 {
        self.begin
    }

    pub fn end(&self) -> Option<u64> {
        self.end
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn is_unbounded(&self) -> bool {
        self.end.is_none()
    }

    pub fn contains(&self, value: u64) -> bool {
        value >= self.begin
            && self.end.is_none_or(|end| value <= end)
            && (value - self.begin) % self.step == 0
    }

    /// Member count, `None` when unbounded. `0-18446744073709551615` has
    /// 2^64 members, hence the `u128`.
    pub fn len(&self) -> Option<u128> {
        self.end
            .map(|end| u128::from((end - self.begin) / self.step) + 1)
    }

    /// A single value or a step-1 run.
    fn is_run(&self) -> bool {
        self.step == 1 || self.end == Some(self.begin)
    }

    /// True when every member of `other` is also a member of `self`.
    fn covers(&self, other: &SubInterval) -> bool {
        let ends_inside = match (self.end, other.end) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(end), Some(other_end)) => other_end <= end,
        };
        self.contains(other.begin)
            && ends_inside
            && (other.end == Some(other.begin) || other.step % self.step == 0)
    }

    /// Merge two overlapping or touching runs. `next` must not start before
    /// `self`.
    fn join(&self, next: &SubInterval) -> Option<SubInterval> {
        if !self.is_run() || !next.is_run() {
            return None;
        }
        let end = self.end?;
        if next.begin > end.saturating_add(1) {
            return None;
        }
        Some(SubInterval {
            begin: self.begin,
            end: next.end.map(|next_end| next_end.max(end)),
            step: 1,
        })
    }
}

impl fmt::Display for SubInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) if end == self.begin => write!(f, "{}", self.begin),
            Some(end) if self.step == 1 => write!(f, "{}-{}", self.begin, end),
            Some(end) if end - self.begin == self.step => write!(f, "{},{}", self.begin, end),
            Some(end) => write!(f, "{}-{}x{}", self.begin, end, self.step),
            None if self.step == 1 => write!(f, "{}-", self.begin),
            None => write!(f, "{}-x{}", self.begin, self.step),
        }
    }
}

/// A set of non-negative integers written as a range expression such as
/// `1-3,10-20x2,100-`.
///
/// Items are a single number `N`, a range `N-M`, a stepped range `N-MxS`, or
/// an open range `N-` / `N-xS` that never ends. Pieces may overlap; iteration
/// still yields every member once, in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Interval {
    parts: Vec<SubInterval>,
}

impl Interval {
    /// Parse a range expression. Whitespace around items and empty items are
    /// ignored; items whose end lies before their begin are dropped.
    pub fn parse(expr: &str) -> Result<Self> {
        let mut parts = Vec::new();
        for item in expr.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match parse_item(item)? {
                Some(part) => parts.push(part),
                None => tracing::debug!(item, "dropping empty range item"),
            }
        }
        Ok(Self::from_parts(parts))
    }

    /// Every integer from `begin` on (`begin-`).
    pub fn starting_at(begin: u64) -> Self {
        Self {
            parts: vec![SubInterval {
                begin,
                end: None,
                step: 1,
            }],
        }
    }

    /// Sort `parts`, drop pieces covered by another piece and merge touching
    /// runs, so `1-10,5` becomes `1-10` and `1-3,4-6` becomes `1-6`.
    pub(crate) fn from_parts(mut parts: Vec<SubInterval>) -> Self {
        parts.sort_by_key(|p| {
            let end = p.end.map_or(u128::MAX, u128::from);
            (p.begin, Reverse(end), p.step)
        });

        let mut kept: Vec<SubInterval> = Vec::with_capacity(parts.len());
        for part in parts {
            if kept.iter().any(|k| k.covers(&part)) {
                continue;
            }
            let joinable = kept
                .iter()
                .enumerate()
                .rev()
                .find_map(|(i, k)| Some((i, k.join(&part)?)));
            match joinable {
                Some((at, joined)) => {
                    kept[at] = joined;
                    let mut i = 0;
                    kept.retain(|k| {
                        let keep = i == at || !joined.covers(k);
                        i += 1;
                        keep
                    });
                }
                None => kept.push(part),
            }
        }
        Self { parts: kept }
    }

    pub fn sub_intervals(&self) -> &[SubInterval] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn is_unbounded(&self) -> bool {
        self.parts.iter().any(SubInterval::is_unbounded)
    }

    pub fn contains(&self, value: u64) -> bool {
        self.parts.iter().any(|p| p.contains(value))
    }

    /// Ascending, duplicate-free iterator over all members.
    ///
    /// Never ends when the interval is unbounded; bound it with `take`.
    pub fn iter(&self) -> IntervalIter {
        IntervalIter {
            cursors: self
                .parts
                .iter()
                .map(|p| Cursor {
                    next: p.begin,
                    end: p.end,
                    step: p.step,
                })
                .collect(),
        }
    }

    /// Number of distinct members.
    pub fn cardinality(&self) -> Result<u128> {
        if self.is_unbounded() {
            return Err(Error::UnboundedCardinality);
        }
        let disjoint = self
            .parts
            .windows(2)
            .all(|w| w[0].end.is_some_and(|end| end < w[1].begin));
        if disjoint {
            Ok(self.parts.iter().filter_map(SubInterval::len).sum())
        } else {
            Ok(self.iter().count() as u128)
        }
    }
}

fn parse_item(item: &str) -> Result<Option<SubInterval>> {
    let err = |reason| Error::Parse {
        item: item.to_owned(),
        reason,
    };
    let number = |digits: &str| {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err("expected a number"));
        }
        digits.parse::<u64>().map_err(|_| err("number too large"))
    };

    let Some((begin, rest)) = item.split_once('-') else {
        let value = number(item)?;
        return Ok(Some(SubInterval::single(value)));
    };
    let begin = number(begin)?;
    let (end, step) = match rest.split_once('x') {
        Some((end, step)) => (end, number(step)?),
        None => (rest, 1),
    };
    if step == 0 {
        return Err(err("step must be at least 1"));
    }
    let end = if end.is_empty() {
        None
    } else {
        Some(number(end)?)
    };
    Ok(SubInterval::new(begin, end, step))
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Interval {
    type Item = u64;
    type IntoIter = IntervalIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
struct Cursor {
    next: u64,
    end: Option<u64>,
    step: u64,
}

/// Iterator returned by [`Interval::iter`].
///
/// Advances all pieces in parallel and always yields the smallest pending
/// value, which keeps the output sorted and free of duplicates.
#[derive(Debug, Clone)]
pub struct IntervalIter {
    cursors: Vec<Cursor>,
}

impl Iterator for IntervalIter {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let value = self.cursors.iter().map(|c| c.next).min()?;
        self.cursors.retain_mut(|c| {
            if c.next != value {
                return true;
            }
            match c.next.checked_add(c.step) {
                Some(next) if c.end.is_none_or(|end| next <= end) => {
                    c.next = next;
                    true
                }
                _ => false,
            }
        });
        Some(value)
    }
}
