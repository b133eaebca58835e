use crate::error::{Error, Result};
use crate::token::{NumberToken, Run};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A string split into alternating text and number runs.
///
/// Numbers are compared as integers rather than as text, so `anim2` sorts
/// before `anim08`, and each number keeps the width it was written with so the
/// input string can always be reproduced.
///
/// The run list always starts and ends with a (possibly empty) text run:
/// `anim1_0001.png` becomes `["anim", 1, "_", 0001, ".png"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateString {
    runs: Vec<Run>,
}

impl TemplateString {
    /// Split `s` into text and number runs. Every string parses.
    ///
    /// A digit run too large for a `u64` stays part of the surrounding text.
    pub fn parse(s: &str) -> Self {
        let mut runs = Vec::new();
        let mut text = String::new();
        let mut rest = s;

        while let Some(start) = rest.find(|c: char| c.is_ascii_digit()) {
            text.push_str(&rest[..start]);
            let tail = &rest[start..];
            let len = tail
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(tail.len());
            let digits = &tail[..len];
            match NumberToken::parse(digits) {
                Some(token) => {
                    runs.push(Run::Text(std::mem::take(&mut text)));
                    runs.push(Run::Number(token));
                }
                None => {
                    tracing::trace!(digits, "number too large, keeping it as text");
                    text.push_str(digits);
                }
            }
            rest = &tail[len..];
        }
        text.push_str(rest);
        runs.push(Run::Text(text));

        Self { runs }
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// The text runs, in order. There is always one more text run than numbers.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.runs.iter().filter_map(|run| match run {
            Run::Text(text) => Some(text.as_str()),
            Run::Number(_) => None,
        })
    }

    /// The number runs, in order.
    pub fn tokens(&self) -> impl Iterator<Item = &NumberToken> {
        self.runs.iter().filter_map(|run| match run {
            Run::Number(token) => Some(token),
            Run::Text(_) => None,
        })
    }

    /// Number of number occurrences (`anim1_018.tif` has two, `anim` none).
    pub fn number_count(&self) -> usize {
        self.runs.len() / 2
    }

    /// Resolve a possibly negative slot index into a position in `0..count`.
    fn slot(&self, index: isize) -> Result<usize> {
        let count = self.number_count();
        let resolved = if index < 0 {
            count as isize + index
        } else {
            index
        };
        if resolved < 0 || resolved as usize >= count {
            return Err(Error::Index { index, count });
        }
        Ok(resolved as usize)
    }

    fn token_mut(&mut self, index: isize) -> Result<&mut NumberToken> {
        let slot = self.slot(index)?;
        let count = self.number_count();
        self.runs
            .iter_mut()
            .filter_map(|run| match run {
                Run::Number(token) => Some(token),
                Run::Text(_) => None,
            })
            .nth(slot)
            .ok_or(Error::Index { index, count })
    }

    /// The token at slot `index` (negative counts from the end).
    pub fn token(&self, index: isize) -> Result<NumberToken> {
        let slot = self.slot(index)?;
        self.tokens().nth(slot).copied().ok_or(Error::Index {
            index,
            count: self.number_count(),
        })
    }

    pub fn number(&self, index: isize) -> Result<u64> {
        self.token(index).map(|t| t.value())
    }

    /// The number at `index` exactly as written, including padding.
    pub fn number_str(&self, index: isize) -> Result<String> {
        self.token(index).map(|t| t.to_string())
    }

    pub fn number_width(&self, index: isize) -> Result<usize> {
        self.token(index).map(|t| t.width())
    }

    pub fn set_number(&mut self, index: isize, value: u64) -> Result<()> {
        let token = self.token_mut(index)?;
        *token = token.with_value(value);
        Ok(())
    }

    /// Change the padding of a number. A width of zero is treated as one.
    pub fn set_number_width(&mut self, index: isize, width: usize) -> Result<()> {
        let token = self.token_mut(index)?;
        *token = token.with_width(width);
        Ok(())
    }

    pub fn numbers(&self) -> Vec<u64> {
        self.tokens().map(|t| t.value()).collect()
    }

    pub fn widths(&self) -> Vec<usize> {
        self.tokens().map(|t| t.width()).collect()
    }

    /// Replace the number at `index` with literal text.
    ///
    /// The text is merged with the runs on either side, so the slot disappears
    /// and every later slot shifts down by one.
    pub fn replace_number(&mut self, index: isize, literal: &str) -> Result<()> {
        let at = 2 * self.slot(index)? + 1;

        let mut merged = literal.to_owned();
        for run in self.runs.drain(at..at + 2) {
            if let Run::Text(text) = run {
                merged.push_str(&text);
            }
        }
        if let Some(Run::Text(prefix)) = self.runs.get_mut(at - 1) {
            prefix.push_str(&merged);
        }
        Ok(())
    }

    pub fn delete_number(&mut self, index: isize) -> Result<()> {
        self.replace_number(index, "")
    }

    /// Check whether `other` belongs to the same sequence as `self`.
    ///
    /// The text runs must be equal. With `varying == None` every number may
    /// differ; with `Some(i)` only slot `i` may differ. A `varying` index that
    /// doesn't name a slot leaves no number free to differ.
    pub fn matches_template(&self, other: &TemplateString, varying: Option<isize>) -> bool {
        if self.runs.len() != other.runs.len() {
            return false;
        }
        if !self.texts().eq(other.texts()) {
            return false;
        }
        let Some(varying) = varying else {
            return true;
        };
        let free = self.slot(varying).ok();
        self.tokens()
            .zip(other.tokens())
            .enumerate()
            .all(|(slot, (a, b))| Some(slot) == free || a.value() == b.value())
    }
}

impl Ord for TemplateString {
    /// Structure first (the text runs), then numbers by value, then by width.
    ///
    /// Sorting by this order puts names of one sequence next to each other.
    fn cmp(&self, other: &Self) -> Ordering {
        self.texts()
            .cmp(other.texts())
            .then_with(|| {
                self.tokens()
                    .map(|t| t.value())
                    .cmp(other.tokens().map(|t| t.value()))
            })
            .then_with(|| {
                self.tokens()
                    .map(|t| t.width())
                    .cmp(other.tokens().map(|t| t.width()))
            })
    }
}

impl PartialOrd for TemplateString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TemplateString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            match run {
                Run::Text(text) => f.write_str(text)?,
                Run::Number(token) => write!(f, "{token}")?,
            }
        }
        Ok(())
    }
}

impl Default for TemplateString {
    /// The empty string: a single empty text run.
    fn default() -> Self {
        Self::parse("")
    }
}

impl FromStr for TemplateString {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for TemplateString {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}
