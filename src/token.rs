use std::fmt;

/// One number occurrence inside a name, together with the number of digits
/// it was written with.
///
/// `render_0042.exr` contains the token `{ value: 42, width: 4 }`. Rendering
/// zero-pads to `width`; a value that needs more digits than `width` is
/// written in full, never truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumberToken {
    value: u64,
    width: usize,
}

impl NumberToken {
    /// Create a token. A width of zero is treated as one.
    pub fn new(value: u64, width: usize) -> Self {
        Self {
            value,
            width: width.max(1),
        }
    }

    /// Parse a run of ASCII digits, keeping its width.
    ///
    /// Returns `None` for empty input, non-digits, or a value that doesn't fit
    /// into a `u64`.
    pub fn parse(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value = digits.parse::<u64>().ok()?;
        Some(Self::new(value, digits.len()))
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn with_value(self, value: u64) -> Self {
        Self { value, ..self }
    }

    pub fn with_width(self, width: usize) -> Self {
        Self::new(self.value, width)
    }

    /// Number of digits the value needs without any padding.
    pub fn digits(&self) -> usize {
        digit_count(self.value)
    }

    /// True when the written form carries leading zeros.
    pub fn is_padded(&self) -> bool {
        self.digits() < self.width
    }
}

impl fmt::Display for NumberToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.value, width = self.width)
    }
}

/// A single run of a parsed name: either literal text or a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Run {
    Text(String),
    Number(NumberToken),
}

pub(crate) fn digit_count(value: u64) -> usize {
    value.checked_ilog10().map_or(1, |d| d as usize + 1)
}
