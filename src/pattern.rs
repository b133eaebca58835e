use crate::consts::{AT, HASH, HASH_WIDTH, STAR};
use crate::error::{Error, Result};
use crate::paths::{split_dir, split_extension};
use crate::template::TemplateString;
use regex::Regex;

/// A piece of a name template: literal text or a number placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'a> {
    Literal(&'a str),
    Hash,
    /// A run of `@`, with its length.
    At(usize),
    /// `*`, only meaningful in name patterns.
    Any,
}

impl Piece<'_> {
    /// Padding width of a number placeholder.
    fn width(&self) -> Option<usize> {
        match self {
            Piece::Hash => Some(HASH_WIDTH),
            Piece::At(width) => Some(*width),
            Piece::Literal(_) | Piece::Any => None,
        }
    }
}

fn pieces(template: &str, with_star: bool) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut literal_start = 0;
    let mut chars = template.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let piece = match c {
            HASH => Piece::Hash,
            AT => {
                let mut width = 1;
                while chars.next_if(|&(_, c)| c == AT).is_some() {
                    width += 1;
                }
                Piece::At(width)
            }
            STAR if with_star => Piece::Any,
            _ => continue,
        };
        if literal_start < i {
            out.push(Piece::Literal(&template[literal_start..i]));
        }
        out.push(piece);
        literal_start = chars.peek().map_or(template.len(), |&(j, _)| j);
    }
    if literal_start < template.len() {
        out.push(Piece::Literal(&template[literal_start..]));
    }
    out
}

/// Count the number substitution patterns in `template`.
///
/// Every `#` counts on its own; a run of `@` counts once.
pub fn count_patterns(template: &str) -> usize {
    pieces(template, false).iter().filter_map(Piece::width).count()
}

/// Replace the number patterns in `template` with `values`, left to right.
///
/// `#` becomes a 4-digit zero-padded number and a run of `@` a number padded
/// to the run's length. Values wider than their pattern are written in full.
///
/// ```
/// assert_eq!(frameseq::substitute("frame_#.exr", &[7]).unwrap(), "frame_0007.exr");
/// assert_eq!(frameseq::substitute("v@_@@@.exr", &[2, 42]).unwrap(), "v2_042.exr");
/// ```
pub fn substitute(template: &str, values: &[u64]) -> Result<String> {
    let pieces = pieces(template, false);
    let patterns = pieces.iter().filter_map(Piece::width).count();
    if patterns != values.len() {
        return Err(Error::PatternCount {
            template: template.to_owned(),
            patterns,
            values: values.len(),
        });
    }

    let mut values = values.iter();
    let mut out = String::with_capacity(template.len());
    for piece in pieces {
        match piece {
            Piece::Literal(text) => out.push_str(text),
            Piece::Any => out.push(STAR),
            number => {
                if let (Some(width), Some(value)) = (number.width(), values.next()) {
                    out.push_str(&format!("{value:0width$}"));
                }
            }
        }
    }
    Ok(out)
}

/// Matcher for name patterns such as `renders/beauty_#.exr`.
///
/// `#` matches exactly four digits, a run of k `@` matches k digits or an
/// unpadded number with more digits, and `*` matches anything. The match is
/// anchored at the start only, so `shot` selects every name beginning with
/// `shot`.
#[derive(Debug, Clone)]
pub struct NamePattern {
    pattern: String,
    regex: Regex,
}

impl NamePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let mut expr = String::from("^");
        for piece in pieces(pattern, true) {
            match piece {
                Piece::Literal(text) => expr.push_str(&regex::escape(text)),
                Piece::Any => expr.push_str(".*"),
                Piece::Hash => expr.push_str("[0-9]{4}"),
                Piece::At(width) => {
                    expr.push_str(&format!("(?:[0-9]{{{width}}}|[1-9][0-9]{{{width},}})"))
                }
            }
        }
        tracing::trace!(pattern, regex = %expr, "compiled name pattern");
        Ok(Self {
            pattern: pattern.to_owned(),
            regex: Regex::new(&expr)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// The literal directory part of the pattern, empty when there is none.
    pub fn directory(&self) -> &str {
        split_dir(&self.pattern).0
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// True when `name` matches and its file stem contains at least one
    /// number, i.e. it can be part of a sequence. Numbers in the directory
    /// part don't count.
    pub fn accepts(&self, name: &str) -> bool {
        let stem = split_extension(split_dir(name).1).0;
        self.is_match(name) && TemplateString::parse(stem).number_count() > 0
    }
}
