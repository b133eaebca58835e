//! Group numbered names into sequences and move between individual names and
//! compact summaries.
//!
//! A batch such as `render_0001.exr` … `render_0024.exr` is summarised as
//! `render_#.exr (1-24)`, and a range expression such as `1-24` or `10-50x10`
//! expands back into the individual numbers.
//!
//! ```
//! use frameseq::{compact_range, group_sequences, Interval};
//!
//! let names = ["render_0002.exr", "render_0001.exr", "render_0003.exr", "notes.txt"];
//! let groups = group_sequences(names, false);
//! assert_eq!(groups[0].to_string(), "notes.txt");
//! assert_eq!(groups[1].to_string(), "render_#.exr (1-3)");
//!
//! assert_eq!(compact_range([1, 2, 3, 10, 20, 30]), "1-3,10-30x10");
//! let frames: Vec<u64> = Interval::parse("2-8x2").unwrap().iter().collect();
//! assert_eq!(frames, [2, 4, 6, 8]);
//! ```
//!
//! Everything except [`DiskSource`] works on strings and integers only.

mod compact;
mod consts;
mod error;
mod interval;
mod paths;
mod pattern;
mod renumber;
mod sequence;
mod source;
mod template;
mod token;

pub use compact::{compact, compact_range};
pub use error::{Error, Result};
pub use interval::{Interval, IntervalIter, SubInterval};
pub use paths::{split_dir, split_extension};
pub use pattern::{NamePattern, count_patterns, substitute};
pub use renumber::{Rename, RenumberOptions, plan_renames, plan_renames_with};
pub use sequence::{Sequence, SequenceGrouper, SequenceName, SequenceSummary, group_sequences};
pub use source::{DiskSource, NameSource, glob};
pub use template::TemplateString;
pub use token::{NumberToken, Run};
