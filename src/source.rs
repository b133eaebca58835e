use crate::error::Result;
use crate::pattern::NamePattern;
use crate::sequence::{Sequence, SequenceGrouper};
use std::io::ErrorKind;
use std::path::Path;

/// A source of candidate names.
///
/// Implementations produce the flat list of names that gets grouped into
/// sequences, for example by listing a directory. The order doesn't matter;
/// grouping sorts the names anyway.
pub trait NameSource {
    fn names(&self) -> Result<Vec<String>>;
}

impl<S: AsRef<str>> NameSource for [S] {
    fn names(&self) -> Result<Vec<String>> {
        Ok(self.iter().map(|s| s.as_ref().to_owned()).collect())
    }
}

impl<S: AsRef<str>> NameSource for Vec<S> {
    fn names(&self) -> Result<Vec<String>> {
        self.as_slice().names()
    }
}

/// A `NameSource` that lists files matching a [`NamePattern`].
///
/// Only the pattern's directory is listed (the current directory when the
/// pattern has none); wildcards in the directory part are not expanded.
/// Directories and names without a number in their stem are skipped. A
/// missing directory yields no names.
#[derive(Debug, Clone)]
pub struct DiskSource {
    pattern: NamePattern,
}

impl DiskSource {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: NamePattern::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &NamePattern {
        &self.pattern
    }
}

impl NameSource for DiskSource {
    fn names(&self) -> Result<Vec<String>> {
        let dir = self.pattern.directory();
        let listing = if dir.is_empty() { "." } else { dir };

        let read = match std::fs::read_dir(listing) {
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(dir = listing, "directory not found");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let mut entries: Vec<_> = read.filter_map(|r| r.ok()).collect();
        entries.sort_by_key(|e| e.path());

        let mut names = Vec::new();
        for entry in entries {
            if entry.path().is_dir() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            let name = if dir.is_empty() {
                file_name
            } else {
                match Path::new(dir).join(&file_name).to_str() {
                    Some(joined) => joined.to_owned(),
                    None => continue,
                }
            };
            if self.pattern.accepts(&name) {
                tracing::trace!(name, "matched");
                names.push(name);
            }
        }
        tracing::debug!(pattern = self.pattern.as_str(), found = names.len(), "listed names");
        Ok(names)
    }
}

/// Group the names of `source` into sequences, treating them as file paths.
pub fn glob<S: NameSource + ?Sized>(source: &S) -> Result<Vec<Sequence>> {
    let names = source.names()?;
    Ok(SequenceGrouper::new().assume_file_paths(true).group(names))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_are_sources() {
        let names = ["b_0002.exr", "b_0001.exr"];
        assert_eq!(names.as_slice().names().unwrap(), ["b_0002.exr", "b_0001.exr"]);

        let seqs = glob(names.as_slice()).unwrap();
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].to_string(), "b_#.exr (1-2)");
    }

    #[test]
    fn vec_source_groups_by_directory() {
        let names = vec![
            "take2/f_0001.exr".to_string(),
            "take1/f_0001.exr".to_string(),
            "take1/f_0002.exr".to_string(),
        ];
        let seqs = glob(&names).unwrap();
        let shown: Vec<String> = seqs.iter().map(|s| s.to_string()).collect();
        assert_eq!(shown, ["take1/f_#.exr (1-2)", "take2/f_0001.exr"]);
    }
}
