/// Width written for a `#` placeholder.
pub const HASH_WIDTH: usize = 4;

/// Placeholder for a 4-digit zero-padded number.
pub const HASH: char = '#';

/// Placeholder for one digit of a padded number; a run of `@` sets the width.
pub const AT: char = '@';

/// Placeholder for a number whose padding is inconsistent, or for arbitrary
/// text inside a name pattern.
pub const STAR: char = '*';
