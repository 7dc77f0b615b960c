//! Query modules for the versecast catalog.
//!
//! One module per table family. List queries are batched: callers pass the
//! full set of parent IDs and get all child rows in one round trip.

pub mod files;
pub mod filesets;
pub mod playlists;
pub mod timestamps;
pub mod variants;

/// Build a comma-separated `?` placeholder list for an `IN (...)` clause.
pub(crate) fn placeholders(n: usize) -> String {
    let mut s = String::with_capacity(n * 2);
    for i in 0..n {
        if i > 0 {
            s.push(',');
        }
        s.push('?');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(0), "");
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?,?,?");
    }
}
