// --- FILE: dirtree-lib/src/utils.rs ---

/// Separator between path segments. Paths are never normalized, so a
/// backslash is an ordinary character.
pub const SEGMENT_SEPARATOR: char = '/';

/// First `/`-delimited segment of `path`. A path without a separator
/// (including the empty string) is its own first segment.
pub fn first_segment(path: &str) -> &str {
    path.split(SEGMENT_SEPARATOR).next().unwrap_or(path)
}

/// Everything after the first segment, or `None` when the path is only a
/// root folder name.
pub(crate) fn strip_root_segment(path: &str) -> Option<&str> {
    path.split_once(SEGMENT_SEPARATOR).map(|(_, rest)| rest)
}

/// `round(done / total * 100)` with halves rounded up, computed in integers.
pub(crate) fn percent_complete(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let done = done.min(total) as u128;
    let total = total as u128;
    ((done * 200 + total) / (total * 2)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_segment_cases() {
        assert_eq!(first_segment("proj/src/main.rs"), "proj");
        assert_eq!(first_segment("proj"), "proj");
        assert_eq!(first_segment(""), "");
        assert_eq!(first_segment("/abs"), "");
    }

    #[test]
    fn strip_root_segment_cases() {
        assert_eq!(strip_root_segment("proj/src/main.rs"), Some("src/main.rs"));
        assert_eq!(strip_root_segment("proj/"), Some(""));
        assert_eq!(strip_root_segment("proj"), None);
    }

    #[test]
    fn percent_complete_bounds() {
        assert_eq!(percent_complete(0, 0), 100);
        assert_eq!(percent_complete(1, 3), 33);
        assert_eq!(percent_complete(2, 3), 67);
        assert_eq!(percent_complete(3, 3), 100);
    }
}
