//! Glob matching for cache keys.
//!
//! Patterns support `*` as a wildcard that matches any run of characters,
//! including an empty one. There is no escaping.

/// Checks if a cache key matches a glob pattern.
///
/// # Examples
///
/// ```
/// use roster_core::cache::pattern_matches;
///
/// assert!(pattern_matches("marks:*", "marks:avg-student-3"));
/// assert!(pattern_matches("groups:list:*-asc", "groups:list:null-asc"));
/// assert!(!pattern_matches("groups:list:*", "groups:7"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let Some((head, tail)) = pattern.split_once('*') else {
        return pattern == key;
    };

    let Some(mut rest) = key.strip_prefix(head) else {
        return false;
    };

    let mut pieces: Vec<&str> = tail.split('*').collect();
    let last = pieces.pop().unwrap_or_default();

    for piece in pieces.into_iter().filter(|p| !p.is_empty()) {
        match rest.find(piece) {
            Some(pos) => rest = &rest[pos + piece.len()..],
            None => return false,
        }
    }

    rest.ends_with(last)
}

/// Returns the region of a key, or of a pattern whose region is literal.
///
/// Patterns like `"*:1"` have no literal region and return `None`, which
/// tells backends to fall back to scanning every region.
///
/// ```
/// use roster_core::cache::region_of;
///
/// assert_eq!(region_of("students:list:*"), Some("students"));
/// assert_eq!(region_of("*:list:*"), None);
/// ```
pub fn region_of(key: &str) -> Option<&str> {
    let (region, _) = key.split_once(':')?;
    if region.is_empty() || region.contains('*') {
        return None;
    }
    Some(region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(pattern_matches("students:1", "students:1"));
        assert!(!pattern_matches("students:1", "students:10"));
    }

    #[test]
    fn test_trailing_wildcard() {
        assert!(pattern_matches("marks:*", "marks:marks-all-all"));
        assert!(pattern_matches("marks:*", "marks:"));
        assert!(!pattern_matches("marks:*", "students:1"));
    }

    #[test]
    fn test_leading_wildcard() {
        assert!(pattern_matches("*-asc", "groups:list:null-asc"));
        assert!(!pattern_matches("*-asc", "groups:list:null-desc"));
    }

    #[test]
    fn test_inner_wildcards() {
        assert!(pattern_matches("students:*-*-5", "students:list:null-null-5"));
        assert!(pattern_matches("a*b*c", "abc"));
        assert!(!pattern_matches("a*b*c", "acb"));
    }

    #[test]
    fn test_last_piece_cannot_reuse_consumed_text() {
        assert!(!pattern_matches("ab*b", "ab"));
        assert!(pattern_matches("ab*b", "abb"));
    }

    #[test]
    fn test_wildcard_only() {
        assert!(pattern_matches("*", ""));
        assert!(pattern_matches("*", "subjects:exists-Math"));
        assert!(pattern_matches("**", "anything"));
    }

    #[test]
    fn test_empty_pattern() {
        assert!(pattern_matches("", ""));
        assert!(!pattern_matches("", "students:1"));
        assert!(!pattern_matches("students:*", ""));
    }

    #[test]
    fn test_region_of() {
        assert_eq!(region_of("student_subjects:subjects-1"), Some("student_subjects"));
        assert_eq!(region_of("marks:*"), Some("marks"));
        assert_eq!(region_of("mar*:1"), None);
        assert_eq!(region_of("no-region"), None);
        assert_eq!(region_of(":1"), None);
    }
}
