//! Line-level predicates for finding where structured content starts.
//!
//! Lines are scanned with their terminators attached (`split_inclusive`) so
//! a suffix starting at a found line is a byte-exact slice of the input.

use crate::model::TESTCASE_ROOT_LITERAL;

/// Line is a markdown code fence at column zero.
///
/// Indented fences belong to YAML block scalars and are content.
pub fn is_fence(line: &str) -> bool {
    line.starts_with("```")
}

/// Line contains `ado_testcases:`.
pub fn has_root_key(line: &str) -> bool {
    line.contains(TESTCASE_ROOT_LITERAL)
}

/// Line is a YAML list item.
pub fn is_list_item(line: &str) -> bool {
    line.trim_start().starts_with('-')
}

/// Byte offset and line index of the first structured-content line.
///
/// A line qualifies when it contains the root key, or when it is a list item
/// and some earlier line is non-blank.
pub fn find_start(text: &str) -> Option<(usize, usize)> {
    let mut offset = 0usize;
    let mut seen_content = false;
    for (idx, line) in text.split_inclusive('\n').enumerate() {
        if has_root_key(line) || (seen_content && is_list_item(line)) {
            return Some((offset, idx));
        }
        seen_content |= !line.trim().is_empty();
        offset += line.len();
    }
    None
}

/// Byte offset of the first fence line strictly after the first line of `body`,
/// with the number of lines from there to the end.
pub fn find_trailing_fence(body: &str) -> Option<(usize, usize)> {
    let lines: Vec<&str> = body.split_inclusive('\n').collect();
    let mut offset = lines.first().map_or(0, |l| l.len());
    for (idx, line) in lines.iter().enumerate().skip(1) {
        if is_fence(line) {
            return Some((offset, lines.len() - idx));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_key_must_be_followed_by_colon() {
        assert!(has_root_key("ado_testcases:\n"));
        assert!(has_root_key("  ado_testcases: []"));
        assert!(!has_root_key("ado_testcases\n"));
    }

    #[test]
    fn leading_list_item_does_not_start_content() {
        assert_eq!(find_start("- a\n- b\n"), Some((4, 1)));
        assert_eq!(find_start("\n\n- a\n"), None);
        assert_eq!(find_start("intro\nado_testcases:\n"), Some((6, 1)));
    }

    #[test]
    fn trailing_fence_is_found_after_first_line() {
        let body = "ado_testcases:\n  - title: X\n```\nthanks\n";
        assert_eq!(find_trailing_fence(body), Some((28, 2)));
        assert_eq!(find_trailing_fence("```\nado_testcases:\n"), None);
    }

    #[test]
    fn indented_fence_is_content() {
        assert!(is_fence("```\n"));
        assert!(is_fence("```yaml\n"));
        assert!(!is_fence("          ```\n"));
        let body = "ado_testcases:\n  - step: |\n      ```\n      ./run.sh\n      ```\n";
        assert_eq!(find_trailing_fence(body), None);
    }
}
