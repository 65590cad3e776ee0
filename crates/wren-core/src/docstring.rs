//! Doc comment normalization for help output.

/// Tab stop width used when expanding tabs.
pub const TAB_WIDTH: usize = 8;

/// Turns a raw doc comment into the lines the help command displays.
///
/// Tabs are expanded, the first line is trimmed on both sides and every other
/// line only on the right; leading and trailing blank lines are dropped.
/// Indentation of the continuation lines is kept verbatim: the common indent
/// only decides whether there is any non-blank continuation line at all.
pub fn trim_docstring(doc: Option<&str>) -> Vec<String> {
    let Some(doc) = doc.filter(|d| !d.is_empty()) else {
        return Vec::new();
    };
    let lines: Vec<String> = doc.lines().map(expand_tabs).collect();

    let indent = lines
        .iter()
        .skip(1)
        .filter_map(|line| {
            let stripped = line.trim_start();
            (!stripped.is_empty()).then(|| line.len() - stripped.len())
        })
        .min();

    let mut trimmed = vec![lines[0].trim().to_string()];
    if indent.is_some() {
        trimmed.extend(lines[1..].iter().map(|line| line.trim_end().to_string()));
    }

    while trimmed.last().is_some_and(|line| line.is_empty()) {
        trimmed.pop();
    }
    let leading = trimmed.iter().take_while(|line| line.is_empty()).count();
    trimmed.drain(..leading);
    trimmed
}

/// Expands tabs to the next multiple of [`TAB_WIDTH`].
fn expand_tabs(line: &str) -> String {
    let mut expanded = String::with_capacity(line.len());
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - column % TAB_WIDTH;
            expanded.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            expanded.push(ch);
            column += 1;
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_absent() {
        assert!(trim_docstring(None).is_empty());
        assert!(trim_docstring(Some("")).is_empty());
    }

    #[test]
    fn test_single_line() {
        assert_eq!(trim_docstring(Some("  Say hello.  ")), vec!["Say hello."]);
    }

    #[test]
    fn test_blank_edges_dropped_indent_kept() {
        assert_eq!(trim_docstring(Some("  \n  line\n  \n")), vec!["  line"]);
    }

    #[test]
    fn test_continuation_lines_not_dedented() {
        let doc = "Tell someone something.\n\n    Usage: .tell <nick> <msg>\n      (queued)\n";
        assert_eq!(
            trim_docstring(Some(doc)),
            vec![
                "Tell someone something.",
                "",
                "    Usage: .tell <nick> <msg>",
                "      (queued)",
            ]
        );
    }

    #[test]
    fn test_blank_continuation_only() {
        assert_eq!(trim_docstring(Some("Title\n   \n\n")), vec!["Title"]);
    }

    #[test]
    fn test_tabs_expanded() {
        assert_eq!(
            trim_docstring(Some("Head\n\tbody\n  \tx")),
            vec!["Head", "        body", "        x"]
        );
    }

    #[test]
    fn test_trailing_whitespace_stripped() {
        assert_eq!(
            trim_docstring(Some("Head   \n  body   ")),
            vec!["Head", "  body"]
        );
    }
}
