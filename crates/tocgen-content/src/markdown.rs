//! Line-level Markdown structure: fenced blocks and inline code spans.

use std::ops::Range;

/// Tracks whether successive lines are inside a fenced code block.
#[derive(Debug, Default)]
pub(crate) struct Fences {
    /// Fence character and run length of the open block.
    open: Option<(char, usize)>,
}

impl Fences {
    /// Feed the next line. Returns true if it is a fence line or lies
    /// inside a fenced block.
    pub(crate) fn observe(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        let marker = if line.len() - trimmed.len() <= 3 {
            fence_run(trimmed)
        } else {
            None
        };

        match (self.open, marker) {
            (None, Some(opening)) => {
                self.open = Some(opening);
                true
            }
            (Some((c, n)), Some((mc, mn)))
                if mc == c && mn >= n && trimmed.trim_end().len() == mn =>
            {
                self.open = None;
                true
            }
            (Some(_), _) => true,
            (None, None) => false,
        }
    }
}

/// Leading run of three or more backticks or tildes.
fn fence_run(text: &str) -> Option<(char, usize)> {
    let c = text.chars().next().filter(|c| matches!(*c, '`' | '~'))?;
    let n = text.chars().take_while(|&x| x == c).count();
    (n >= 3).then_some((c, n))
}

/// Byte ranges of inline code spans in `line`, backticks included.
///
/// A span closes at the next backtick run of the same length; an unmatched
/// run is literal text.
pub(crate) fn code_spans(line: &str) -> Vec<Range<usize>> {
    let bytes = line.as_bytes();
    let run_end = |mut i: usize| {
        while i < bytes.len() && bytes[i] == b'`' {
            i += 1;
        }
        i
    };

    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let start = i;
        i = run_end(i);
        let len = i - start;

        let mut j = i;
        while j < bytes.len() {
            if bytes[j] != b'`' {
                j += 1;
                continue;
            }
            let close = run_end(j);
            if close - j == len {
                spans.push(start..close);
                i = close;
                break;
            }
            j = close;
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fences() {
        let mut fences = Fences::default();
        let seen: Vec<bool> = [
            "text\n",
            "```markdown\n",
            "[x](a.md)\n",
            "``\n",
            "```\n",
            "after\n",
            "  ~~~~\n",
            "```\n",
            "~~~~~\n",
            "end",
        ]
        .iter()
        .map(|line| fences.observe(line))
        .collect();

        assert_eq!(
            seen,
            vec![false, true, true, true, true, false, true, true, true, false]
        );
    }

    #[test]
    fn test_indented_code_is_not_a_fence() {
        let mut fences = Fences::default();
        assert!(!fences.observe("    ```\n"));
        assert!(!fences.observe("text\n"));
    }

    #[test]
    fn test_code_spans() {
        let line = "see `[a](b)` and ``x ` y`` but ` alone";
        let spans: Vec<&str> = code_spans(line).into_iter().map(|r| &line[r]).collect();
        assert_eq!(spans, vec!["`[a](b)`", "``x ` y``"]);
    }
}
