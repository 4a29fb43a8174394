//! Line-window extraction for source-context blocks.

use docvet_source_map::lines;

/// One line of a formatted window.
pub struct NumberedLine<'a> {
    /// 0-indexed row in the source.
    pub line_number: usize,
    /// Gutter (1-indexed line number) plus the line text.
    pub content: String,
    /// The line text alone.
    pub raw: &'a str,
}

/// A formatted run of consecutive lines.
pub struct LineRange<'a> {
    /// Width of the gutter prefixed to every content line; underline
    /// rows are indented by this much before column offsets apply.
    pub prefix_width: usize,
    pub lines: Vec<NumberedLine<'a>>,
}

/// Extract lines `first..=last` (0-indexed, clamped) with a numbered
/// gutter sized for the largest line number in the window.
pub fn format_line_range(source: &str, first: usize, last: usize) -> LineRange<'_> {
    let all = lines(source);
    // split always yields at least one line, so the window is never empty
    let last = last.min(all.len() - 1);
    let first = first.min(last);
    // gutter is "<number>: " with the number right-aligned
    let number_width = (last + 1).to_string().len();
    let prefix_width = number_width + 2;
    let formatted = (first..=last)
        .map(|n| NumberedLine {
            line_number: n,
            content: format!("{:>number_width$}: {}", n + 1, all[n]),
            raw: all[n],
        })
        .collect();
    LineRange {
        prefix_width,
        lines: formatted,
    }
}
