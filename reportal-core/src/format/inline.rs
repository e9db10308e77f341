//! Inline emphasis scanner.
//!
//! Single left-to-right pass over a unit of text: `**x**` becomes a bold
//! run, `*x*` an italic run, everything else a plain run. Patterns do not
//! nest or overlap; unmatched markers stay literal. Bold spans never cross
//! a line break, italic spans may (they only exclude further `*`).

use crate::format::document::Run;

pub(crate) fn parse_runs(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        if let Some(after_marker) = rest.strip_prefix("**") {
            if let Some(end) = after_marker.find("**") {
                let inner = &after_marker[..end];
                if !inner.contains('\n') {
                    flush(&mut runs, &mut literal);
                    if !inner.is_empty() {
                        runs.push(Run::bold(inner));
                    }
                    i += 2 + end + 2;
                    continue;
                }
            }
            // Unmatched double marker stays literal.
            literal.push_str("**");
            i += 2;
            continue;
        }

        if let Some(after_marker) = rest.strip_prefix('*') {
            if let Some(end) = after_marker.find('*') {
                let inner = &after_marker[..end];
                let after_close = &after_marker[end + 1..];
                if !inner.is_empty() && !after_close.starts_with('*') {
                    flush(&mut runs, &mut literal);
                    runs.push(Run::italic(inner));
                    i += 1 + end + 1;
                    continue;
                }
            }
            literal.push('*');
            i += 1;
            continue;
        }

        let ch = rest.chars().next().expect("non-empty remainder");
        literal.push(ch);
        i += ch.len_utf8();
    }

    flush(&mut runs, &mut literal);
    runs
}

fn flush(runs: &mut Vec<Run>, literal: &mut String) {
    if !literal.is_empty() {
        runs.push(Run::plain(std::mem::take(literal)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_and_italic_exact_runs() {
        let runs = parse_runs("**bold** and *italic*");
        assert_eq!(
            runs,
            vec![
                Run::bold("bold"),
                Run::plain(" and "),
                Run::italic("italic"),
            ]
        );
    }

    #[test]
    fn test_plain_text_is_one_run() {
        assert_eq!(parse_runs("no markup here"), vec![Run::plain("no markup here")]);
    }

    #[test]
    fn test_unmatched_markers_stay_literal() {
        assert_eq!(parse_runs("a * b"), vec![Run::plain("a * b")]);
        assert_eq!(parse_runs("dangling **bold"), vec![Run::plain("dangling **bold")]);
        assert_eq!(parse_runs("*ab**"), vec![Run::plain("*ab**")]);
    }

    #[test]
    fn test_arithmetic_stars_do_match_heuristically() {
        // Mirrors the display convention: "2 * 3 * 4" italicizes " 3 ".
        let runs = parse_runs("2 * 3 * 4");
        assert_eq!(
            runs,
            vec![Run::plain("2 "), Run::italic(" 3 "), Run::plain(" 4")]
        );
    }

    #[test]
    fn test_bold_does_not_cross_lines() {
        let runs = parse_runs("**a\nb** c**");
        assert_eq!(runs, vec![Run::plain("**a\nb"), Run::bold(" c")]);
    }

    #[test]
    fn test_empty_bold_collapses() {
        assert_eq!(parse_runs("x****y"), vec![Run::plain("x"), Run::plain("y")]);
    }

    #[test]
    fn test_adjacent_emphasis() {
        let runs = parse_runs("*a* **b**");
        assert_eq!(
            runs,
            vec![Run::italic("a"), Run::plain(" "), Run::bold("b")]
        );
    }

    #[test]
    fn test_ambiguous_marker_pileup_degrades_left_to_right() {
        let runs = parse_runs("*a***b**");
        assert_eq!(runs, vec![Run::plain("*a"), Run::bold("*b")]);
    }

    #[test]
    fn test_multibyte_text() {
        let runs = parse_runs("Überblick **wichtig** – fertig");
        assert_eq!(
            runs,
            vec![
                Run::plain("Überblick "),
                Run::bold("wichtig"),
                Run::plain(" – fertig"),
            ]
        );
    }
}
