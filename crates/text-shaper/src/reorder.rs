//! Logical to visual order with the Unicode Bidirectional Algorithm.

use std::ops::Range;

use log::trace;
use unicode_bidi::BidiInfo;

/// Reorder `text` for a renderer that lays characters out left to right.
///
/// Each paragraph takes its base direction from its first strong character.
/// Right-to-left runs are reversed and their paired brackets mirrored;
/// paragraph separators stay at the end of their paragraph.
pub fn reorder(text: &str) -> String {
    let bidi = BidiInfo::new(text, None);
    let mut out = String::with_capacity(text.len());

    for para in &bidi.paragraphs {
        let line = trim_separator(text, para.range.clone());
        trace!("paragraph {:?} at level {}", line, para.level.number());

        if !line.is_empty() {
            let (levels, runs) = bidi.visual_runs(para, line.clone());
            for run in runs {
                let slice = &text[run.clone()];
                if levels[run.start].is_rtl() {
                    out.extend(slice.chars().rev().map(mirrored));
                } else {
                    out.push_str(slice);
                }
            }
        }
        out.push_str(&text[line.end..para.range.end]);
    }
    out
}

/// `range` without a trailing paragraph separator.
fn trim_separator(text: &str, range: Range<usize>) -> Range<usize> {
    let content = text[range.clone()].trim_end_matches(['\n', '\r', '\u{85}', '\u{2029}']);
    range.start..range.start + content.len()
}

/// The mirror image of a bracket-like character, for glyphs drawn in a
/// right-to-left run.
pub fn mirrored(c: char) -> char {
    match c {
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '{' => '}',
        '}' => '{',
        '<' => '>',
        '>' => '<',
        '«' => '»',
        '»' => '«',
        '‹' => '›',
        '›' => '‹',
        '≤' => '≥',
        '≥' => '≤',
        '\u{FD3E}' => '\u{FD3F}',
        '\u{FD3F}' => '\u{FD3E}',
        other => other,
    }
}
