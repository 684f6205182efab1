//! Sets of Unicode codepoint ranges.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use thiserror::Error;

/// Basic Latin, printable plus DEL.
pub const LATIN_RANGES: &[(u32, u32)] = &[(0x0020, 0x007F)];

/// Arabic, Arabic Supplement, Arabic Extended-A and both presentation-form blocks.
pub const ARABIC_RANGES: &[(u32, u32)] = &[
    (0x0600, 0x06FF),
    (0x0750, 0x077F),
    (0x08A0, 0x08FF),
    (0xFB50, 0xFDFF),
    (0xFE70, 0xFEFF),
];

const MAX_CODEPOINT: u32 = 0x10FFFF;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeParseError {
    #[error("empty codepoint range list")]
    Empty,

    #[error("invalid codepoint '{0}', expected U+XXXX")]
    InvalidCodepoint(String),

    #[error("range U+{start:04X}-{end:04X} ends before it starts")]
    Reversed { start: u32, end: u32 },

    #[error("codepoint U+{0:04X} is beyond U+10FFFF")]
    OutOfRange(u32),
}

/// An ordered set of inclusive codepoint intervals.
///
/// Intervals are sorted and coalesced on construction, so two sets covering the
/// same codepoints compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CodepointRangeSet {
    ranges: Vec<(u32, u32)>,
}

impl CodepointRangeSet {
    /// Build a set from `(start, end)` pairs. Reversed pairs are swapped.
    pub fn new(ranges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut ranges: Vec<(u32, u32)> = ranges
            .into_iter()
            .map(|(a, b)| (a.min(b), a.max(b).min(MAX_CODEPOINT)))
            .filter(|(start, _)| *start <= MAX_CODEPOINT)
            .collect();
        ranges.sort_unstable();

        let mut merged: Vec<(u32, u32)> = Vec::with_capacity(ranges.len());
        for (start, end) in ranges {
            match merged.last_mut() {
                Some(last) if start <= last.1.saturating_add(1) => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }
        Self { ranges: merged }
    }

    pub fn latin() -> Self {
        Self::new(LATIN_RANGES.iter().copied())
    }

    pub fn arabic() -> Self {
        Self::new(ARABIC_RANGES.iter().copied())
    }

    /// Parse a comma separated list such as `U+0600-06FF, U+FE70-FEFF, U+0640`.
    pub fn parse(s: &str) -> Result<Self, RangeParseError> {
        let mut ranges = Vec::new();
        for item in s.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let (start, end) = match item.split_once('-') {
                Some((start, end)) => (parse_codepoint(start)?, parse_codepoint(end)?),
                None => {
                    let cp = parse_codepoint(item)?;
                    (cp, cp)
                }
            };
            if end < start {
                return Err(RangeParseError::Reversed { start, end });
            }
            ranges.push((start, end));
        }

        if ranges.is_empty() {
            return Err(RangeParseError::Empty);
        }
        Ok(Self::new(ranges))
    }

    pub fn contains(&self, codepoint: u32) -> bool {
        self.ranges
            .binary_search_by(|&(start, end)| {
                if end < codepoint {
                    std::cmp::Ordering::Less
                } else if start > codepoint {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Whether any codepoint belongs to both sets.
    pub fn overlaps(&self, other: &Self) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let (a_start, a_end) = self.ranges[i];
            let (b_start, b_end) = other.ranges[j];
            if a_start <= b_end && b_start <= a_end {
                return true;
            }
            if a_end < b_end {
                i += 1;
            } else {
                j += 1;
            }
        }
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.ranges.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of codepoints covered.
    pub fn codepoint_count(&self) -> u32 {
        self.ranges.iter().map(|(start, end)| end - start + 1).sum()
    }
}

impl FromStr for CodepointRangeSet {
    type Err = RangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for CodepointRangeSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, (start, end)) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if start == end {
                write!(f, "U+{start:04X}")?;
            } else {
                write!(f, "U+{start:04X}-{end:04X}")?;
            }
        }
        Ok(())
    }
}

fn parse_codepoint(s: &str) -> Result<u32, RangeParseError> {
    let s = s.trim();
    let hex = s
        .strip_prefix("U+")
        .or_else(|| s.strip_prefix("u+"))
        .unwrap_or(s);
    let cp = u32::from_str_radix(hex, 16)
        .map_err(|_| RangeParseError::InvalidCodepoint(s.to_string()))?;
    if cp > MAX_CODEPOINT {
        return Err(RangeParseError::OutOfRange(cp));
    }
    Ok(cp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let set = CodepointRangeSet::parse("U+0600-06FF, U+0750-077F,U+0640").unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![(0x0600, 0x06FF), (0x0750, 0x077F)]);
        assert!(set.contains(0x0627));
        assert!(set.contains(0x0750));
        assert!(!set.contains(0x0700));
    }

    #[test]
    fn test_parse_accepts_prefixed_end() {
        let set: CodepointRangeSet = "u+0041-U+005A".parse().unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![(0x41, 0x5A)]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(CodepointRangeSet::parse(" , "), Err(RangeParseError::Empty));
        assert!(matches!(
            CodepointRangeSet::parse("U+00ZZ"),
            Err(RangeParseError::InvalidCodepoint(_))
        ));
        assert_eq!(
            CodepointRangeSet::parse("U+007F-0020"),
            Err(RangeParseError::Reversed { start: 0x7F, end: 0x20 })
        );
        assert_eq!(CodepointRangeSet::parse("U+110000"), Err(RangeParseError::OutOfRange(0x110000)));
    }

    #[test]
    fn test_coalesces_adjacent_and_nested() {
        let set = CodepointRangeSet::new([(0x30, 0x39), (0x20, 0x2F), (0x21, 0x22), (0x50, 0x40)]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![(0x20, 0x39), (0x40, 0x50)]);
        assert_eq!(set.codepoint_count(), 26 + 17);
    }

    #[test]
    fn test_presets_are_disjoint() {
        let latin = CodepointRangeSet::latin();
        let arabic = CodepointRangeSet::arabic();
        assert!(!latin.overlaps(&arabic));
        assert!(!arabic.overlaps(&latin));
        assert!(latin.contains(0x41));
        assert!(arabic.contains(0x0661));
        assert!(arabic.contains(0xFEFB));
    }

    #[test]
    fn test_overlaps() {
        let a = CodepointRangeSet::new([(0x20, 0x7F)]);
        let b = CodepointRangeSet::new([(0x600, 0x6FF), (0x7F, 0x80)]);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&CodepointRangeSet::default()));
    }

    #[test]
    fn test_display_round_trip() {
        let set = CodepointRangeSet::arabic();
        assert_eq!(set.to_string(), "U+0600-06FF, U+0750-077F, U+08A0-08FF, U+FB50-FDFF, U+FE70-FEFF");
        assert_eq!(set.to_string().parse::<CodepointRangeSet>().unwrap(), set);
    }
}
