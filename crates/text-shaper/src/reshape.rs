//! Contextual joining: Arabic letters to their positional presentation forms.

use crate::joining::{
    ArabicForm, JoiningType, LAM, joining_type, lam_alef_ligature, presentation_form,
};

#[derive(Copy, Clone, Debug)]
enum Unit {
    Char(char),
    /// Lam followed by this alef, drawn as one ligature
    LamAlef(char),
}

impl Unit {
    fn joining_type(self) -> JoiningType {
        match self {
            Unit::Char(c) => joining_type(c),
            // the ligature ends in alef, so it only joins backwards
            Unit::LamAlef(_) => JoiningType::Right,
        }
    }
}

/// Replace each Arabic letter with the presentation form its neighbors call
/// for. Marks are skipped when looking for neighbors and kept in place; lam
/// followed by alef becomes a single ligature. Everything else is untouched.
pub fn reshape(text: &str) -> String {
    let units = group_lam_alef(text);
    let types: Vec<JoiningType> = units.iter().map(|u| u.joining_type()).collect();

    let mut out = String::with_capacity(text.len());
    for (i, unit) in units.iter().enumerate() {
        let ty = types[i];
        if ty == JoiningType::Transparent || ty == JoiningType::NonJoining {
            if let Unit::Char(c) = unit {
                out.push(presentation_form(*c, ArabicForm::Isolated));
            }
            continue;
        }

        let previous = types[..i].iter().rev().copied().find(|t| *t != JoiningType::Transparent);
        let next = types[i + 1..].iter().copied().find(|t| *t != JoiningType::Transparent);
        let joins_previous = ty.joins_previous() && previous.is_some_and(JoiningType::joins_next);
        let joins_next = ty.joins_next() && next.is_some_and(JoiningType::joins_previous);

        match unit {
            Unit::Char(c) => {
                out.push(presentation_form(*c, ArabicForm::from_joins(joins_previous, joins_next)))
            }
            Unit::LamAlef(alef) => match lam_alef_ligature(*alef, joins_previous) {
                Some(ligature) => out.push(ligature),
                None => {
                    out.push(LAM);
                    out.push(*alef);
                }
            },
        }
    }
    out
}

/// Split `text` into units, folding lam + alef (with any marks between them)
/// into one. Marks between the two are moved after the ligature.
fn group_lam_alef(text: &str) -> Vec<Unit> {
    let chars: Vec<char> = text.chars().collect();
    let mut units = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == LAM {
            let marks_end = chars[i + 1..]
                .iter()
                .position(|c| joining_type(*c) != JoiningType::Transparent)
                .map_or(chars.len(), |p| i + 1 + p);
            if let Some(&alef) = chars.get(marks_end)
                && lam_alef_ligature(alef, false).is_some()
            {
                units.push(Unit::LamAlef(alef));
                units.extend(chars[i + 1..marks_end].iter().map(|c| Unit::Char(*c)));
                i = marks_end + 1;
                continue;
            }
        }
        units.push(Unit::Char(c));
        i += 1;
    }
    units
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_letter_is_isolated() {
        assert_eq!(reshape("\u{0628}"), "\u{FE8F}");
        assert_eq!(reshape("\u{0621}"), "\u{FE80}");
    }

    #[test]
    fn test_dual_joining_sequence() {
        assert_eq!(reshape("\u{0628}\u{0628}"), "\u{FE91}\u{FE90}");
        assert_eq!(reshape("\u{0628}\u{0628}\u{0628}"), "\u{FE91}\u{FE92}\u{FE90}");
    }

    #[test]
    fn test_right_joining_breaks_the_word() {
        // alef joins to the beh before it but never to the letter after
        assert_eq!(reshape("\u{0628}\u{0627}\u{0628}"), "\u{FE91}\u{FE8E}\u{FE8F}");
        assert_eq!(reshape("\u{0627}\u{0628}"), "\u{FE8D}\u{FE8F}");
    }

    #[test]
    fn test_marks_are_transparent() {
        assert_eq!(reshape("\u{0628}\u{064E}\u{0628}"), "\u{FE91}\u{064E}\u{FE90}");
        assert_eq!(reshape("\u{0628}\u{0670}"), "\u{FE8F}\u{0670}");
    }

    #[test]
    fn test_lam_alef_ligature() {
        assert_eq!(reshape("\u{0644}\u{0627}"), "\u{FEFB}");
        assert_eq!(reshape("\u{0628}\u{0644}\u{0627}"), "\u{FE91}\u{FEFC}");
        assert_eq!(reshape("\u{0644}\u{0623}"), "\u{FEF7}");
        // marks between lam and alef follow the ligature
        assert_eq!(reshape("\u{0644}\u{064E}\u{0627}"), "\u{FEFB}\u{064E}");
        // lam before a non-alef is an ordinary letter
        assert_eq!(reshape("\u{0644}\u{0628}"), "\u{FEDF}\u{FE90}");
    }

    #[test]
    fn test_salam() {
        // seen, lam-alef, meem: the ligature does not join forward
        assert_eq!(
            reshape("\u{0633}\u{0644}\u{0627}\u{0645}"),
            "\u{FEB3}\u{FEFC}\u{FEE1}"
        );
    }

    #[test]
    fn test_tatweel_joins_both_sides() {
        assert_eq!(reshape("\u{0640}\u{0628}\u{0640}"), "\u{0640}\u{FE92}\u{0640}");
    }

    #[test]
    fn test_non_arabic_is_untouched() {
        assert_eq!(reshape("abc 123, (x)"), "abc 123, (x)");
        // a space ends the word
        assert_eq!(reshape("\u{0628} \u{0628}"), "\u{FE8F} \u{FE8F}");
    }

    #[test]
    fn test_persian_letters() {
        // peh, keheh, farsi yeh
        assert_eq!(
            reshape("\u{067E}\u{06A9}\u{06CC}"),
            "\u{FB58}\u{FB91}\u{FBFD}"
        );
    }

    #[test]
    fn test_tteh_joins_both_neighbors() {
        assert_eq!(reshape("\u{0628}\u{0679}\u{0628}"), "\u{FE91}\u{FB69}\u{FE90}");
        assert_eq!(reshape("\u{0679}\u{0628}"), "\u{FB68}\u{FE90}");
    }

    #[test]
    fn test_heh_doachashmee_takes_final_form() {
        assert_eq!(reshape("\u{0628}\u{06BE}"), "\u{FE91}\u{FBAB}");
    }

    #[test]
    fn test_urdu_word() {
        // theek: tteh, heh doachashmee, farsi yeh, keheh
        assert_eq!(
            reshape("\u{0679}\u{06BE}\u{06CC}\u{06A9}"),
            "\u{FB68}\u{FBAD}\u{FBFF}\u{FB8F}"
        );
    }

    #[test]
    fn test_extended_right_joining_letter() {
        // ddal joins back to beh but not forward
        assert_eq!(reshape("\u{0628}\u{0688}\u{0628}"), "\u{FE91}\u{FB89}\u{FE8F}");
        assert_eq!(reshape("\u{06D2}"), "\u{FBAE}");
    }

    #[test]
    fn test_letter_without_encoded_forms_keeps_neighbors_joined() {
        // beh, reh with small v (no presentation forms), beh
        assert_eq!(reshape("\u{0628}\u{0695}\u{0628}"), "\u{FE91}\u{0695}\u{FE8F}");
    }
}
