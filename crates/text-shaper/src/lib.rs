//! Arabic text prepared for renderers without a shaping engine.
//!
//! [`shape`] turns logical-order text into display-order text whose Arabic
//! letters are already in their joined presentation forms, so that drawing
//! the characters one after another from left to right gives a correct
//! picture. The result is for display only; shaping it again does not give
//! back the original text.
//!
//! ```
//! use duofont_text_shaper::shape;
//!
//! // seen, lam-alef ligature, meem
//! assert_eq!(shape("\u{0633}\u{0644}\u{0627}\u{0645}"), "\u{FEE1}\u{FEFC}\u{FEB3}");
//! assert_eq!(shape("Hello"), "Hello");
//! ```

mod joining;
mod reorder;
mod reshape;

pub use joining::{ArabicForm, JoiningType, joining_type, presentation_form};
pub use reorder::{mirrored, reorder};
pub use reshape::reshape;

/// [`reshape`] then [`reorder`].
pub fn shape(text: &str) -> String {
    reorder(&reshape(text))
}
