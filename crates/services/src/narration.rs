//! One-way speech capability used to read problems aloud.

/// Message shown once when the host cannot speak.
pub const NARRATION_UNAVAILABLE_NOTICE: &str =
    "⚠️ Speech synthesis is not available. Math problems will not be read aloud.";

/// Something that can say a line of text.
///
/// `speak` should cut off any utterance still in progress before starting.
pub trait Narrator: Send + Sync {
    fn is_available(&self) -> bool;

    fn speak(&self, text: &str);
}

/// Narrator for hosts without speech output.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableNarrator;

impl Narrator for UnavailableNarrator {
    fn is_available(&self) -> bool {
        false
    }

    fn speak(&self, _text: &str) {}
}
