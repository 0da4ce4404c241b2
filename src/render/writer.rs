//! Style-preserving text replacement
//!
//! Template slots arrive with authored formatting on their prompt text.
//! Replacing the text must not flatten that formatting, so the first run's
//! font attributes are captured before the frame is cleared and reapplied to
//! the single new run. Attributes the template never set stay unset.

use crate::document::{Paragraph, Run, TextFrame};

/// Replace a frame's text while keeping the template-authored run style
pub fn write_text(frame: &mut TextFrame, new_text: &str) {
    let captured = match frame.first_run() {
        Some(run) => run.font.clone(),
        None => {
            // Nothing to preserve
            *frame = TextFrame::plain(new_text);
            return;
        }
    };

    frame.clear();
    frame.paragraphs.push(Paragraph {
        runs: vec![Run {
            text: new_text.to_string(),
            font: captured,
        }],
    });
}
