//! Word-by-word reveal of assistant replies.
//!
//! [`TypingFrames`] is a plain iterator over cumulative prefixes of a text, one frame
//! per whitespace-delimited word. [`typing_stream`] paces those frames with a fixed
//! delay and stops as soon as its [`CancellationToken`] fires.

use futures::Stream;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_TYPING_DELAY: Duration = Duration::from_millis(50);

/// Cumulative reveal frames. Consumed by value, so a finished animation cannot be replayed.
#[derive(Debug)]
pub struct TypingFrames {
    text: String,
    cursor: usize,
    emitted: bool,
}

impl TypingFrames {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
            emitted: false,
        }
    }

    fn skip_class(&self, from: usize, whitespace: bool) -> usize {
        self.text[from..]
            .char_indices()
            .find(|(_, c)| c.is_whitespace() != whitespace)
            .map(|(i, _)| from + i)
            .unwrap_or(self.text.len())
    }
}

impl Iterator for TypingFrames {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.cursor >= self.text.len() {
            // Text without any words still gets shown once.
            if !self.emitted {
                self.emitted = true;
                return Some(self.text.clone());
            }
            return None;
        }
        let word_start = self.skip_class(self.cursor, true);
        let mut end = self.skip_class(word_start, false);
        if self.skip_class(end, true) == self.text.len() {
            end = self.text.len();
        }
        self.cursor = end;
        self.emitted = true;
        Some(self.text[..end].to_string())
    }
}

/// Paces [`TypingFrames`] with `delay` between frames. The first frame is immediate.
/// Cancelling `cancel` ends the stream before the next frame.
pub fn typing_stream(
    text: impl Into<String>,
    delay: Duration,
    cancel: CancellationToken,
) -> impl Stream<Item = String> {
    let frames = TypingFrames::new(text);
    futures::stream::unfold((frames, true), move |(mut frames, first)| {
        let cancel = cancel.clone();
        async move {
            if cancel.is_cancelled() {
                return None;
            }
            if !first {
                tokio::select! {
                    _ = cancel.cancelled() => return None,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            let frame = frames.next()?;
            Some((frame, (frames, false)))
        }
    })
}
