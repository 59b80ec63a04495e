//! Text mode: click to open an entry, type, Return to commit.

use super::{ModeHandler, ModeResult, commit};
use crate::board::Point;
use crate::mode::{Construction, EditorMode, Key, ModeOutcome, Modifiers};
use crate::session::EditorSession;

#[derive(Debug, Clone)]
struct TextEntry {
    anchor: Point,
    buffer: String,
}

/// Text mode handler.
///
/// A click opens a text entry at the point (or moves an open one there).
/// Characters append, Backspace deletes, Return commits one text object.
/// Returning an empty entry commits nothing.
#[derive(Debug, Default)]
pub struct TextHandler {
    entry: Option<TextEntry>,
}

impl TextHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModeHandler for TextHandler {
    fn mode(&self) -> EditorMode {
        EditorMode::Text
    }

    fn click(&mut self, _session: &mut EditorSession, at: Point, _modifiers: Modifiers) -> ModeResult {
        match &mut self.entry {
            Some(entry) => entry.anchor = at,
            None => {
                self.entry = Some(TextEntry {
                    anchor: at,
                    buffer: String::new(),
                })
            }
        }
        Ok(ModeOutcome::Updated)
    }

    fn key(&mut self, session: &mut EditorSession, key: Key) -> ModeResult {
        let Some(entry) = &mut self.entry else {
            return Ok(ModeOutcome::Ignored);
        };
        match key {
            Key::Char(c) => entry.buffer.push(c),
            Key::Space => entry.buffer.push(' '),
            Key::Backspace => {
                entry.buffer.pop();
            }
            Key::Return => {
                let Some(TextEntry { anchor, buffer }) = self.entry.take() else {
                    return Ok(ModeOutcome::Ignored);
                };
                if buffer.is_empty() {
                    return Ok(ModeOutcome::Updated);
                }
                return commit(session, |s| s.create_text(anchor, &buffer).map(|r| vec![r]));
            }
            _ => return Ok(ModeOutcome::Ignored),
        }
        Ok(ModeOutcome::Updated)
    }

    fn cancel(&mut self) -> bool {
        self.entry.take().is_some()
    }

    fn construction(&self) -> Construction {
        match &self.entry {
            Some(entry) => Construction::Text {
                anchor: entry.anchor,
                text: entry.buffer.clone(),
            },
            None => Construction::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{ObjectKind, ObjectShape};

    fn type_str(handler: &mut TextHandler, session: &mut EditorSession, text: &str) {
        for c in text.chars() {
            handler.key(session, Key::Char(c)).unwrap();
        }
    }

    #[test]
    fn typing_and_return_commits_text() {
        let mut session = EditorSession::default();
        let mut handler = TextHandler::new();
        let at = Point::new(2_000_000, 2_000_000);
        handler.click(&mut session, at, Modifiers::new()).unwrap();
        type_str(&mut handler, &mut session, "R12");
        handler.key(&mut session, Key::Backspace).unwrap();
        handler.key(&mut session, Key::Char('3')).unwrap();
        assert_eq!(
            handler.construction(),
            Construction::Text {
                anchor: at,
                text: "R13".into()
            }
        );

        handler.key(&mut session, Key::Return).unwrap();
        let text = session.board.objects().next().unwrap();
        match &text.shape {
            ObjectShape::Text(data) => assert_eq!(data.text, "R13"),
            other => panic!("expected text, got {other:?}"),
        }
        assert_eq!(handler.construction(), Construction::Idle);
    }

    #[test]
    fn empty_entry_commits_nothing() {
        let mut session = EditorSession::default();
        let mut handler = TextHandler::new();
        handler
            .click(&mut session, Point::new(1_000_000, 1_000_000), Modifiers::new())
            .unwrap();
        handler.key(&mut session, Key::Return).unwrap();
        assert_eq!(session.board.count_kind(ObjectKind::Text), 0);
        assert_eq!(handler.construction(), Construction::Idle);
    }

    #[test]
    fn keys_without_entry_are_ignored() {
        let mut session = EditorSession::default();
        let mut handler = TextHandler::new();
        assert_eq!(
            handler.key(&mut session, Key::Char('x')),
            Ok(ModeOutcome::Ignored)
        );
    }
}
