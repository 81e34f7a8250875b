//! Caret-position insertion.
//!
//! Positions are character indices, not byte offsets.

use thiserror::Error;

/// A text-entry element whose content and selection can be read and written.
pub trait TextTarget {
    /// Current content
    fn text(&self) -> String;

    /// Current selection as `(start, end)`; equal values mean a bare caret
    fn selection(&self) -> (usize, usize);

    fn set_text(&mut self, text: String);

    fn set_selection(&mut self, start: usize, end: usize);

    /// Give the element input focus
    fn focus(&mut self);
}

/// Result of splicing a string into a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    /// New field content
    pub text: String,
    /// Caret position after the inserted string
    pub caret: usize,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InsertError {
    #[error("No text field is registered for insertion")]
    NoTarget,
}

/// Replace the `start..end` selection of `text` with `variable`.
///
/// Reversed selections are normalised and positions past the end are clamped.
pub fn splice(text: &str, start: usize, end: usize, variable: &str) -> Insertion {
    let len = text.chars().count();
    let (start, end) = (start.min(end).min(len), start.max(end).min(len));

    let before: String = text.chars().take(start).collect();
    let after: String = text.chars().skip(end).collect();

    Insertion {
        text: format!("{}{}{}", before, variable, after),
        caret: start + variable.chars().count(),
    }
}

/// Insert `variable` at the caret of `input`, or of `textarea` when no input
/// is registered.
///
/// `on_change` receives the new content the same way a keystroke would
/// report it, so bound state stays in sync with the element.
pub fn insert_variable<'a, F>(
    input: Option<&'a mut dyn TextTarget>,
    textarea: Option<&'a mut dyn TextTarget>,
    variable: &str,
    on_change: F,
) -> Result<Insertion, InsertError>
where
    F: FnOnce(&str),
{
    let target = input.or(textarea).ok_or(InsertError::NoTarget)?;

    let (start, end) = target.selection();
    let insertion = splice(&target.text(), start, end, variable);

    target.set_text(insertion.text.clone());
    target.set_selection(insertion.caret, insertion.caret);
    on_change(&insertion.text);
    target.focus();

    tracing::debug!(caret = insertion.caret, "Inserted variable {:?}", variable);

    Ok(insertion)
}

/// In-memory [`TextTarget`] for terminal forms and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    selection: (usize, usize),
    focused: bool,
}

impl TextBuffer {
    /// Buffer with the caret at the end of `text`
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.chars().count();
        Self {
            text,
            selection: (end, end),
            focused: false,
        }
    }

    /// Builder: place the caret at `pos`
    pub fn caret(self, pos: usize) -> Self {
        self.select(pos, pos)
    }

    /// Builder: select `start..end`
    pub fn select(mut self, start: usize, end: usize) -> Self {
        self.selection = (start, end);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }
}

impl TextTarget for TextBuffer {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn selection(&self) -> (usize, usize) {
        self.selection
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        self.selection = (start, end);
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_at_caret() {
        let result = splice("hello", 2, 2, "X");
        assert_eq!(result.text, "heXllo");
        assert_eq!(result.caret, 3);
    }

    #[test]
    fn test_splice_replaces_selection() {
        let result = splice("Dear NAME,", 5, 9, "{{name}}");
        assert_eq!(result.text, "Dear {{name}},");
        assert_eq!(result.caret, 13);
    }

    #[test]
    fn test_splice_clamps_and_normalises() {
        assert_eq!(splice("abc", 10, 10, "!").text, "abc!");
        assert_eq!(splice("abcdef", 4, 1, "-").text, "a-ef");
        assert_eq!(splice("", 0, 0, "x").caret, 1);
    }

    #[test]
    fn test_splice_counts_characters() {
        let result = splice("héllo", 2, 2, "ü");
        assert_eq!(result.text, "héüllo");
        assert_eq!(result.caret, 3);
    }

    #[test]
    fn test_insert_into_input() {
        let mut input = TextBuffer::new("hello").caret(2);
        let mut reported = String::new();

        let result = insert_variable(Some(&mut input), None, "X", |text| {
            reported = text.to_string();
        })
        .unwrap();

        assert_eq!(result.caret, 3);
        assert_eq!(input.as_str(), "heXllo");
        assert_eq!(input.selection(), (3, 3));
        assert!(input.is_focused());
        assert_eq!(reported, "heXllo");
    }

    #[test]
    fn test_input_takes_priority() {
        let mut input = TextBuffer::new("subject");
        let mut textarea = TextBuffer::new("body");

        insert_variable(Some(&mut input), Some(&mut textarea), "!", |_| {}).unwrap();

        assert_eq!(input.as_str(), "subject!");
        assert_eq!(textarea.as_str(), "body");
        assert!(!textarea.is_focused());
    }

    #[test]
    fn test_falls_back_to_textarea() {
        let mut textarea = TextBuffer::new("Hi ,").caret(3);

        insert_variable(None, Some(&mut textarea), "{{name}}", |_| {}).unwrap();

        assert_eq!(textarea.as_str(), "Hi {{name}},");
        assert_eq!(textarea.selection(), (11, 11));
    }

    #[test]
    fn test_no_target() {
        let mut called = false;
        let result = insert_variable(None, None, "x", |_| called = true);

        assert_eq!(result, Err(InsertError::NoTarget));
        assert!(!called);
    }
}
