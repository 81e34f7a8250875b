//! Form Field Editing
//!
//! Inserts template variables (e.g. `{{customer}}`) at the caret of whichever
//! form field is registered. The splice itself is pure; UI bindings implement
//! [`TextTarget`] to expose their element.

mod cursor;

pub use cursor::{insert_variable, splice, InsertError, Insertion, TextBuffer, TextTarget};
