//! HTML Sanitizer
//!
//! Converts rich-text form input into plain text for contexts where markup
//! is not wanted (relayed emails, log previews).
//!
//! - [`html_to_plain_text`]: parses the markup and keeps rendered text only
//! - [`strip_html_tags`]: textual tag removal that keeps line structure

mod html;

pub use html::{html_to_plain_text, preview, strip_html_tags};
