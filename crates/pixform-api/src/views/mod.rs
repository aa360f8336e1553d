//! HTML rendering
//!
//! Server-side maud templates. Every piece of user-derived text goes through
//! maud's escaping; nothing is spliced in raw except the stylesheet.

mod layout;
mod pages;

pub use pages::{about_page, edit_page};
