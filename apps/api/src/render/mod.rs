//! Template merge engine.
//!
//! Rendering is a pure function of template and data: `Template::parse` turns the
//! text into a node tree once, and `Template::render` evaluates it against `data`
//! through a chain of scopes. Neither step fails; malformed markers and over-deep
//! nesting degrade to literal text.
//!
//! Resolution follows the order templates are authored against: iteration blocks,
//! conditional blocks, the `{{{skills}}}` expansion, then scalar placeholders.
//! Placeholders with no scalar value in scope render as the empty string.

mod evaluator;
pub mod handlers;
mod parser;
pub mod plain_text;
mod scope;
pub mod skills;

pub use parser::Template;
pub use plain_text::to_plain_text;
