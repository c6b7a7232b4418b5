//! Text rendering: placeholder substitution and the `&`-code style language.

mod context;
mod placeholder;
mod style;

pub use context::ClientContext;
pub use placeholder::substitute;
pub use style::{Span, parse_spans};
