//! Shared building blocks of the projections schema tools.
//!
//! - `span`: byte ranges into a schema file
//! - `text`: interned type, field and directive names
//! - `diagnostics`: syntax errors collected while parsing

pub mod diagnostics;
pub mod span;
pub mod text;

pub use diagnostics::{Code, Diagnostic, DiagnosticBag};
pub use span::Span;
pub use text::{Interner, Text};
