//! # Fields
//!
//! Field declarations: kind, options and the validators derived from them.
//!
//! A field is built once and never mutated afterwards. Construction fails
//! fast on malformed declarations with a `FieldError`.

mod definition;
mod errors;
mod field;
mod kind;
pub mod options;

pub use definition::FieldDef;
pub use errors::{FieldError, FieldResult};
pub use field::Field;
pub use kind::{FieldKind, EMAIL_PATTERN, URL_PATTERN};
pub use options::FieldOptions;
