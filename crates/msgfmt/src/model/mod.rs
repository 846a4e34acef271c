//! Semantic data model.
//!
//! [`build`] converts a CST into a [`Message`] and reports structural
//! problems as [`DataModelError`]s. `Display` on [`Message`] writes it back
//! as source text.

mod builder;
mod error;
mod stringify;
mod types;
mod validate;

pub use builder::build;
pub use error::{DataModelError, DataModelErrorKind, Diagnostic};
pub use types::{
    Annotation, Declaration, Expression, FunctionAnnotation, FunctionOption, Literal, Markup,
    MarkupKind, Message, Operand, Pattern, PatternElement, PatternMessage, SelectMessage,
    UnsupportedAnnotation, UnsupportedStatement, Variant, VariableRef, VariantKey,
};
pub use validate::validate;
