pub mod interpreter;
pub mod model;
pub mod parser;
pub mod types;

mod format;

pub use format::MessageFormat;
pub use interpreter::{
    FunctionContext, FunctionError, FunctionOptions, FunctionRegistry, MessageError, Scope,
    compute_suggestions,
};
pub use model::{DataModelError, Diagnostic, Message};
pub use parser::{Span, SyntaxError};
pub use types::{MessagePart, MessageValue, StringValue, Value};

/// Parse message source into a data model.
///
/// Parsing never fails. Syntax errors are listed first, followed by
/// data-model errors; broken pieces of the message are kept in the model
/// as unsupported expressions so that formatting can still produce output.
///
/// # Example
///
/// ```
/// use msgfmt::parse;
///
/// let (message, diagnostics) = parse("Hello {$name");
/// assert_eq!(diagnostics.len(), 1);
/// assert_eq!(diagnostics[0].kind(), "missing-syntax");
/// assert_eq!(message.declarations().len(), 0);
/// ```
pub fn parse(source: &str) -> (Message, Vec<Diagnostic>) {
    let cst = parser::parse_cst(source);
    let (message, model_errors) = model::build(&cst);
    let diagnostics: Vec<Diagnostic> = cst
        .errors
        .iter()
        .cloned()
        .map(Diagnostic::from)
        .chain(model_errors.into_iter().map(Diagnostic::from))
        .collect();
    tracing::debug!(diagnostics = diagnostics.len(), "built message");
    (message, diagnostics)
}

/// Creates a [`Scope`] from key-value pairs.
///
/// Values are automatically converted via `Into<Value>`, so you can pass
/// integers, floats, strings, booleans, or nested maps directly.
///
/// # Example
///
/// ```
/// use msgfmt::{params, Value};
///
/// let p = params! { "count" => 3, "name" => "Alice" };
/// assert_eq!(p.len(), 2);
/// assert_eq!(p["count"].as_number(), Some(3));
/// assert_eq!(p["name"].as_string(), Some("Alice"));
/// ```
#[macro_export]
macro_rules! params {
    {} => {
        $crate::Scope::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = $crate::Scope::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
