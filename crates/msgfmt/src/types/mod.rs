//! Input and output value types.

mod message_value;
mod part;
mod value;

pub use message_value::{
    DateTimeOptions, DateTimeStyle, DateTimeValue, FallbackValue, Grouping, MarkupValue,
    MessageValue, Number, NumberOptions, NumberSelect, NumberStyle, NumberValue, StringValue,
    UnknownValue,
};
pub use part::MessagePart;
pub use value::Value;
