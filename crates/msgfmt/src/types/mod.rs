//! Core value types: runtime values, type descriptors, locales and text.

mod locale;
mod text;
mod value;
mod value_type;

pub use locale::Locale;
pub use text::{Text, is_space_char, is_trimmed_empty, trim_spaces};
pub use value::{CustomValue, Value};
pub use value_type::{TypeHierarchy, ValueType};
