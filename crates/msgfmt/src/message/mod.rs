//! The compiled message model.
//!
//! Messages are trees of text, parameter and template nodes, built once
//! and shared immutably. Parameters carry a [`ParameterConfig`] whose
//! typed [`ConfigKey`]s select alternative outputs based on the value.

mod compiled;
mod config;
mod error;
mod node;

pub use compiled::{Message, MessageBody};
pub use config::{
    CompareType, ConfigKey, ConfigValue, KeyType, KeyTypes, MatchResult, ParameterConfig,
};
pub use error::ConfigError;
pub use node::{MessageNode, ParameterNode, TemplateNode};
