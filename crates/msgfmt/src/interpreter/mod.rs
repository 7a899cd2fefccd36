//! Evaluation of message trees.
//!
//! The interpreter walks a [`MessageNode`](crate::MessageNode) tree,
//! resolving formatters for parameter values, selecting configured choices
//! and joining the parts with the compound spacing rule.

mod context;
mod error;
mod evaluator;
mod matching;

pub use context::{
    DEFAULT_MAX_DEPTH, EvalContext, MessageAccessor, NoParameters, NoTemplates, ParameterLookup,
    TemplateStore,
};
pub use error::FormatError;
pub use evaluator::{evaluate, evaluate_message, format_message};
pub use matching::{best_match, match_key};
