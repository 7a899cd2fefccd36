//! Evaluation state and the collaborators consulted while evaluating.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::formatter::FormatterRegistry;
use crate::interpreter::FormatError;
use crate::message::{ConfigValue, Message, ParameterConfig, TemplateNode};
use crate::types::{Locale, Value};

/// Default limit for nested template references.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Read-only access to the runtime values of a formatting call.
///
/// Names are case-sensitive. A missing name is an absent value, not an
/// error.
pub trait ParameterLookup {
    fn parameter(&self, name: &str) -> Option<Cow<'_, Value>>;
}

impl<S: BuildHasher> ParameterLookup for HashMap<String, Value, S> {
    fn parameter(&self, name: &str) -> Option<Cow<'_, Value>> {
        self.get(name).map(Cow::Borrowed)
    }
}

impl ParameterLookup for BTreeMap<String, Value> {
    fn parameter(&self, name: &str) -> Option<Cow<'_, Value>> {
        self.get(name).map(Cow::Borrowed)
    }
}

/// A lookup without any parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoParameters;

impl ParameterLookup for NoParameters {
    fn parameter(&self, _name: &str) -> Option<Cow<'_, Value>> {
        None
    }
}

/// Templates by name.
pub trait TemplateStore {
    fn template(&self, name: &str) -> Option<&Message>;
}

impl<S: BuildHasher> TemplateStore for HashMap<String, Message, S> {
    fn template(&self, name: &str) -> Option<&Message> {
        self.get(name)
    }
}

impl TemplateStore for BTreeMap<String, Message> {
    fn template(&self, name: &str) -> Option<&Message> {
        self.get(name)
    }
}

/// A store without any templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTemplates;

impl TemplateStore for NoTemplates {
    fn template(&self, _name: &str) -> Option<&Message> {
        None
    }
}

/// The shared, immutable collaborators of an evaluation.
#[derive(Clone, Copy)]
pub struct MessageAccessor<'a> {
    formatters: &'a FormatterRegistry,
    templates: &'a dyn TemplateStore,
    default_config: &'a ParameterConfig,
}

impl<'a> MessageAccessor<'a> {
    pub fn new(
        formatters: &'a FormatterRegistry,
        templates: &'a dyn TemplateStore,
        default_config: &'a ParameterConfig,
    ) -> Self {
        MessageAccessor {
            formatters,
            templates,
            default_config,
        }
    }

    pub fn formatters(&self) -> &'a FormatterRegistry {
        self.formatters
    }

    pub fn template(&self, name: &str) -> Option<&'a Message> {
        self.templates.template(name)
    }

    /// Options applied to parameters that do not set them.
    pub fn default_config(&self) -> &'a ParameterConfig {
        self.default_config
    }
}

/// Per-call evaluation state.
///
/// The context tracks:
/// - The accessor and locale of the call
/// - The stack of templates being evaluated, for cycle detection
/// - The nesting depth, limited to `max_depth`
pub struct EvalContext<'a> {
    accessor: MessageAccessor<'a>,
    locale: &'a Locale,
    call_stack: Vec<String>,
    depth: usize,
    max_depth: usize,
}

impl<'a> EvalContext<'a> {
    pub fn new(accessor: MessageAccessor<'a>, locale: &'a Locale) -> Self {
        Self::with_max_depth(accessor, locale, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(accessor: MessageAccessor<'a>, locale: &'a Locale, max_depth: usize) -> Self {
        EvalContext {
            accessor,
            locale,
            call_stack: Vec::new(),
            depth: 0,
            max_depth,
        }
    }

    pub fn accessor(&self) -> MessageAccessor<'a> {
        self.accessor
    }

    pub fn locale(&self) -> &'a Locale {
        self.locale
    }

    /// Check if a template is currently being evaluated.
    pub fn is_in_call_stack(&self, name: &str) -> bool {
        self.call_stack.iter().any(|n| n == name)
    }

    /// Enter a template.
    ///
    /// Fails when the template is already on the stack or the depth limit
    /// is reached.
    pub fn push_call(&mut self, name: &str) -> Result<(), FormatError> {
        if self.depth >= self.max_depth {
            return Err(FormatError::MaxDepthExceeded {
                max_depth: self.max_depth,
            });
        }
        if self.is_in_call_stack(name) {
            let mut chain = self.call_stack.clone();
            chain.push(name.to_string());
            return Err(FormatError::CyclicTemplate { chain });
        }
        self.call_stack.push(name.to_string());
        self.depth += 1;
        Ok(())
    }

    /// Leave the innermost template.
    pub fn pop_call(&mut self) {
        self.call_stack.pop();
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn call_stack(&self) -> &[String] {
        &self.call_stack
    }
}

/// The parameters seen inside a template: delegated names first, then the
/// caller's parameters, then the template's defaults.
///
/// Message-valued defaults the caller does not supply are evaluated up
/// front and passed in as `rendered`.
pub(crate) struct TemplateParameters<'p> {
    outer: &'p dyn ParameterLookup,
    template: &'p TemplateNode,
    rendered: BTreeMap<String, Value>,
}

impl<'p> TemplateParameters<'p> {
    pub(crate) fn new(
        outer: &'p dyn ParameterLookup,
        template: &'p TemplateNode,
        rendered: BTreeMap<String, Value>,
    ) -> Self {
        TemplateParameters {
            outer,
            template,
            rendered,
        }
    }
}

impl ParameterLookup for TemplateParameters<'_> {
    fn parameter(&self, name: &str) -> Option<Cow<'_, Value>> {
        let outer_name = self
            .template
            .parameter_delegates()
            .get(name)
            .map_or(name, String::as_str);

        self.outer.parameter(outer_name).or_else(|| {
            match self.template.default_parameters().get(name)? {
                ConfigValue::Bool(b) => Some(Cow::Owned(Value::Bool(*b))),
                ConfigValue::Number(n) => Some(Cow::Owned(Value::Integer(*n))),
                ConfigValue::String(s) => Some(Cow::Owned(Value::String(s.clone()))),
                ConfigValue::Message(_) => self.rendered.get(name).map(Cow::Borrowed),
            }
        })
    }
}
