//! The immutable message tree.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use bon::bon;

use crate::message::{ConfigError, ConfigValue, ParameterConfig};
use crate::types::Text;

/// A node of a compiled message.
///
/// Nodes are immutable and cheap to clone; shared children are reference
/// counted so one tree can serve any number of concurrent evaluations.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageNode {
    /// Literal text with its boundary-space flags.
    Text(Text),
    /// A reference to a named runtime value.
    Parameter(Arc<ParameterNode>),
    /// A reference to a named template.
    Template(Arc<TemplateNode>),
    /// A non-empty concatenation of nodes.
    Compound(Arc<[MessageNode]>),
}

impl MessageNode {
    /// A text node built from source, with boundary spaces moved into flags.
    pub fn text(source: &str) -> Self {
        MessageNode::Text(Text::from_source(source))
    }

    pub fn parameter(node: ParameterNode) -> Self {
        MessageNode::Parameter(Arc::new(node))
    }

    pub fn template(node: TemplateNode) -> Self {
        MessageNode::Template(Arc::new(node))
    }

    /// A compound node. Fails when `parts` is empty.
    pub fn compound(parts: Vec<MessageNode>) -> Result<Self, ConfigError> {
        if parts.is_empty() {
            return Err(ConfigError::EmptyCompound);
        }
        Ok(MessageNode::Compound(parts.into()))
    }

    /// Whether a space is requested before this node.
    pub fn space_before(&self) -> bool {
        match self {
            MessageNode::Text(text) => text.space_before(),
            MessageNode::Parameter(parameter) => parameter.space_before,
            MessageNode::Template(template) => template.space_before,
            MessageNode::Compound(parts) => parts.first().is_some_and(MessageNode::space_before),
        }
    }

    /// Whether a space is requested after this node.
    pub fn space_after(&self) -> bool {
        match self {
            MessageNode::Text(text) => text.space_after(),
            MessageNode::Parameter(parameter) => parameter.space_after,
            MessageNode::Template(template) => template.space_after,
            MessageNode::Compound(parts) => parts.last().is_some_and(MessageNode::space_after),
        }
    }

    /// Names of parameters referenced directly by this tree.
    pub fn parameter_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_parameter_names(&mut names);
        names
    }

    fn collect_parameter_names(&self, names: &mut BTreeSet<String>) {
        match self {
            MessageNode::Parameter(parameter) => {
                names.insert(parameter.name.clone());
            }
            MessageNode::Compound(parts) => {
                for part in parts.iter() {
                    part.collect_parameter_names(names);
                }
            }
            MessageNode::Text(_) | MessageNode::Template(_) => {}
        }
    }

    /// Names of templates referenced by this tree, including references
    /// inside parameter configurations and template defaults.
    pub fn template_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_template_names(&mut names);
        names
    }

    pub(crate) fn collect_template_names(&self, names: &mut BTreeSet<String>) {
        match self {
            MessageNode::Text(_) => {}
            MessageNode::Parameter(parameter) => parameter.config.collect_template_names(names),
            MessageNode::Template(template) => {
                names.insert(template.name.clone());
                for value in template.default_parameters.values() {
                    value.collect_template_names(names);
                }
            }
            MessageNode::Compound(parts) => {
                for part in parts.iter() {
                    part.collect_template_names(names);
                }
            }
        }
    }
}

impl From<Text> for MessageNode {
    fn from(text: Text) -> Self {
        MessageNode::Text(text)
    }
}

/// A reference to a named runtime value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterNode {
    name: String,
    format: Option<String>,
    config: ParameterConfig,
    space_before: bool,
    space_after: bool,
}

impl ParameterNode {
    /// Create a parameter node.
    ///
    /// An empty `format` is treated as no format.
    pub fn new(
        name: impl Into<String>,
        format: Option<String>,
        config: ParameterConfig,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::EmptyParameterName);
        }
        Ok(ParameterNode {
            name,
            format: format.filter(|format| !format.is_empty()),
            config,
            space_before: false,
            space_after: false,
        })
    }

    /// Set the boundary-space flags.
    #[must_use]
    pub fn with_spaces(mut self, space_before: bool, space_after: bool) -> Self {
        self.space_before = space_before;
        self.space_after = space_after;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The explicit formatter name, if any.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn config(&self) -> &ParameterConfig {
        &self.config
    }

    pub fn space_before(&self) -> bool {
        self.space_before
    }

    pub fn space_after(&self) -> bool {
        self.space_after
    }
}

/// A reference to a named template.
///
/// Default parameters supply values the caller did not pass; delegates
/// rename parameters so that the template's `name` reads the caller's
/// `delegates[name]`.
///
/// # Example
///
/// ```
/// use msgfmt::{ConfigValue, TemplateNode};
///
/// let node = TemplateNode::builder()
///     .name("signature")
///     .default_parameters([("team".to_string(), ConfigValue::from("Support"))].into())
///     .space_before(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(node.name(), "signature");
/// assert!(node.space_before());
/// assert!(TemplateNode::named("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateNode {
    name: String,
    space_before: bool,
    space_after: bool,
    /// Values used when the caller does not supply a parameter.
    default_parameters: BTreeMap<String, ConfigValue>,
    /// Template parameter name -> caller parameter name.
    parameter_delegates: BTreeMap<String, String>,
}

#[bon]
impl TemplateNode {
    /// Create a template reference. The name must not be empty.
    #[builder(on(String, into))]
    pub fn new(
        name: String,
        #[builder(default)] space_before: bool,
        #[builder(default)] space_after: bool,
        #[builder(default)] default_parameters: BTreeMap<String, ConfigValue>,
        #[builder(default)] parameter_delegates: BTreeMap<String, String>,
    ) -> Result<Self, ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::EmptyTemplateName);
        }
        Ok(TemplateNode {
            name,
            space_before,
            space_after,
            default_parameters,
            parameter_delegates,
        })
    }

    /// A plain template reference without defaults or delegates.
    pub fn named(name: impl Into<String>) -> Result<Self, ConfigError> {
        TemplateNode::builder().name(name.into()).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn space_before(&self) -> bool {
        self.space_before
    }

    pub fn space_after(&self) -> bool {
        self.space_after
    }

    pub fn default_parameters(&self) -> &BTreeMap<String, ConfigValue> {
        &self.default_parameters
    }

    pub fn parameter_delegates(&self) -> &BTreeMap<String, String> {
        &self.parameter_delegates
    }
}
