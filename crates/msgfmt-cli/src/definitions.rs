//! JSON message definitions, the source format of `msgfmt pack`.
//!
//! ```json
//! {
//!   "defaults": { "list-sep": ", " },
//!   "templates": { "sig": { "kind": "text", "text": "-- the team" } },
//!   "messages": [
//!     { "code": "files", "node": {
//!         "kind": "parameter", "name": "n",
//!         "choices": [ { "key": { "type": "number", "value": 1 }, "value": "one file" } ],
//!         "default": { "kind": "compound", "parts": [
//!           { "kind": "parameter", "name": "n" }, { "kind": "text", "text": " files" } ] } } },
//!     { "code": "hello", "locales": {
//!         "und": { "kind": "text", "text": "Hello" },
//!         "de": { "kind": "text", "text": "Hallo" } } }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use msgfmt::{
    CompareType, ConfigKey, ConfigValue, Locale, Message, MessageNode,
    MessageSupport, ParameterConfig, ParameterNode, SupportError, TemplateNode, Text,
};
use serde::Deserialize;

/// A complete definitions file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Definitions {
    #[serde(default)]
    pub defaults: BTreeMap<String, ValueDef>,
    #[serde(default)]
    pub templates: BTreeMap<String, NodeDef>,
    #[serde(default)]
    pub messages: Vec<MessageDef>,
}

#[derive(Debug, Deserialize)]
pub struct MessageDef {
    pub code: String,
    #[serde(flatten)]
    pub body: BodyDef,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BodyDef {
    Single { node: NodeDef },
    Bundle { locales: BTreeMap<String, NodeDef> },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum NodeDef {
    Text {
        text: String,
    },
    Parameter {
        name: String,
        #[serde(default)]
        format: Option<String>,
        #[serde(default)]
        options: BTreeMap<String, ValueDef>,
        #[serde(default)]
        choices: Vec<ChoiceDef>,
        #[serde(default)]
        default: Option<ValueDef>,
        #[serde(default)]
        space_before: bool,
        #[serde(default)]
        space_after: bool,
    },
    Template {
        name: String,
        #[serde(default)]
        defaults: BTreeMap<String, ValueDef>,
        #[serde(default)]
        delegates: BTreeMap<String, String>,
        #[serde(default)]
        space_before: bool,
        #[serde(default)]
        space_after: bool,
    },
    Compound {
        parts: Vec<NodeDef>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChoiceDef {
    pub key: KeyDef,
    pub value: ValueDef,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum KeyDef {
    Null {
        #[serde(default)]
        compare: CompareDef,
    },
    Empty {
        #[serde(default)]
        compare: CompareDef,
    },
    Bool {
        #[serde(default)]
        compare: CompareDef,
        value: bool,
    },
    Number {
        #[serde(default)]
        compare: CompareDef,
        value: i64,
    },
    String {
        #[serde(default)]
        compare: CompareDef,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub enum CompareDef {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[default]
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<>")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
}

/// A configured value; objects are message trees.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ValueDef {
    Bool(bool),
    Number(i64),
    String(String),
    Message(Box<NodeDef>),
}

impl Definitions {
    /// Build a support holding every defined message and template.
    pub fn into_support(self) -> Result<MessageSupport, SupportError> {
        let mut support = MessageSupport::new();
        support.set_default_parameter_config(build_values(self.defaults)?)?;
        for (name, node) in self.templates {
            support.add_template(name, Message::new(node.build()?))?;
        }
        for message in self.messages {
            support.add_message(message.build()?)?;
        }
        Ok(support)
    }
}

impl MessageDef {
    fn build(self) -> Result<Message, SupportError> {
        match self.body {
            BodyDef::Single { node } => Ok(Message::with_code(self.code, node.build()?)?),
            BodyDef::Bundle { locales } => {
                let mut built = BTreeMap::new();
                for (tag, node) in locales {
                    built.insert(Locale::parse(&tag)?, node.build()?);
                }
                Ok(Message::bundle(Some(self.code), built)?)
            }
        }
    }
}

impl NodeDef {
    fn build(self) -> Result<MessageNode, SupportError> {
        Ok(match self {
            NodeDef::Text { text } => MessageNode::Text(Text::from_source(&text)),
            NodeDef::Parameter {
                name,
                format,
                options,
                choices,
                default,
                space_before,
                space_after,
            } => {
                let choices = choices
                    .into_iter()
                    .map(|choice| Ok((choice.key.build()?, choice.value.build()?)))
                    .collect::<Result<Vec<_>, SupportError>>()?;
                let default = default.map(ValueDef::build).transpose()?;
                let config = ParameterConfig::with_parts(build_values(options)?, choices, default)?;
                MessageNode::parameter(
                    ParameterNode::new(name, format, config)?.with_spaces(space_before, space_after),
                )
            }
            NodeDef::Template {
                name,
                defaults,
                delegates,
                space_before,
                space_after,
            } => {
                MessageNode::template(
                    TemplateNode::builder()
                        .name(name)
                        .default_parameters(build_values(defaults)?)
                        .parameter_delegates(delegates)
                        .space_before(space_before)
                        .space_after(space_after)
                        .build()?,
                )
            }
            NodeDef::Compound { parts } => {
                let parts = parts
                    .into_iter()
                    .map(NodeDef::build)
                    .collect::<Result<Vec<_>, _>>()?;
                MessageNode::compound(parts)?
            }
        })
    }
}

impl KeyDef {
    fn build(self) -> Result<ConfigKey, SupportError> {
        Ok(match self {
            KeyDef::Null { compare } => ConfigKey::null(compare.into())?,
            KeyDef::Empty { compare } => ConfigKey::empty(compare.into())?,
            KeyDef::Bool { compare, value } => ConfigKey::bool(compare.into(), value)?,
            KeyDef::Number { compare, value } => ConfigKey::number(compare.into(), value),
            KeyDef::String { compare, value } => ConfigKey::string(compare.into(), value),
        })
    }
}

impl ValueDef {
    fn build(self) -> Result<ConfigValue, SupportError> {
        Ok(match self {
            ValueDef::Bool(b) => ConfigValue::Bool(b),
            ValueDef::Number(n) => ConfigValue::Number(n),
            ValueDef::String(s) => ConfigValue::String(s),
            ValueDef::Message(node) => ConfigValue::Message(Message::new(node.build()?)),
        })
    }
}

impl From<CompareDef> for CompareType {
    fn from(compare: CompareDef) -> Self {
        match compare {
            CompareDef::Lt => CompareType::Lt,
            CompareDef::Le => CompareType::Le,
            CompareDef::Eq => CompareType::Eq,
            CompareDef::Ne => CompareType::Ne,
            CompareDef::Gt => CompareType::Gt,
            CompareDef::Ge => CompareType::Ge,
        }
    }
}

fn build_values(
    values: BTreeMap<String, ValueDef>,
) -> Result<BTreeMap<String, ConfigValue>, SupportError> {
    values
        .into_iter()
        .map(|(name, value)| Ok((name, value.build()?)))
        .collect()
}
