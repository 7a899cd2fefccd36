use std::collections::{BTreeMap, BTreeSet};

use crate::message::{ConfigError, MessageNode};
use crate::types::Locale;

/// The content of a [`Message`].
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    /// A single message tree.
    Node(MessageNode),
    /// Locale-specific trees, selected by best locale match.
    Bundle(BTreeMap<Locale, MessageNode>),
}

/// A compiled message, optionally identified by a code.
///
/// `==` compares code and content structurally; [`Message::is_same`] is
/// the identity check used when registering messages.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use msgfmt::{Locale, Message, MessageNode};
///
/// let mut locales = BTreeMap::new();
/// locales.insert(Locale::root(), MessageNode::text("Hello"));
/// locales.insert(Locale::parse("de").unwrap(), MessageNode::text("Hallo"));
///
/// let message = Message::bundle(Some("greeting".to_string()), locales).unwrap();
/// let german = message.localized(&Locale::parse("de-AT").unwrap()).unwrap();
/// assert_eq!(german, &MessageNode::text("Hallo"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    code: Option<String>,
    body: MessageBody,
}

impl Message {
    /// An anonymous message.
    pub fn new(node: MessageNode) -> Self {
        Message {
            code: None,
            body: MessageBody::Node(node),
        }
    }

    /// A message identified by `code`. The code must not be empty.
    pub fn with_code(code: impl Into<String>, node: MessageNode) -> Result<Self, ConfigError> {
        let code = code.into();
        if code.is_empty() {
            return Err(ConfigError::EmptyCode);
        }
        Ok(Message {
            code: Some(code),
            body: MessageBody::Node(node),
        })
    }

    /// A locale bundle. Fails when `locales` is empty or `code` is empty.
    pub fn bundle(
        code: Option<String>,
        locales: BTreeMap<Locale, MessageNode>,
    ) -> Result<Self, ConfigError> {
        if code.as_deref() == Some("") {
            return Err(ConfigError::EmptyCode);
        }
        if locales.is_empty() {
            return Err(ConfigError::EmptyBundle { code });
        }
        Ok(Message {
            code,
            body: MessageBody::Bundle(locales),
        })
    }

    /// The message code, if any.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn body(&self) -> &MessageBody {
        &self.body
    }

    /// The locales of a bundle; empty for a single-tree message.
    pub fn locales(&self) -> Vec<&Locale> {
        match &self.body {
            MessageBody::Node(_) => Vec::new(),
            MessageBody::Bundle(locales) => locales.keys().collect(),
        }
    }

    /// The tree to evaluate for `locale`.
    ///
    /// Returns `None` only for a bundle without locales, which cannot be
    /// built through the public constructors.
    pub fn localized(&self, locale: &Locale) -> Option<&MessageNode> {
        match &self.body {
            MessageBody::Node(node) => Some(node),
            MessageBody::Bundle(locales) => Locale::select(locale, locales).map(|(_, node)| node),
        }
    }

    /// Whether `other` denotes the same message.
    ///
    /// When both messages carry a code the codes decide; otherwise the
    /// content is compared.
    pub fn is_same(&self, other: &Message) -> bool {
        match (&self.code, &other.code) {
            (Some(a), Some(b)) => a == b,
            _ => self.body == other.body,
        }
    }

    /// Names of all templates referenced anywhere in this message.
    pub fn template_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_template_names(&mut names);
        names
    }

    /// Names of all parameters referenced directly by this message.
    pub fn parameter_names(&self) -> BTreeSet<String> {
        match &self.body {
            MessageBody::Node(node) => node.parameter_names(),
            MessageBody::Bundle(locales) => locales
                .values()
                .flat_map(MessageNode::parameter_names)
                .collect(),
        }
    }

    pub(crate) fn collect_template_names(&self, names: &mut BTreeSet<String>) {
        match &self.body {
            MessageBody::Node(node) => node.collect_template_names(names),
            MessageBody::Bundle(locales) => {
                for node in locales.values() {
                    node.collect_template_names(names);
                }
            }
        }
    }
}

impl From<MessageNode> for Message {
    fn from(node: MessageNode) -> Self {
        Message::new(node)
    }
}
