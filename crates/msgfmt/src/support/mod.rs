//! The message support facade.
//!
//! [`MessageSupport`] owns the formatter registry, the registered messages
//! and templates, and the default parameter configuration. It formats
//! messages by code and moves message sets in and out of binary packs.

mod config;
mod configurer;
mod error;
mod suggestions;

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};

use tracing::{debug, warn};

use crate::formatter::FormatterRegistry;
use crate::interpreter::{EvalContext, MessageAccessor, ParameterLookup, format_message};
use crate::message::{ConfigError, ConfigValue, Message, ParameterConfig};
use crate::pack::{read_pack, write_pack};
use crate::types::Locale;

pub use config::SupportConfig;
pub use configurer::MessageConfigurer;
pub use error::SupportError;
pub use suggestions::compute_suggestions;

/// Registered messages and templates with everything needed to format them.
///
/// # Example
///
/// ```
/// use msgfmt::{Message, MessageNode, MessageSupport, ParameterConfig, ParameterNode};
///
/// let greeting = Message::with_code(
///     "greeting",
///     MessageNode::compound(vec![
///         MessageNode::text("Hello "),
///         MessageNode::parameter(ParameterNode::new("name", None, ParameterConfig::new()).unwrap()),
///     ])
///     .unwrap(),
/// )
/// .unwrap();
///
/// let mut support = MessageSupport::new();
/// support.add_message(greeting).unwrap();
///
/// let text = support.code("greeting").unwrap().with("name", "Ada").format().unwrap();
/// assert_eq!(text, "Hello Ada");
/// ```
#[derive(Debug)]
pub struct MessageSupport {
    config: SupportConfig,
    formatters: FormatterRegistry,
    messages: BTreeMap<String, Message>,
    templates: BTreeMap<String, Message>,
    default_config: ParameterConfig,
}

impl Default for MessageSupport {
    fn default() -> Self {
        MessageSupport {
            config: SupportConfig::default(),
            formatters: FormatterRegistry::with_default_formatters(),
            messages: BTreeMap::new(),
            templates: BTreeMap::new(),
            default_config: ParameterConfig::new(),
        }
    }
}

impl MessageSupport {
    /// A support with the default configuration and formatter catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A support built from `config`. Fails when the cache capacity is
    /// below 2.
    pub fn with_config(config: SupportConfig) -> Result<Self, SupportError> {
        let mut formatters = FormatterRegistry::with_cache_capacity(config.cache_capacity())?;
        if config.default_formatters() {
            formatters.register_default_formatters();
        }
        Ok(MessageSupport {
            config,
            formatters,
            messages: BTreeMap::new(),
            templates: BTreeMap::new(),
            default_config: ParameterConfig::new(),
        })
    }

    pub fn config(&self) -> &SupportConfig {
        &self.config
    }

    pub fn formatters(&self) -> &FormatterRegistry {
        &self.formatters
    }

    /// The registry, for registering additional formatters.
    pub fn formatters_mut(&mut self) -> &mut FormatterRegistry {
        &mut self.formatters
    }

    // =========================================================================
    // Messages and templates
    // =========================================================================

    /// Register a message under its code.
    ///
    /// Adding a message equal to the registered one is a no-op; a different
    /// message under the same code is rejected.
    pub fn add_message(&mut self, message: Message) -> Result<(), SupportError> {
        insert_message(&mut self.messages, message)
    }

    /// Register a template under `name`, with the same duplicate rules as
    /// [`MessageSupport::add_message`].
    pub fn add_template(
        &mut self,
        name: impl Into<String>,
        template: Message,
    ) -> Result<(), SupportError> {
        insert_template(&mut self.templates, name.into(), template)
    }

    pub fn has_message(&self, code: &str) -> bool {
        self.messages.contains_key(code)
    }

    pub fn get_message(&self, code: &str) -> Option<&Message> {
        self.messages.get(code)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn get_template(&self, name: &str) -> Option<&Message> {
        self.templates.get(name)
    }

    /// Registered message codes, in order.
    pub fn message_codes(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    /// Registered template names, in order.
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Replace the options applied to parameters that do not set them.
    pub fn set_default_parameter_config(
        &mut self,
        options: BTreeMap<String, ConfigValue>,
    ) -> Result<(), SupportError> {
        self.default_config = ParameterConfig::with_parts(options, Vec::new(), None)?;
        Ok(())
    }

    pub fn default_parameter_config(&self) -> &ParameterConfig {
        &self.default_config
    }

    // =========================================================================
    // Formatting
    // =========================================================================

    /// Start formatting the message registered under `code`.
    pub fn code(&self, code: &str) -> Result<MessageConfigurer<'_>, SupportError> {
        if code.is_empty() {
            return Err(ConfigError::EmptyCode.into());
        }
        match self.messages.get(code) {
            Some(message) => Ok(MessageConfigurer::new(self, message)),
            None => Err(SupportError::UnknownCode {
                code: code.to_string(),
                suggestions: compute_suggestions(code, self.message_codes()),
            }),
        }
    }

    /// Start formatting an unregistered message.
    pub fn message<'s>(&'s self, message: &'s Message) -> MessageConfigurer<'s> {
        MessageConfigurer::new(self, message)
    }

    /// Format `message` with `params` for `locale`.
    pub fn format(
        &self,
        message: &Message,
        params: &dyn ParameterLookup,
        locale: &Locale,
    ) -> Result<String, SupportError> {
        let accessor = MessageAccessor::new(&self.formatters, &self.templates, &self.default_config);
        let mut ctx = EvalContext::with_max_depth(accessor, locale, self.config.max_template_depth());
        Ok(format_message(&mut ctx, params, message)?)
    }

    // =========================================================================
    // Packs
    // =========================================================================

    /// Write the messages whose code passes `filter` to a pack, together
    /// with every registered template they reference, directly or through
    /// other templates.
    pub fn export_messages<W: Write>(
        &self,
        writer: W,
        filter: impl Fn(&str) -> bool,
    ) -> Result<(), SupportError> {
        let messages: Vec<&Message> = self
            .messages
            .iter()
            .filter(|(code, _)| filter(code))
            .map(|(_, message)| message)
            .collect();

        let templates = self.referenced_templates(&messages);
        let templates: Vec<(&str, &Message)> = templates
            .into_iter()
            .filter_map(|name| {
                self.templates
                    .get_key_value(name.as_str())
                    .map(|(name, template)| (name.as_str(), template))
            })
            .collect();

        write_pack(writer, &messages, &templates)?;
        Ok(())
    }

    /// Write all messages to a pack.
    pub fn export_all_messages<W: Write>(&self, writer: W) -> Result<(), SupportError> {
        self.export_messages(writer, |_| true)
    }

    fn referenced_templates(&self, messages: &[&Message]) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut pending: Vec<String> = messages
            .iter()
            .flat_map(|message| message.template_names())
            .collect();
        while let Some(name) = pending.pop() {
            let Some(template) = self.templates.get(&name) else {
                continue;
            };
            if found.insert(name) {
                pending.extend(template.template_names());
            }
        }
        found
    }

    /// Register the messages and templates of each pack stream.
    ///
    /// Each stream is decoded and checked against the registered content in
    /// full before any of it is committed; a failing stream leaves the
    /// support as it was after the previous stream. Returns the number of
    /// messages read.
    pub fn import_messages<R: Read>(
        &mut self,
        readers: impl IntoIterator<Item = R>,
    ) -> Result<usize, SupportError> {
        let mut imported = 0;
        for reader in readers {
            let contents = read_pack(reader)?;

            let mut messages = self.messages.clone();
            let mut templates = self.templates.clone();
            let count = contents.messages.len();
            for message in contents.messages {
                insert_message(&mut messages, message)?;
            }
            for (name, template) in contents.templates {
                insert_template(&mut templates, name, template)?;
            }

            self.messages = messages;
            self.templates = templates;
            imported += count;
        }
        debug!(messages = imported, "imported message packs");
        Ok(imported)
    }
}

fn insert_message(
    messages: &mut BTreeMap<String, Message>,
    message: Message,
) -> Result<(), SupportError> {
    let code = message.code().ok_or(ConfigError::EmptyCode)?.to_string();
    match messages.get(&code) {
        Some(existing) if *existing == message => {
            warn!(code = %code, "identical message registered twice; ignored");
            Ok(())
        }
        Some(_) => Err(SupportError::DuplicateMessage { code }),
        None => {
            messages.insert(code, message);
            Ok(())
        }
    }
}

fn insert_template(
    templates: &mut BTreeMap<String, Message>,
    name: String,
    template: Message,
) -> Result<(), SupportError> {
    if name.is_empty() {
        return Err(ConfigError::EmptyTemplateName.into());
    }
    match templates.get(&name) {
        Some(existing) if *existing == template => {
            warn!(template = %name, "identical template registered twice; ignored");
            Ok(())
        }
        Some(_) => Err(SupportError::DuplicateTemplate { name }),
        None => {
            templates.insert(name, template);
            Ok(())
        }
    }
}
