//! [`Packable`] implementations for the message model.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use crate::message::{
    CompareType, ConfigKey, ConfigValue, Message, MessageBody, MessageNode,
    ParameterConfig, ParameterNode, TemplateNode,
};
use crate::pack::{PackError, PackReader, PackWriter, Packable};
use crate::types::{Locale, Text};

mod tag {
    pub const NODE_TEXT: u8 = 1;
    pub const NODE_PARAMETER: u8 = 2;
    pub const NODE_TEMPLATE: u8 = 3;
    pub const NODE_COMPOUND: u8 = 4;

    pub const MESSAGE_NODE: u8 = 0x10;
    pub const MESSAGE_BUNDLE: u8 = 0x11;

    pub const KEY_NULL: u8 = 1;
    pub const KEY_EMPTY: u8 = 2;
    pub const KEY_BOOL: u8 = 3;
    pub const KEY_NUMBER: u8 = 4;
    pub const KEY_STRING: u8 = 5;
    pub const KEY_NAME: u8 = 6;

    pub const VALUE_BOOL: u8 = 1;
    pub const VALUE_NUMBER: u8 = 2;
    pub const VALUE_STRING: u8 = 3;
    pub const VALUE_MESSAGE: u8 = 4;
}

// =========================================================================
// Text and locales
// =========================================================================

impl Packable for Text {
    fn pack<W: Write>(&self, writer: &mut PackWriter<W>) -> Result<(), PackError> {
        writer.write_spaces(self.space_before(), self.space_after())?;
        writer.write_str(self.text())
    }

    fn unpack<R: Read>(reader: &mut PackReader<R>) -> Result<Self, PackError> {
        let (space_before, space_after) = reader.read_spaces()?;
        let text = reader.read_string()?;
        Ok(Text::new(text, space_before, space_after))
    }
}

impl Packable for Locale {
    fn pack<W: Write>(&self, writer: &mut PackWriter<W>) -> Result<(), PackError> {
        writer.write_str(&self.to_string())
    }

    fn unpack<R: Read>(reader: &mut PackReader<R>) -> Result<Self, PackError> {
        Ok(Locale::parse(&reader.read_string()?)?)
    }
}

// =========================================================================
// Parameter configuration
// =========================================================================

impl Packable for CompareType {
    fn pack<W: Write>(&self, writer: &mut PackWriter<W>) -> Result<(), PackError> {
        let index = CompareType::ALL
            .iter()
            .position(|compare| compare == self)
            .unwrap_or_default();
        writer.write_u8(index as u8)
    }

    fn unpack<R: Read>(reader: &mut PackReader<R>) -> Result<Self, PackError> {
        let tag = reader.read_u8()?;
        CompareType::ALL
            .get(usize::from(tag))
            .copied()
            .ok_or(PackError::UnknownTag { kind: "compare", tag })
    }
}

impl Packable for ConfigKey {
    fn pack<W: Write>(&self, writer: &mut PackWriter<W>) -> Result<(), PackError> {
        match self {
            ConfigKey::Null(compare) => {
                writer.write_u8(tag::KEY_NULL)?;
                writer.write(compare)
            }
            ConfigKey::Empty(compare) => {
                writer.write_u8(tag::KEY_EMPTY)?;
                writer.write(compare)
            }
            ConfigKey::Bool { compare, value } => {
                writer.write_u8(tag::KEY_BOOL)?;
                writer.write(compare)?;
                writer.write_bool(*value)
            }
            ConfigKey::Number { compare, value } => {
                writer.write_u8(tag::KEY_NUMBER)?;
                writer.write(compare)?;
                writer.write_signed(*value)
            }
            ConfigKey::String { compare, value } => {
                writer.write_u8(tag::KEY_STRING)?;
                writer.write(compare)?;
                writer.write_str(value)
            }
            ConfigKey::Name(name) => {
                writer.write_u8(tag::KEY_NAME)?;
                writer.write_str(name)
            }
        }
    }

    fn unpack<R: Read>(reader: &mut PackReader<R>) -> Result<Self, PackError> {
        let key = match reader.read_u8()? {
            tag::KEY_NULL => ConfigKey::Null(reader.read()?),
            tag::KEY_EMPTY => ConfigKey::Empty(reader.read()?),
            tag::KEY_BOOL => ConfigKey::Bool {
                compare: reader.read()?,
                value: reader.read_bool()?,
            },
            tag::KEY_NUMBER => ConfigKey::Number {
                compare: reader.read()?,
                value: reader.read_signed()?,
            },
            tag::KEY_STRING => ConfigKey::String {
                compare: reader.read()?,
                value: reader.read_string()?,
            },
            tag::KEY_NAME => ConfigKey::Name(reader.read_string()?),
            tag => return Err(PackError::UnknownTag { kind: "key", tag }),
        };
        key.validate()?;
        Ok(key)
    }
}

impl Packable for ConfigValue {
    fn pack<W: Write>(&self, writer: &mut PackWriter<W>) -> Result<(), PackError> {
        match self {
            ConfigValue::Bool(b) => {
                writer.write_u8(tag::VALUE_BOOL)?;
                writer.write_bool(*b)
            }
            ConfigValue::Number(n) => {
                writer.write_u8(tag::VALUE_NUMBER)?;
                writer.write_signed(*n)
            }
            ConfigValue::String(s) => {
                writer.write_u8(tag::VALUE_STRING)?;
                writer.write_str(s)
            }
            ConfigValue::Message(message) => {
                writer.write_u8(tag::VALUE_MESSAGE)?;
                writer.write(message)
            }
        }
    }

    fn unpack<R: Read>(reader: &mut PackReader<R>) -> Result<Self, PackError> {
        match reader.read_u8()? {
            tag::VALUE_BOOL => Ok(ConfigValue::Bool(reader.read_bool()?)),
            tag::VALUE_NUMBER => Ok(ConfigValue::Number(reader.read_signed()?)),
            tag::VALUE_STRING => Ok(ConfigValue::String(reader.read_string()?)),
            tag::VALUE_MESSAGE => Ok(ConfigValue::Message(reader.read()?)),
            tag => Err(PackError::UnknownTag { kind: "value", tag }),
        }
    }
}

impl Packable for ParameterConfig {
    fn pack<W: Write>(&self, writer: &mut PackWriter<W>) -> Result<(), PackError> {
        writer.write_len(self.options().len())?;
        for (name, value) in self.options() {
            writer.write_str(name)?;
            writer.write(value)?;
        }

        writer.write_len(self.choices().len())?;
        for (key, value) in self.choices() {
            writer.write(key)?;
            writer.write(value)?;
        }

        match self.default_value() {
            Some(value) => {
                writer.write_bool(true)?;
                writer.write(value)
            }
            None => writer.write_bool(false),
        }
    }

    fn unpack<R: Read>(reader: &mut PackReader<R>) -> Result<Self, PackError> {
        let mut options = BTreeMap::new();
        for _ in 0..reader.read_len()? {
            let name = reader.read_string()?;
            options.insert(name, reader.read()?);
        }

        let count = reader.read_len()?;
        let mut choices = Vec::new();
        for _ in 0..count {
            let key = reader.read()?;
            choices.push((key, reader.read()?));
        }

        let default = if reader.read_bool()? {
            Some(reader.read()?)
        } else {
            None
        };

        Ok(ParameterConfig::with_parts(options, choices, default)?)
    }
}

// =========================================================================
// Nodes
// =========================================================================

impl Packable for TemplateNode {
    fn pack<W: Write>(&self, writer: &mut PackWriter<W>) -> Result<(), PackError> {
        writer.write_str(self.name())?;
        writer.write_spaces(self.space_before(), self.space_after())?;

        writer.write_len(self.default_parameters().len())?;
        for (name, value) in self.default_parameters() {
            writer.write_str(name)?;
            writer.write(value)?;
        }

        writer.write_len(self.parameter_delegates().len())?;
        for (name, delegate) in self.parameter_delegates() {
            writer.write_str(name)?;
            writer.write_str(delegate)?;
        }
        Ok(())
    }

    fn unpack<R: Read>(reader: &mut PackReader<R>) -> Result<Self, PackError> {
        let name = reader.read_string()?;
        let (space_before, space_after) = reader.read_spaces()?;

        let mut default_parameters = BTreeMap::new();
        for _ in 0..reader.read_len()? {
            let parameter = reader.read_string()?;
            default_parameters.insert(parameter, reader.read()?);
        }

        let mut parameter_delegates = BTreeMap::new();
        for _ in 0..reader.read_len()? {
            let parameter = reader.read_string()?;
            parameter_delegates.insert(parameter, reader.read_string()?);
        }

        Ok(TemplateNode::builder()
            .name(name)
            .space_before(space_before)
            .space_after(space_after)
            .default_parameters(default_parameters)
            .parameter_delegates(parameter_delegates)
            .build()?)
    }
}

impl Packable for ParameterNode {
    fn pack<W: Write>(&self, writer: &mut PackWriter<W>) -> Result<(), PackError> {
        writer.write_str(self.name())?;
        writer.write_option_str(self.format())?;
        writer.write_spaces(self.space_before(), self.space_after())?;
        writer.write(self.config())
    }

    fn unpack<R: Read>(reader: &mut PackReader<R>) -> Result<Self, PackError> {
        let name = reader.read_string()?;
        let format = reader.read_option_string()?;
        let (space_before, space_after) = reader.read_spaces()?;
        let config = reader.read()?;
        Ok(ParameterNode::new(name, format, config)?.with_spaces(space_before, space_after))
    }
}

impl Packable for MessageNode {
    fn pack<W: Write>(&self, writer: &mut PackWriter<W>) -> Result<(), PackError> {
        match self {
            MessageNode::Text(text) => {
                writer.write_u8(tag::NODE_TEXT)?;
                writer.write(text)
            }
            MessageNode::Parameter(parameter) => {
                writer.write_u8(tag::NODE_PARAMETER)?;
                writer.write(parameter.as_ref())
            }
            MessageNode::Template(template) => {
                writer.write_u8(tag::NODE_TEMPLATE)?;
                writer.write(template.as_ref())
            }
            MessageNode::Compound(parts) => {
                writer.write_u8(tag::NODE_COMPOUND)?;
                writer.write_len(parts.len())?;
                parts.iter().try_for_each(|part| writer.write(part))
            }
        }
    }

    fn unpack<R: Read>(reader: &mut PackReader<R>) -> Result<Self, PackError> {
        reader.nested(|reader| match reader.read_u8()? {
            tag::NODE_TEXT => Ok(MessageNode::Text(reader.read()?)),
            tag::NODE_PARAMETER => Ok(MessageNode::parameter(reader.read()?)),
            tag::NODE_TEMPLATE => Ok(MessageNode::template(reader.read()?)),
            tag::NODE_COMPOUND => {
                let count = reader.read_len()?;
                let mut parts = Vec::new();
                for _ in 0..count {
                    parts.push(reader.read()?);
                }
                Ok(MessageNode::compound(parts)?)
            }
            tag => Err(PackError::UnknownTag { kind: "node", tag }),
        })
    }
}

// =========================================================================
// Messages
// =========================================================================

impl Packable for Message {
    fn pack<W: Write>(&self, writer: &mut PackWriter<W>) -> Result<(), PackError> {
        match self.body() {
            MessageBody::Node(node) => {
                writer.write_u8(tag::MESSAGE_NODE)?;
                writer.write_option_str(self.code())?;
                writer.write(node)
            }
            MessageBody::Bundle(locales) => {
                writer.write_u8(tag::MESSAGE_BUNDLE)?;
                writer.write_option_str(self.code())?;
                writer.write_len(locales.len())?;
                for (locale, node) in locales {
                    writer.write(locale)?;
                    writer.write(node)?;
                }
                Ok(())
            }
        }
    }

    fn unpack<R: Read>(reader: &mut PackReader<R>) -> Result<Self, PackError> {
        reader.nested(|reader| match reader.read_u8()? {
            tag::MESSAGE_NODE => {
                let code = reader.read_option_string()?;
                let node = reader.read()?;
                Ok(match code {
                    Some(code) => Message::with_code(code, node)?,
                    None => Message::new(node),
                })
            }
            tag::MESSAGE_BUNDLE => {
                let code = reader.read_option_string()?;
                let mut locales = BTreeMap::new();
                for _ in 0..reader.read_len()? {
                    let locale = reader.read()?;
                    locales.insert(locale, reader.read()?);
                }
                Ok(Message::bundle(code, locales)?)
            }
            tag => Err(PackError::UnknownTag { kind: "message", tag }),
        })
    }
}
