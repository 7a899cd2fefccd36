//! Evaluation of message trees into text.

use std::collections::BTreeMap;

use tracing::warn;

use crate::formatter::FormatterContext;
use crate::interpreter::context::TemplateParameters;
use crate::interpreter::{EvalContext, FormatError, ParameterLookup, best_match};
use crate::message::{ConfigValue, KeyTypes, Message, MessageNode, ParameterNode, TemplateNode};
use crate::types::{Text, Value, ValueType};

/// Format `message` to a string.
///
/// This is the top-level entry point: the bundle locale is chosen from the
/// context's locale and the resulting text is returned without its
/// boundary-space flags.
pub fn format_message(
    ctx: &mut EvalContext<'_>,
    params: &dyn ParameterLookup,
    message: &Message,
) -> Result<String, FormatError> {
    evaluate_message(ctx, params, message).map(Text::into_string)
}

/// Evaluate `message`, selecting the bundle entry for the context locale.
pub fn evaluate_message(
    ctx: &mut EvalContext<'_>,
    params: &dyn ParameterLookup,
    message: &Message,
) -> Result<Text, FormatError> {
    let node = message
        .localized(ctx.locale())
        .ok_or_else(|| FormatError::EmptyBundle {
            code: message.code().map(ToString::to_string),
        })?;
    evaluate(ctx, params, node)
}

/// Evaluate a single node.
pub fn evaluate(
    ctx: &mut EvalContext<'_>,
    params: &dyn ParameterLookup,
    node: &MessageNode,
) -> Result<Text, FormatError> {
    match node {
        MessageNode::Text(text) => Ok(text.clone()),
        MessageNode::Parameter(parameter) => evaluate_parameter(ctx, params, parameter),
        MessageNode::Template(template) => evaluate_template(ctx, params, template),
        MessageNode::Compound(parts) => evaluate_compound(ctx, params, parts),
    }
}

// =========================================================================
// Compound
// =========================================================================

/// Join the parts, emitting at most one space between non-empty texts.
///
/// An empty part emits nothing but passes its requested spaces on to its
/// neighbours.
fn evaluate_compound(
    ctx: &mut EvalContext<'_>,
    params: &dyn ParameterLookup,
    parts: &[MessageNode],
) -> Result<Text, FormatError> {
    let mut output = String::new();
    let mut pending_space = false;
    let mut space_before = false;
    let mut space_after = false;

    for (index, part) in parts.iter().enumerate() {
        let text = evaluate(ctx, params, part)?;
        if index == 0 {
            space_before = text.space_before();
        }
        space_after = text.space_after();

        if text.is_empty() {
            pending_space |= text.space_before() || text.space_after();
        } else {
            if (pending_space || text.space_before()) && !output.is_empty() {
                output.push(' ');
            }
            output.push_str(text.text());
            pending_space = text.space_after();
        }
    }

    Ok(Text::new(output, space_before, space_after))
}

// =========================================================================
// Parameter
// =========================================================================

fn evaluate_parameter(
    ctx: &mut EvalContext<'_>,
    params: &dyn ParameterLookup,
    node: &ParameterNode,
) -> Result<Text, FormatError> {
    let value = params.parameter(node.name());
    format_parameter(ctx, params, node, value.as_deref())
        .map(|text| text.with_spaces(node.space_before(), node.space_after()))
        .map_err(|source| FormatError::Parameter {
            name: node.name().to_string(),
            source: Box::new(source),
        })
}

fn format_parameter(
    ctx: &mut EvalContext<'_>,
    params: &dyn ParameterLookup,
    node: &ParameterNode,
    value: Option<&Value>,
) -> Result<Text, FormatError> {
    let accessor = ctx.accessor();
    let registry = accessor.formatters();
    let config = node.config();
    let value_type = value.map_or(ValueType::OBJECT, Value::value_type);
    let type_chain = registry.resolve(None, &value_type);

    // The default entry is decided here only when no typed key will get a
    // chance after formatting.
    let early_default = !config.key_types().intersects(KeyTypes::TYPED);
    if let Some(choice) = best_match(&type_chain, config, value, KeyTypes::NULL_EMPTY, early_default)
    {
        return evaluate_config_value(ctx, params, choice);
    }

    let formatter_ctx = FormatterContext::new(
        registry,
        ctx.locale(),
        config,
        accessor.default_config(),
        node.format(),
    );
    let mut chain = match node.format() {
        Some(format) => registry.resolve(Some(format), &value_type),
        None => type_chain.clone(),
    };
    let text = chain.produce(&formatter_ctx, value)?;

    match best_match(&type_chain, config, value, KeyTypes::TYPED, true) {
        Some(choice) => evaluate_config_value(ctx, params, choice),
        None => Ok(text),
    }
}

fn evaluate_config_value(
    ctx: &mut EvalContext<'_>,
    params: &dyn ParameterLookup,
    value: &ConfigValue,
) -> Result<Text, FormatError> {
    match value {
        ConfigValue::Message(message) => evaluate_message(ctx, params, message),
        ConfigValue::String(text) => Ok(Text::from_source(text)),
        ConfigValue::Number(n) => Ok(Text::plain(n.to_string())),
        ConfigValue::Bool(b) => Ok(Text::plain(b.to_string())),
    }
}

// =========================================================================
// Template
// =========================================================================

fn evaluate_template(
    ctx: &mut EvalContext<'_>,
    params: &dyn ParameterLookup,
    node: &TemplateNode,
) -> Result<Text, FormatError> {
    let Some(message) = ctx.accessor().template(node.name()) else {
        warn!(template = node.name(), "unknown template formatted as empty text");
        return Ok(Text::new("", node.space_before(), node.space_after()));
    };

    ctx.push_call(node.name())?;
    let result = render_defaults(ctx, params, node).and_then(|rendered| {
        let scoped = TemplateParameters::new(params, node, rendered);
        evaluate_message(ctx, &scoped, message)
    });
    ctx.pop_call();

    result
        .map(|text| text.with_spaces(node.space_before(), node.space_after()))
        .map_err(|source| FormatError::Template {
            name: node.name().to_string(),
            source: Box::new(source),
        })
}

/// Evaluate the message-valued defaults of a template reference that the
/// caller does not supply.
fn render_defaults(
    ctx: &mut EvalContext<'_>,
    params: &dyn ParameterLookup,
    node: &TemplateNode,
) -> Result<BTreeMap<String, Value>, FormatError> {
    let mut rendered = BTreeMap::new();
    for (name, value) in node.default_parameters() {
        let ConfigValue::Message(message) = value else {
            continue;
        };
        let outer_name = node
            .parameter_delegates()
            .get(name)
            .map_or(name.as_str(), String::as_str);
        if params.parameter(outer_name).is_some() {
            continue;
        }
        let text = evaluate_message(ctx, params, message)?;
        rendered.insert(name.clone(), Value::String(text.into_string()));
    }
    Ok(rendered)
}
