//! Tests for the message support facade: registration, lookup by code,
//! formatting and pack import/export.

use std::collections::BTreeMap;
use std::fs::File;
use std::sync::Arc;

use msgfmt::{
    CompareType, ConfigError, ConfigKey, ConfigValue, FormatError, Formatted, FormatterContext,
    Locale, Message, MessageNode, MessageSupport, ParameterConfig, ParameterFormatter,
    ParameterNode, SupportConfig, SupportError, TemplateNode, Text, Value, compute_suggestions,
    params,
};
use tempfile::NamedTempFile;

fn param(name: &str) -> MessageNode {
    MessageNode::parameter(ParameterNode::new(name, None, ParameterConfig::new()).unwrap())
}

fn message(code: &str, parts: Vec<MessageNode>) -> Message {
    Message::with_code(code, MessageNode::compound(parts).unwrap()).unwrap()
}

fn greeting() -> Message {
    message("greeting", vec![MessageNode::text("Hello "), param("name")])
}

fn support_with(messages: Vec<Message>) -> MessageSupport {
    let mut support = MessageSupport::new();
    for message in messages {
        support.add_message(message).unwrap();
    }
    support
}

// =========================================================================
// Registration
// =========================================================================

#[test]
fn registered_messages_are_found_by_code() {
    let support = support_with(vec![greeting()]);
    assert!(support.has_message("greeting"));
    assert!(!support.has_message("farewell"));
    assert_eq!(support.get_message("greeting"), Some(&greeting()));
    assert_eq!(support.message_codes().collect::<Vec<_>>(), vec!["greeting"]);
}

#[test]
fn identical_duplicates_are_ignored() {
    let mut support = support_with(vec![greeting()]);
    support.add_message(greeting()).unwrap();
    assert_eq!(support.message_codes().count(), 1);
}

#[test]
fn conflicting_duplicates_are_rejected() {
    let mut support = support_with(vec![greeting()]);
    let other = message("greeting", vec![MessageNode::text("Hi "), param("name")]);

    let err = support.add_message(other).unwrap_err();
    assert!(matches!(err, SupportError::DuplicateMessage { .. }));
    insta::assert_snapshot!(err.to_string(), @"a different message with code 'greeting' is already registered");
    assert_eq!(support.get_message("greeting"), Some(&greeting()));
}

#[test]
fn anonymous_messages_cannot_be_registered() {
    let mut support = MessageSupport::new();
    let err = support
        .add_message(Message::new(MessageNode::text("x")))
        .unwrap_err();
    assert!(matches!(err, SupportError::Config(ConfigError::EmptyCode)));
}

#[test]
fn templates_follow_the_same_rules() {
    let mut support = MessageSupport::new();
    let sig = Message::new(MessageNode::text("-- us"));
    support.add_template("sig", sig.clone()).unwrap();
    support.add_template("sig", sig).unwrap();
    assert!(support.has_template("sig"));

    let err = support
        .add_template("sig", Message::new(MessageNode::text("-- them")))
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"a different template named 'sig' is already registered");

    let err = support
        .add_template("", Message::new(MessageNode::text("x")))
        .unwrap_err();
    assert!(matches!(err, SupportError::Config(ConfigError::EmptyTemplateName)));
}

// =========================================================================
// Lookup by code
// =========================================================================

#[test]
fn unknown_codes_suggest_close_matches() {
    let support = support_with(vec![
        greeting(),
        message("farewell", vec![MessageNode::text("Bye")]),
    ]);

    let err = support.code("greting").err().unwrap();
    insta::assert_snapshot!(err.to_string(), @"unknown message code 'greting'; did you mean 'greeting'?");

    let err = support.code("xyz").err().unwrap();
    insta::assert_snapshot!(err.to_string(), @"unknown message code 'xyz'");
}

#[test]
fn empty_code_is_a_configuration_error() {
    let support = MessageSupport::new();
    let err = support.code("").err().unwrap();
    insta::assert_snapshot!(err.to_string(), @"message code must not be empty");
}

#[test]
fn suggestions_are_ranked_and_limited() {
    let codes = ["greeting", "greetings", "meeting", "greed", "parting"];
    assert_eq!(
        compute_suggestions("greting", codes),
        vec!["greeting", "greetings", "meeting"]
    );
    assert!(compute_suggestions("greeting", ["greeting"]).is_empty());
}

// =========================================================================
// Formatting
// =========================================================================

#[test]
fn configurer_collects_parameters() {
    let support = support_with(vec![greeting()]);
    let configurer = support.code("greeting").unwrap().with("name", "Ada");
    assert_eq!(configurer.parameters().len(), 1);
    assert_eq!(configurer.format().unwrap(), "Hello Ada");

    let replaced = configurer.with("name", "Grace");
    assert_eq!(replaced.format().unwrap(), "Hello Grace");
    assert_eq!(replaced.without("name").format().unwrap(), "Hello");
}

#[test]
fn clear_drops_every_parameter() {
    let support = support_with(vec![message(
        "pair",
        vec![param("a"), MessageNode::text(" & "), param("b")],
    )]);
    let configurer = support.code("pair").unwrap().with("a", 1).with("b", 2);
    assert_eq!(configurer.format().unwrap(), "1 & 2");
    assert_eq!(configurer.clear().format().unwrap(), "&");
}

#[test]
fn unregistered_messages_can_be_formatted() {
    let support = MessageSupport::new();
    let message = Message::new(param("n"));
    assert_eq!(support.message(&message).with("n", 2.5).format().unwrap(), "2.5");
    assert_eq!(
        support.format(&message, &params! { "n" => 4 }, &Locale::root()).unwrap(),
        "4"
    );
}

#[test]
fn registered_templates_are_used() {
    let mut support = support_with(vec![message(
        "mail",
        vec![
            MessageNode::text("Thanks. "),
            MessageNode::template(TemplateNode::named("sig").unwrap()),
        ],
    )]);
    support
        .add_template("sig", Message::new(MessageNode::text("-- the team")))
        .unwrap();

    assert_eq!(support.code("mail").unwrap().format().unwrap(), "Thanks. -- the team");
}

#[test]
fn default_parameter_config_supplies_options() {
    let mut support = support_with(vec![message("list", vec![param("items")])]);
    support
        .set_default_parameter_config([("list-sep".to_string(), ConfigValue::from(" | "))].into())
        .unwrap();

    let items = vec![Value::from("a"), Value::from("b")];
    assert_eq!(support.code("list").unwrap().with("items", items).format().unwrap(), "a | b");

    let err = support
        .set_default_parameter_config([(String::new(), ConfigValue::from("x"))].into())
        .unwrap_err();
    assert!(matches!(err, SupportError::Config(ConfigError::EmptyOptionName)));
}

#[test]
fn custom_formatters_can_be_registered() {
    #[derive(Debug)]
    struct Stars;
    impl ParameterFormatter for Stars {
        fn name(&self) -> Option<&str> {
            Some("stars")
        }
        fn format(
            &self,
            _ctx: &FormatterContext<'_>,
            value: Option<&Value>,
        ) -> Result<Formatted, FormatError> {
            let count = value.and_then(Value::as_integer).unwrap_or(0);
            let stars = "*".repeat(usize::try_from(count).unwrap_or(0));
            Ok(Formatted::Produced(Text::plain(stars)))
        }
    }

    let rating = ParameterNode::new("rating", Some("stars".to_string()), ParameterConfig::new())
        .unwrap();
    let mut support = support_with(vec![Message::with_code(
        "rating",
        MessageNode::parameter(rating),
    )
    .unwrap()]);
    support.formatters_mut().register(Arc::new(Stars)).unwrap();

    assert_eq!(support.code("rating").unwrap().with("rating", 3).format().unwrap(), "***");
}

#[test]
fn format_errors_pass_through() {
    let mut support = support_with(vec![message(
        "loop",
        vec![MessageNode::template(TemplateNode::named("a").unwrap())],
    )]);
    support
        .add_template("a", Message::new(MessageNode::template(TemplateNode::named("a").unwrap())))
        .unwrap();

    let err = support.code("loop").unwrap().format().unwrap_err();
    let SupportError::Format(format_error) = &err else {
        panic!("expected a format error, got {err:?}");
    };
    assert!(matches!(format_error.root_cause(), FormatError::CyclicTemplate { .. }));
}

// =========================================================================
// Configuration
// =========================================================================

#[test]
fn cache_capacity_is_validated() {
    let config = SupportConfig::builder().cache_capacity(1).build();
    let err = MessageSupport::with_config(config).err().unwrap();
    insta::assert_snapshot!(err.to_string(), @"cache capacity must be at least 2, got 1");
}

#[test]
fn template_depth_is_configurable() {
    let config = SupportConfig::builder().max_template_depth(1).build();
    let mut support = MessageSupport::with_config(config).unwrap();
    support
        .add_message(message("m", vec![MessageNode::template(TemplateNode::named("outer").unwrap())]))
        .unwrap();
    support
        .add_template("outer", Message::new(MessageNode::template(TemplateNode::named("inner").unwrap())))
        .unwrap();
    support
        .add_template("inner", Message::new(MessageNode::text("x")))
        .unwrap();

    let err = support.code("m").unwrap().format().unwrap_err();
    let SupportError::Format(format_error) = &err else {
        panic!("expected a format error, got {err:?}");
    };
    assert_eq!(format_error.root_cause(), &FormatError::MaxDepthExceeded { max_depth: 1 });
}

#[test]
fn support_without_default_formatters_prints_display_text() {
    let config = SupportConfig::builder().default_formatters(false).build();
    let mut support = MessageSupport::with_config(config).unwrap();
    support
        .add_message(message("list", vec![param("items")]))
        .unwrap();

    let items = vec![Value::from(1), Value::from(2)];
    assert_eq!(support.code("list").unwrap().with("items", items).format().unwrap(), "1, 2");
    assert!(support.formatters().named("clip").is_none());
}

// =========================================================================
// Import and export
// =========================================================================

fn plural() -> Message {
    let config = ParameterConfig::from_entries([
        (Some(ConfigKey::number(CompareType::Eq, 1)), ConfigValue::from("one item")),
        (
            None,
            ConfigValue::from(Message::new(
                MessageNode::compound(vec![param("n"), MessageNode::text(" items")]).unwrap(),
            )),
        ),
    ])
    .unwrap();
    Message::with_code(
        "items",
        MessageNode::parameter(ParameterNode::new("n", None, config).unwrap()),
    )
    .unwrap()
}

#[test]
fn exported_messages_import_into_a_fresh_support() {
    let mut source = support_with(vec![greeting(), plural()]);
    source
        .add_template("unused", Message::new(MessageNode::text("never")))
        .unwrap();

    let file = NamedTempFile::new().unwrap();
    source.export_all_messages(file.as_file()).unwrap();

    let mut target = MessageSupport::new();
    let count = target.import_messages([File::open(file.path()).unwrap()]).unwrap();
    assert_eq!(count, 2);
    assert_eq!(target.template_names().count(), 0);
    assert_eq!(
        target.code("items").unwrap().with("n", 1).format().unwrap(),
        "one item"
    );
    assert_eq!(
        target.code("items").unwrap().with("n", 5).format().unwrap(),
        "5 items"
    );
}

#[test]
fn export_filter_selects_codes_and_referenced_templates() {
    let mut source = support_with(vec![
        greeting(),
        message(
            "mail",
            vec![
                MessageNode::text("Thanks. "),
                MessageNode::template(TemplateNode::named("sig").unwrap()),
            ],
        ),
    ]);
    source
        .add_template(
            "sig",
            Message::new(
                MessageNode::compound(vec![
                    MessageNode::text("-- "),
                    MessageNode::template(TemplateNode::named("team").unwrap()),
                ])
                .unwrap(),
            ),
        )
        .unwrap();
    source
        .add_template("team", Message::new(MessageNode::text("the team")))
        .unwrap();
    source
        .add_template("other", Message::new(MessageNode::text("other")))
        .unwrap();

    let mut bytes = Vec::new();
    source.export_messages(&mut bytes, |code| code == "mail").unwrap();

    let mut target = MessageSupport::new();
    assert_eq!(target.import_messages([bytes.as_slice()]).unwrap(), 1);
    assert_eq!(target.message_codes().collect::<Vec<_>>(), vec!["mail"]);
    assert_eq!(target.template_names().collect::<Vec<_>>(), vec!["sig", "team"]);
    assert_eq!(
        target.code("mail").unwrap().format().unwrap(),
        "Thanks. -- the team"
    );
}

#[test]
fn failing_stream_leaves_earlier_streams_committed() {
    let first = support_with(vec![greeting()]);
    let mut first_bytes = Vec::new();
    first.export_all_messages(&mut first_bytes).unwrap();

    let conflicting = message("greeting", vec![MessageNode::text("Howdy")]);
    let second = support_with(vec![conflicting, plural()]);
    let mut second_bytes = Vec::new();
    second.export_all_messages(&mut second_bytes).unwrap();

    let mut target = MessageSupport::new();
    let err = target
        .import_messages([first_bytes.as_slice(), second_bytes.as_slice()])
        .unwrap_err();
    assert!(matches!(err, SupportError::DuplicateMessage { .. }));
    assert!(target.has_message("greeting"));
    assert!(!target.has_message("items"));
}

#[test]
fn import_counts_messages_of_every_committed_stream() {
    let mut first_bytes = Vec::new();
    support_with(vec![greeting()])
        .export_all_messages(&mut first_bytes)
        .unwrap();
    let mut second_bytes = Vec::new();
    support_with(vec![plural(), message("bye", vec![MessageNode::text("Bye")])])
        .export_all_messages(&mut second_bytes)
        .unwrap();

    let mut target = MessageSupport::new();
    let count = target
        .import_messages([first_bytes.as_slice(), second_bytes.as_slice()])
        .unwrap();
    assert_eq!(count, 3);
    assert_eq!(target.message_codes().count(), 3);
}

#[test]
fn corrupt_streams_are_reported() {
    let mut target = MessageSupport::new();
    let err = target.import_messages([&b"garbage"[..]]).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"not a message pack (missing '%{msg}' header)");
    assert_eq!(target.message_codes().count(), 0);
}

#[test]
fn reimporting_the_same_pack_is_harmless() {
    let source = support_with(vec![greeting()]);
    let mut bytes = Vec::new();
    source.export_all_messages(&mut bytes).unwrap();

    let mut target = MessageSupport::new();
    target.import_messages([bytes.as_slice()]).unwrap();
    target.import_messages([bytes.as_slice()]).unwrap();
    assert_eq!(target.message_codes().count(), 1);

    let by_code: BTreeMap<&str, &Message> = target
        .message_codes()
        .filter_map(|code| target.get_message(code).map(|message| (code, message)))
        .collect();
    assert_eq!(by_code["greeting"], &greeting());
}
