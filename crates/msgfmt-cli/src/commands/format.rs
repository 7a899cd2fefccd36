//! Implementation of the `msgfmt format` command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use miette::IntoDiagnostic;
use msgfmt::{Locale, MessageSupport, Value};
use serde::Serialize;

use super::{import_packs, load_definitions};

/// Arguments for the format command.
#[derive(Debug, clap::Args)]
pub struct FormatArgs {
    /// Code of the message to format
    pub code: String,

    /// Pack files holding the message (repeatable)
    #[arg(long = "pack")]
    pub packs: Vec<PathBuf>,

    /// JSON definitions holding the message
    #[arg(long, conflicts_with = "packs")]
    pub definitions: Option<PathBuf>,

    /// Locale tag (e.g., de-CH); defaults to the root locale
    #[arg(long, env = "MSGFMT_LOCALE")]
    pub locale: Option<String>,

    /// Parameters in name=value format (repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct FormatResult<'a> {
    code: &'a str,
    locale: String,
    result: String,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid parameter format '{s}': expected name=value"))?;
    if name.is_empty() {
        return Err(format!("invalid parameter format '{s}': missing name"));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Integers, then floats, then booleans; anything else is a string.
fn parse_value(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        Value::from(n)
    } else if let Ok(f) = raw.parse::<f64>() {
        Value::from(f)
    } else {
        match raw {
            "true" => Value::from(true),
            "false" => Value::from(false),
            _ => Value::from(raw),
        }
    }
}

/// Run the format command.
pub fn run_format(args: FormatArgs) -> miette::Result<i32> {
    let support = match &args.definitions {
        Some(path) => load_definitions(path)?,
        None => {
            let mut support = MessageSupport::new();
            import_packs(&mut support, &args.packs)?;
            support
        }
    };
    let locale = match &args.locale {
        Some(tag) => Locale::parse(tag).into_diagnostic()?,
        None => Locale::root(),
    };
    let params: BTreeMap<String, Value> = args
        .params
        .iter()
        .map(|(name, raw)| (name.clone(), parse_value(raw)))
        .collect();

    let result = support.code(&args.code).and_then(|configurer| {
        params
            .into_iter()
            .fold(configurer, |configurer, (name, value)| configurer.with(name, value))
            .locale(locale.clone())
            .format()
    });

    match result {
        Ok(text) => {
            if args.json {
                let output = FormatResult {
                    code: &args.code,
                    locale: locale.to_string(),
                    result: text,
                };
                println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                println!("{text}");
            }
            Ok(exitcode::OK)
        }
        Err(e) => {
            if args.json {
                let output = serde_json::json!({ "error": e.to_string() });
                eprintln!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                eprintln!("format error: {e}");
            }
            Ok(exitcode::DATAERR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_parse_by_shape() {
        assert_eq!(parse_value("42"), Value::from(42_i64));
        assert_eq!(parse_value("2.5"), Value::from(2.5_f64));
        assert_eq!(parse_value("true"), Value::from(true));
        assert_eq!(parse_value("Ada"), Value::from("Ada"));
    }

    #[test]
    fn params_need_a_name_and_equals_sign() {
        assert_eq!(parse_key_val("n=3=4"), Ok(("n".to_string(), "3=4".to_string())));
        assert!(parse_key_val("n").is_err());
        assert!(parse_key_val("=3").is_err());
    }
}
