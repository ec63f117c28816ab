use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use webutil_http::{
    base36_to_int, cookie_date, http_date, int_to_base36, is_safe_url, parse_etags, parse_http_date,
    quote_etag, same_origin,
};
use webutil_query::{urlencode, MultiValueMap, QueryValue};

use crate::config::{Config, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "webutil", version, about = "HTTP and URL helpers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Compare scheme, host and port of two URLs
    SameOrigin { a: String, b: String },
    /// Check a redirect target against WEBUTIL_ALLOWED_HOST
    IsSafeUrl { url: String },
    /// Encode KEY=VALUE pairs as a query string; repeated keys become a list
    #[command(name = "urlencode")]
    UrlEncode {
        /// Expand lists into one pair per item (also WEBUTIL_DOSEQ)
        #[arg(long)]
        doseq: bool,
        #[arg(required = true, value_name = "KEY=VALUE", value_parser = parse_pair)]
        pairs: Vec<(String, String)>,
    },
    /// Print the tags of an If-None-Match style header
    ParseEtags { header: String },
    /// Quote a raw ETag value
    QuoteEtag { raw: String },
    /// Parse an HTTP date into epoch seconds
    ParseDate { value: String },
    /// Format epoch seconds as an RFC 1123 date
    HttpDate { epoch: u64 },
    /// Format epoch seconds as a cookie expiry date
    CookieDate { epoch: u64 },
    /// Encode a non-negative integer in base 36
    #[command(name = "base36-encode")]
    Base36Encode {
        #[arg(allow_negative_numbers = true)]
        n: i64,
    },
    /// Decode a base 36 string
    #[command(name = "base36-decode")]
    Base36Decode { s: String },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::SameOrigin { .. } => "same-origin",
            Command::IsSafeUrl { .. } => "is-safe-url",
            Command::UrlEncode { .. } => "urlencode",
            Command::ParseEtags { .. } => "parse-etags",
            Command::QuoteEtag { .. } => "quote-etag",
            Command::ParseDate { .. } => "parse-date",
            Command::HttpDate { .. } => "http-date",
            Command::CookieDate { .. } => "cookie-date",
            Command::Base36Encode { .. } => "base36-encode",
            Command::Base36Decode { .. } => "base36-decode",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected KEY=VALUE, got {0:?}")]
pub struct PairError(String);

fn parse_pair(raw: &str) -> Result<(String, String), PairError> {
    let (k, v) = raw.split_once('=').ok_or_else(|| PairError(raw.to_string()))?;
    Ok((k.to_string(), v.to_string()))
}

// a key given once stays a scalar, repeated keys become a list
fn group_pairs(pairs: &[(String, String)]) -> Vec<(String, QueryValue)> {
    let map: MultiValueMap = pairs.iter().map(|(k, v)| (k, v.as_str())).collect();
    map.into_iter()
        .map(|(key, value)| match value {
            QueryValue::Seq(mut items) if items.len() == 1 => (key, QueryValue::Scalar(items.remove(0))),
            other => (key, other),
        })
        .collect()
}

/// Result of one command, ready to print.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub command: &'static str,
    pub result: Value,
}

impl Output {
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => json!({ "command": self.command, "result": self.result }).to_string(),
            OutputFormat::Text => render_text(&self.result),
        }
    }
}

fn render_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render_text).collect::<Vec<_>>().join("\n"),
        other => other.to_string(),
    }
}

pub fn run(cmd: &Command, cfg: &Config) -> Result<Output> {
    let result = match cmd {
        Command::SameOrigin { a, b } => json!(same_origin(a, b)),
        Command::IsSafeUrl { url } => json!(is_safe_url(url, cfg.allowed_host.as_deref())),
        Command::UrlEncode { pairs, doseq } => json!(urlencode(group_pairs(pairs), *doseq || cfg.doseq)),
        Command::ParseEtags { header } => json!(parse_etags(header)),
        Command::QuoteEtag { raw } => json!(quote_etag(raw)),
        Command::ParseDate { value } => {
            let ts = parse_http_date(value).with_context(|| format!("cannot parse {:?} as an http date", value))?;
            json!(ts)
        }
        Command::HttpDate { epoch } => {
            json!(http_date(*epoch).with_context(|| format!("cannot format {} as an http date", epoch))?)
        }
        Command::CookieDate { epoch } => {
            json!(cookie_date(*epoch).with_context(|| format!("cannot format {} as a cookie date", epoch))?)
        }
        Command::Base36Encode { n } => {
            json!(int_to_base36(*n).with_context(|| format!("cannot encode {} as base36", n))?)
        }
        Command::Base36Decode { s } => {
            json!(base36_to_int(s).with_context(|| format!("cannot decode {:?} as base36", s))?)
        }
    };
    debug!(target: "webutil", command = cmd.name(), "command finished");
    Ok(Output { command: cmd.name(), result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(items: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("webutil").chain(items.iter().copied())).map(|cli| cli.command)
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse(&["same-origin", "http://a", "http://b"]).unwrap(),
            Command::SameOrigin { a: "http://a".into(), b: "http://b".into() }
        );
        assert_eq!(parse(&["base36-encode", "42"]).unwrap(), Command::Base36Encode { n: 42 });
        assert_eq!(parse(&["base36-encode", "-1"]).unwrap(), Command::Base36Encode { n: -1 });
        assert_eq!(parse(&["http-date", "784111777"]).unwrap(), Command::HttpDate { epoch: 784_111_777 });
    }

    #[test]
    fn doseq_flag_or_config() {
        let parsed = parse(&["urlencode", "a=1", "--doseq"]).unwrap();
        assert_eq!(parsed, Command::UrlEncode { pairs: vec![("a".into(), "1".into())], doseq: true });

        let cmd = parse(&["urlencode", "a=1", "a=2"]).unwrap();
        let mut cfg = Config::default();
        assert_eq!(run(&cmd, &cfg).unwrap().result, json!("a=%5B%271%27%2C+%272%27%5D"));
        cfg.doseq = true;
        assert_eq!(run(&cmd, &cfg).unwrap().result, json!("a=1&a=2"));
    }

    #[test]
    fn single_keys_stay_scalar() {
        let pairs = vec![("a".to_string(), "1".to_string()), ("b".into(), "2".into()), ("a".into(), "3".into())];
        assert_eq!(
            group_pairs(&pairs),
            vec![
                ("a".to_string(), QueryValue::Seq(vec!["1".into(), "3".into()])),
                ("b".to_string(), QueryValue::Scalar("2".into())),
            ]
        );
    }

    #[test]
    fn usage_errors() {
        assert!(parse(&[]).is_err());
        let err = parse(&["frobnicate"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
        assert_eq!(err.exit_code(), 2);
        assert_eq!(parse(&["quote-etag"]).unwrap_err().kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(parse(&["urlencode", "novalue"]).unwrap_err().kind(), ErrorKind::ValueValidation);
        assert!(parse(&["http-date", "-5"]).is_err());
        assert!(parse(&["http-date", "soon"]).is_err());
    }

    #[test]
    fn text_rendering() {
        let out = Output { command: "parse-etags", result: json!(["a", "b"]) };
        assert_eq!(out.render(OutputFormat::Text), "a\nb");
        let out = Output { command: "same-origin", result: json!(true) };
        assert_eq!(out.render(OutputFormat::Text), "true");
        assert_eq!(out.render(OutputFormat::Json), r#"{"command":"same-origin","result":true}"#);
    }
}
