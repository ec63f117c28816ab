use serde_json::{json, Value};
use clap::Parser;
use webutil_cli::commands::{run, Cli, Command};
use webutil_cli::config::{Config, OutputFormat};

fn run_args(cfg: &Config, items: &[&str]) -> anyhow::Result<Value> {
    let cli = Cli::try_parse_from(std::iter::once("webutil").chain(items.iter().copied())).expect("valid usage");
    Ok(run(&cli.command, cfg)?.result)
}

#[test]
fn same_origin_command() {
    let cfg = Config::default();
    assert_eq!(run_args(&cfg, &["same-origin", "http://foo.com", "http://foo.com/"]).unwrap(), json!(true));
    assert_eq!(run_args(&cfg, &["same-origin", "http://foo.com:8000", "http://foo.com:8001"]).unwrap(), json!(false));
}

#[test]
fn is_safe_url_uses_configured_host() {
    let mut cfg = Config::default();
    assert_eq!(run_args(&cfg, &["is-safe-url", "https://example.com/next"]).unwrap(), json!(false));
    cfg.allowed_host = Some("example.com".into());
    assert_eq!(run_args(&cfg, &["is-safe-url", "https://example.com/next"]).unwrap(), json!(true));
    assert_eq!(run_args(&cfg, &["is-safe-url", "https://evil.com/"]).unwrap(), json!(false));
}

#[test]
fn urlencode_groups_repeated_keys() {
    let cfg = Config::default();
    let expanded = run_args(&cfg, &["urlencode", "--doseq", "name=Adrian", "position=Developer", "name=Simon"]).unwrap();
    assert_eq!(expanded, json!("name=Adrian&name=Simon&position=Developer"));

    let flat = run_args(&cfg, &["urlencode", "a=1", "a=2"]).unwrap();
    assert_eq!(flat, json!("a=%5B%271%27%2C+%272%27%5D"));
}

#[test]
fn urlencode_keeps_single_values_scalar() {
    let cfg = Config::default();
    assert_eq!(run_args(&cfg, &["urlencode", "a=1", "b=2"]).unwrap(), json!("a=1&b=2"));
    assert_eq!(run_args(&cfg, &["urlencode", "q=rust lang", "t=x", "t=y"]).unwrap(), json!("q=rust+lang&t=%5B%27x%27%2C+%27y%27%5D"));
}

#[test]
fn etag_commands() {
    let cfg = Config::default();
    let tags = run_args(&cfg, &["parse-etags", r#""a", W/"b", junk"#]).unwrap();
    assert_eq!(tags, json!(["a", "b"]));
    let quoted = run_args(&cfg, &["quote-etag", r#"e\t"ag"#]).unwrap();
    assert_eq!(quoted, json!(r#""e\\t\"ag""#));
}

#[test]
fn date_commands() {
    let cfg = Config::default();
    assert_eq!(run_args(&cfg, &["parse-date", "Sun Nov  6 08:49:37 1994"]).unwrap(), json!(784_111_777));
    assert_eq!(run_args(&cfg, &["http-date", "784111777"]).unwrap(), json!("Sun, 06 Nov 1994 08:49:37 GMT"));
    assert_eq!(run_args(&cfg, &["cookie-date", "784111777"]).unwrap(), json!("Sun, 06-Nov-1994 08:49:37 GMT"));

    assert_eq!(run_args(&cfg, &["http-date", "253402300799"]).unwrap(), json!("Fri, 31 Dec 9999 23:59:59 GMT"));
    let err = run_args(&cfg, &["http-date", "253402300800"]).expect_err("past year 9999");
    assert!(format!("{:#}", err).contains("past the last representable HTTP date"));
    let err = run_args(&cfg, &["cookie-date", "18446744073709551615"]).expect_err("overflow");
    assert!(format!("{:#}", err).contains("cannot format 18446744073709551615 as a cookie date"));

    let err = run_args(&cfg, &["parse-date", "tomorrow"]).expect_err("should fail");
    let msg = format!("{:#}", err);
    assert!(msg.contains("cannot parse \"tomorrow\""), "{}", msg);
}

#[test]
fn base36_commands() {
    let cfg = Config::default();
    assert_eq!(run_args(&cfg, &["base36-encode", "818469960"]).unwrap(), json!("django"));
    assert_eq!(run_args(&cfg, &["base36-decode", "django"]).unwrap(), json!(818469960));

    let err = run_args(&cfg, &["base36-encode", "-1"]).expect_err("negative input");
    assert!(format!("{:#}", err).contains("negative base36 conversion input"));
    let err = run_args(&cfg, &["base36-decode", "#"]).expect_err("bad digit");
    assert!(format!("{:#}", err).contains("invalid base36 digit"));
}

#[test]
fn json_output_wraps_result() {
    let cfg = Config::default();
    let cmd = Command::QuoteEtag { raw: "x".into() };
    let out = run(&cmd, &cfg).unwrap();
    let v: Value = serde_json::from_str(&out.render(OutputFormat::Json)).expect("valid json");
    assert_eq!(v["command"], "quote-etag");
    assert_eq!(v["result"], "\"x\"");
    assert_eq!(out.render(OutputFormat::Text), "\"x\"");
}
