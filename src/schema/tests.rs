//! Tests for schema loading and validation.

use super::{
    CompiledSchema, FieldSpec, Kind, Schema, ViolationKind, validate, validate_with_schema,
};
use crate::context::Context;
use crate::document::RenderedDocument;
use crate::error::RenderError;
use crate::render::render;
use crate::template::Template;

fn rendered(template: &str, pairs: &[(&str, &str)]) -> RenderedDocument {
    let context: Context = pairs.iter().copied().collect();
    render(&Template::new(template), &context).unwrap()
}

// =========================================================================
// Loading
// =========================================================================

#[test]
fn test_parse_shorthand_and_rules() {
    let schema = Schema::from_yaml(
        r#"
smtp_port: port
domain: hostname
external_url:
  kind: url
  required: false
smtp_user:
  kind: string
  pattern: "^[a-z]+$"
retries: integer
"#,
    )
    .unwrap();

    assert_eq!(schema.fields.len(), 5);
    assert_eq!(schema.fields["smtp_port"], FieldSpec::Kind(Kind::Port));
    assert_eq!(schema.fields["retries"].kind(), Kind::Int);

    let url = &schema.fields["external_url"];
    assert_eq!(url.kind(), Kind::Url);
    assert!(!url.required());

    let user = &schema.fields["smtp_user"];
    assert!(user.required());
    assert_eq!(user.pattern(), Some("^[a-z]+$"));
}

#[test]
fn test_parse_empty_schema() {
    assert!(Schema::from_yaml("").unwrap().is_empty());
    assert!(Schema::from_yaml("  \n").unwrap().is_empty());
}

#[test]
fn test_parse_unknown_kind_fails() {
    let err = Schema::from_yaml("p: float").unwrap_err();
    assert!(err.to_string().contains("failed to parse schema YAML"));
}

#[test]
fn test_invalid_pattern_is_config_error() {
    let schema = Schema::from_yaml("p:\n  kind: string\n  pattern: \"([\"\n").unwrap();
    let err = CompiledSchema::from_schema(&schema).unwrap_err();
    assert!(matches!(err, RenderError::UserError(_)));
    assert!(err.to_string().contains("schema field 'p'"));
}

// =========================================================================
// Validation against substitutions
// =========================================================================

#[test]
fn test_int_field_passes() {
    let doc = rendered("port = {{p}}", &[("p", "8181")]);
    let schema = Schema::from_kinds([("p", Kind::Int)]);

    let report = validate_with_schema(&schema, &doc).unwrap();
    assert!(report.passed);
    assert!(report.violations.is_empty());
}

#[test]
fn test_int_field_wrong_type() {
    let doc = rendered("port = {{p}}", &[("p", "abc")]);
    let schema = Schema::from_kinds([("p", Kind::Int)]);

    let report = validate_with_schema(&schema, &doc).unwrap();
    assert!(!report.passed);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].field, "p");
    assert_eq!(report.violations[0].value.as_deref(), Some("abc"));
    assert_eq!(report.violations[0].kind, ViolationKind::WrongType);
}

#[test]
fn test_collects_every_violation() {
    let doc = rendered(
        "external_url '{{url}}'\nnginx['listen_port'] = {{port}}\nnginx['listen_https'] = {{https}}\n",
        &[("url", "gitlab.example.org"), ("port", "70000"), ("https", "yes")],
    );
    let schema = Schema::from_kinds([
        ("url", Kind::Url),
        ("port", Kind::Port),
        ("https", Kind::Bool),
    ]);

    let report = validate_with_schema(&schema, &doc).unwrap();
    let kinds: Vec<(&str, ViolationKind)> = report
        .violations
        .iter()
        .map(|v| (v.field.as_str(), v.kind))
        .collect();

    assert_eq!(
        kinds,
        vec![
            ("https", ViolationKind::WrongType),
            ("port", ViolationKind::OutOfRange),
            ("url", ViolationKind::Malformed),
        ]
    );
}

#[test]
fn test_repeated_placeholder_reported_once() {
    let doc = rendered("a={{d}} b={{d}} c={{d}}", &[("d", "not a host")]);
    let schema = Schema::from_kinds([("d", Kind::Hostname)]);

    let report = validate_with_schema(&schema, &doc).unwrap();
    assert_eq!(report.violations.len(), 1);
}

#[test]
fn test_checks_filtered_value() {
    let doc = rendered("x = {{ v | trim }}", &[("v", "  443  ")]);
    let schema = Schema::from_kinds([("v", Kind::Port)]);

    assert!(validate_with_schema(&schema, &doc).unwrap().passed);
}

#[test]
fn test_pattern_mismatch() {
    let doc = rendered("user = {{u}}", &[("u", "Root")]);
    let schema = Schema::from_yaml("u:\n  kind: string\n  pattern: \"^[a-z]+$\"\n").unwrap();

    let report = validate_with_schema(&schema, &doc).unwrap();
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::PatternMismatch);
}

#[test]
fn test_kind_checked_before_pattern() {
    let doc = rendered("p = {{p}}", &[("p", "abc")]);
    let schema = Schema::from_yaml("p:\n  kind: port\n  pattern: \"^9\"\n").unwrap();

    let report = validate_with_schema(&schema, &doc).unwrap();
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::WrongType);
}

// =========================================================================
// Missing fields and assignment fallback
// =========================================================================

#[test]
fn test_required_field_missing() {
    let doc = rendered("nothing here", &[]);
    let schema = Schema::from_kinds([("p", Kind::Int)]);

    let report = validate_with_schema(&schema, &doc).unwrap();
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::Missing);
    assert_eq!(report.violations[0].value, None);
}

#[test]
fn test_optional_field_missing_passes() {
    let doc = rendered("nothing here", &[]);
    let schema = Schema::from_yaml("p:\n  kind: int\n  required: false\n").unwrap();

    assert!(validate_with_schema(&schema, &doc).unwrap().passed);
}

#[test]
fn test_falls_back_to_assignments() {
    let schema = Schema::from_kinds([("port", Kind::Int)]);
    let compiled = CompiledSchema::from_schema(&schema).unwrap();

    let ok = RenderedDocument::from_text("port = 8181\n");
    assert!(validate(&compiled, &ok).passed);

    let bad = RenderedDocument::from_text("port = abc\n");
    let report = validate(&compiled, &bad);
    assert!(!report.passed);
    assert_eq!(report.violations[0].value.as_deref(), Some("abc"));
}

#[test]
fn test_assignment_keys_with_brackets() {
    let schema = Schema::from_kinds([("gitlab_rails['smtp_port']", Kind::Port)]);
    let doc = RenderedDocument::from_text("gitlab_rails['smtp_port'] = 587\n");

    assert!(validate_with_schema(&schema, &doc).unwrap().passed);
}

#[test]
fn test_substitutions_take_precedence_over_assignments() {
    // `p` is substituted, so the unrelated `p = abc` line is not consulted.
    let doc = rendered("p = abc\nport = {{p}}\n", &[("p", "8181")]);
    let schema = Schema::from_kinds([("p", Kind::Int)]);

    assert!(validate_with_schema(&schema, &doc).unwrap().passed);
}

// =========================================================================
// Report formatting
// =========================================================================

#[test]
fn test_format_error_lists_fields() {
    let doc = rendered("port = {{p}}", &[("p", "abc")]);
    let schema = Schema::from_kinds([("p", Kind::Int), ("q", Kind::Bool)]);
    let report = validate_with_schema(&schema, &doc).unwrap();

    let msg = report.format_error();
    assert!(msg.starts_with("Schema validation failed (2 violations)"));
    assert!(msg.contains("  p: wrong type: expected an integer (got 'abc')"));
    assert!(msg.contains("  q: missing: no value in rendered document"));
}

#[test]
fn test_format_error_empty_when_passed() {
    let report = super::SchemaReport::pass();
    assert_eq!(report.format_error(), "");
}
