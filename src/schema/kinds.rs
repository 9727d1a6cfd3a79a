//! Value kinds and their checks.

use super::types::ViolationKind;
use serde::Deserialize;
use std::fmt;

/// The expected shape of a rendered value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// Any text.
    String,
    /// Signed 64-bit integer.
    #[serde(alias = "integer")]
    Int,
    /// TCP/UDP port, 1 to 65535.
    Port,
    /// `true` or `false`.
    #[serde(alias = "boolean")]
    Bool,
    /// Absolute URL with a host.
    Url,
    /// RFC 1123 host name.
    Hostname,
    /// `local@hostname`.
    Email,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::String => "string",
            Kind::Int => "int",
            Kind::Port => "port",
            Kind::Bool => "bool",
            Kind::Url => "url",
            Kind::Hostname => "hostname",
            Kind::Email => "email",
        };
        f.write_str(name)
    }
}

impl Kind {
    /// Check `value` against this kind.
    pub fn check(self, value: &str) -> Result<(), (ViolationKind, String)> {
        match self {
            Kind::String => Ok(()),
            Kind::Int => value
                .parse::<i64>()
                .map(|_| ())
                .map_err(|_| (ViolationKind::WrongType, "expected an integer".to_string())),
            Kind::Port => check_port(value),
            Kind::Bool => match value {
                "true" | "false" => Ok(()),
                _ => Err((
                    ViolationKind::WrongType,
                    "expected 'true' or 'false'".to_string(),
                )),
            },
            Kind::Url => check_url(value),
            Kind::Hostname => {
                if is_hostname(value) {
                    Ok(())
                } else {
                    Err((ViolationKind::Malformed, "not a valid host name".to_string()))
                }
            }
            Kind::Email => check_email(value),
        }
    }
}

fn check_port(value: &str) -> Result<(), (ViolationKind, String)> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err((ViolationKind::WrongType, "expected a port number".to_string()));
    }
    match value.parse::<u32>() {
        Ok(port) if (1..=65535).contains(&port) => Ok(()),
        _ => Err((
            ViolationKind::OutOfRange,
            "port must be between 1 and 65535".to_string(),
        )),
    }
}

fn check_url(value: &str) -> Result<(), (ViolationKind, String)> {
    let parsed = url::Url::parse(value)
        .map_err(|e| (ViolationKind::Malformed, format!("not a valid URL: {}", e)))?;
    if !parsed.has_host() {
        return Err((ViolationKind::Malformed, "URL has no host".to_string()));
    }
    Ok(())
}

fn check_email(value: &str) -> Result<(), (ViolationKind, String)> {
    let valid = value.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !local.chars().any(|c| c.is_whitespace() || c == '@')
            && is_hostname(domain)
    });
    if valid {
        Ok(())
    } else {
        Err((ViolationKind::Malformed, "not a valid email address".to_string()))
    }
}

/// RFC 1123: dot-separated labels of 1-63 alphanumerics or hyphens,
/// no leading or trailing hyphen, 253 characters at most.
pub(crate) fn is_hostname(value: &str) -> bool {
    let value = value.strip_suffix('.').unwrap_or(value);
    if value.is_empty() || value.len() > 253 {
        return false;
    }
    value.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}
