//! Value filters applied inside placeholders (`{{ name | filter }}`).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::Sha512;
use std::fmt;

/// Salt length used for Mosquitto password hashes.
pub const MOSQUITTO_SALT_LEN: usize = 12;

/// PBKDF2 rounds used for Mosquitto password hashes.
pub const MOSQUITTO_ITERATIONS: u32 = 101;

const MOSQUITTO_HASH_LEN: usize = 64;

/// A transform applied to a resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Upper,
    Lower,
    Trim,
    /// Fallback used when the key is absent from the context.
    Default(String),
    /// Hash the value into a Mosquitto `password_file` entry.
    MosquittoPasswd,
}

impl Filter {
    /// Parse a single filter clause such as `upper` or `default('x')`.
    ///
    /// Returns a human-readable reason on failure; the caller attaches the
    /// token location.
    pub fn parse(spec: &str) -> Result<Self, String> {
        let (name, arg) = match spec.find('(') {
            Some(open) => {
                let Some(inner) = spec[open + 1..].strip_suffix(')') else {
                    return Err(format!("filter '{}' is missing a closing ')'", spec));
                };
                (spec[..open].trim(), Some(unquote(inner.trim())))
            }
            None => (spec, None),
        };

        let filter = match name {
            "upper" => Filter::Upper,
            "lower" => Filter::Lower,
            "trim" => Filter::Trim,
            "mosquitto_passwd" => Filter::MosquittoPasswd,
            "default" => {
                return match arg {
                    Some(value) => Ok(Filter::Default(value.to_string())),
                    None => Err("filter 'default' requires an argument".to_string()),
                };
            }
            "" => return Err("empty filter name after '|'".to_string()),
            other => return Err(format!("unknown filter '{}'", other)),
        };

        if arg.is_some() {
            return Err(format!("filter '{}' takes no arguments", name));
        }
        Ok(filter)
    }

    /// Apply the filter to a resolved value.
    pub fn apply(&self, value: String) -> String {
        match self {
            Filter::Upper => value.to_uppercase(),
            Filter::Lower => value.to_lowercase(),
            Filter::Trim => value.trim().to_string(),
            Filter::Default(_) => value,
            Filter::MosquittoPasswd => mosquitto_passwd(&value),
        }
    }
}

/// Run `value` through `filters`, left to right.
pub fn apply_all(filters: &[Filter], value: String) -> String {
    filters.iter().fold(value, |value, filter| filter.apply(value))
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Upper => write!(f, "upper"),
            Filter::Lower => write!(f, "lower"),
            Filter::Trim => write!(f, "trim"),
            Filter::Default(value) if value.contains('\'') => write!(f, "default(\"{}\")", value),
            Filter::Default(value) => write!(f, "default('{}')", value),
            Filter::MosquittoPasswd => write!(f, "mosquitto_passwd"),
        }
    }
}

fn unquote(arg: &str) -> &str {
    for q in ['\'', '"'] {
        if let Some(inner) = arg.strip_prefix(q).and_then(|s| s.strip_suffix(q)) {
            return inner;
        }
    }
    arg
}

/// Hash a password for a Mosquitto password file with a fresh random salt.
pub fn mosquitto_passwd(password: &str) -> String {
    let salt: [u8; MOSQUITTO_SALT_LEN] = rand::random();
    mosquitto_passwd_with_salt(password, &salt)
}

/// Hash a password for a Mosquitto password file with the given salt.
///
/// Output format: `$7$<iterations>$<base64 salt>$<base64 pbkdf2-sha512>`.
pub fn mosquitto_passwd_with_salt(password: &str, salt: &[u8]) -> String {
    let mut hash = [0u8; MOSQUITTO_HASH_LEN];
    pbkdf2::pbkdf2_hmac::<Sha512>(password.as_bytes(), salt, MOSQUITTO_ITERATIONS, &mut hash);
    format!(
        "$7${}${}${}",
        MOSQUITTO_ITERATIONS,
        STANDARD.encode(salt),
        STANDARD.encode(hash)
    )
}
