//! Configuration value types and defaults.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// File name looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "omnirender.yaml";

/// Largest accepted permission value (`rwxrwxrwx`).
pub const MAX_FILE_MODE: u32 = 0o777;

/// Unix permission bits for the rendered file, written in octal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMode(pub u32);

impl FileMode {
    /// Parse an octal mode such as `0600`, `600` or `0o600`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let digits = raw.strip_prefix("0o").unwrap_or(raw);
        if digits.is_empty() {
            return None;
        }
        u32::from_str_radix(digits, 8).ok().map(FileMode)
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

impl<'de> Deserialize<'de> for FileMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        // Integers are read digit-for-digit as octal, so `file_mode: 600`
        // means 0o600. A YAML octal literal that already decoded to a value
        // with 8s or 9s in it is rejected.
        let text = match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Number(n) => n.to_string(),
        };
        FileMode::parse(&text).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid file_mode '{}': expected octal digits, e.g. \"0600\"",
                text
            ))
        })
    }
}
