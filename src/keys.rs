//! Storage key derivation.
//!
//! Key format: `{tier prefix}{timestamp}-{token}-{sanitized name}`, e.g.
//! `temp/2025-06-01T12-30-00-123Z-4f9a0c2b7e-secrets.env`.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::policy::TierPolicy;

const TOKEN_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn derive_key(policy: &TierPolicy, original_name: &str) -> StorageKey {
    derive_key_at(policy, original_name, Utc::now())
}

pub fn derive_key_at(policy: &TierPolicy, original_name: &str, now: DateTime<Utc>) -> StorageKey {
    StorageKey(format!(
        "{}{}-{}-{}",
        policy.prefix,
        key_timestamp(now),
        random_token(),
        sanitize_file_name(original_name)
    ))
}

/// RFC 3339 timestamp with `:` and `.` swapped for `-`.
pub fn key_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

/// Replaces everything outside `[A-Za-z0-9.-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn random_token() -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(TOKEN_LEN);
    token
}
