//! Storage tiers and the fixed policy attached to each of them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

const MIB: u64 = 1024 * 1024;

const TEMP_EXTENSIONS: &[&str] = &[
    ".env", ".txt", ".text", ".log", ".json", ".yaml", ".yml", ".conf", ".config",
];

const MEDIA_EXTENSIONS: &[&str] = &[
    ".mp4", ".mov", ".avi", ".mkv", ".webm", ".mp3", ".wav", ".png", ".jpg", ".jpeg", ".gif",
    ".pdf", ".zip",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageTier {
    Temp,
    Media,
    Permanent,
}

impl StorageTier {
    pub const ALL: [StorageTier; 3] = [
        StorageTier::Temp,
        StorageTier::Media,
        StorageTier::Permanent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageTier::Temp => "temp",
            StorageTier::Media => "media",
            StorageTier::Permanent => "permanent",
        }
    }
}

impl fmt::Display for StorageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temp" => Ok(StorageTier::Temp),
            "media" => Ok(StorageTier::Media),
            "permanent" => Ok(StorageTier::Permanent),
            other => Err(ValidationError::InvalidTier(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedExtensions {
    Any,
    Only(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPolicy {
    pub tier: StorageTier,
    pub prefix: &'static str,
    pub max_bytes: u64,
    pub allowed_extensions: AllowedExtensions,
    pub retention_label: &'static str,
}

impl TierPolicy {
    /// Comma separated list of accepted extensions, for rejection messages.
    pub fn describe_allowed(&self) -> String {
        match self.allowed_extensions {
            AllowedExtensions::Any => "any".to_string(),
            AllowedExtensions::Only(extensions) => extensions.join(", "),
        }
    }
}

static POLICIES: [TierPolicy; 3] = [
    TierPolicy {
        tier: StorageTier::Temp,
        prefix: "temp/",
        max_bytes: 5 * MIB,
        allowed_extensions: AllowedExtensions::Only(TEMP_EXTENSIONS),
        retention_label: "24 Hours",
    },
    TierPolicy {
        tier: StorageTier::Media,
        prefix: "media/",
        max_bytes: 500 * MIB,
        allowed_extensions: AllowedExtensions::Only(MEDIA_EXTENSIONS),
        retention_label: "30 Days",
    },
    TierPolicy {
        tier: StorageTier::Permanent,
        prefix: "permanent/",
        max_bytes: 100 * MIB,
        allowed_extensions: AllowedExtensions::Any,
        retention_label: "Permanent",
    },
];

pub fn policy_for(tier: StorageTier) -> &'static TierPolicy {
    match tier {
        StorageTier::Temp => &POLICIES[0],
        StorageTier::Media => &POLICIES[1],
        StorageTier::Permanent => &POLICIES[2],
    }
}

/// The tier with the highest size limit.
pub fn largest_policy() -> &'static TierPolicy {
    POLICIES
        .iter()
        .max_by_key(|p| p.max_bytes)
        .unwrap_or(&POLICIES[0])
}

/// Largest `max_bytes` across every tier.
pub fn largest_limit() -> u64 {
    largest_policy().max_bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_values() {
        let temp = policy_for(StorageTier::Temp);
        assert_eq!(temp.prefix, "temp/");
        assert_eq!(temp.max_bytes, 5 * 1024 * 1024);
        assert_eq!(temp.retention_label, "24 Hours");
        assert_eq!(
            temp.allowed_extensions,
            AllowedExtensions::Only(&[
                ".env", ".txt", ".text", ".log", ".json", ".yaml", ".yml", ".conf", ".config"
            ])
        );

        let media = policy_for(StorageTier::Media);
        assert_eq!(media.prefix, "media/");
        assert_eq!(media.max_bytes, 500 * 1024 * 1024);
        assert_eq!(media.retention_label, "30 Days");

        let permanent = policy_for(StorageTier::Permanent);
        assert_eq!(permanent.prefix, "permanent/");
        assert_eq!(permanent.max_bytes, 100 * 1024 * 1024);
        assert_eq!(permanent.allowed_extensions, AllowedExtensions::Any);
        assert_eq!(permanent.retention_label, "Permanent");
    }

    #[test]
    fn every_tier_owns_its_policy() {
        for tier in StorageTier::ALL {
            assert_eq!(policy_for(tier).tier, tier);
        }
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!("temp".parse::<StorageTier>(), Ok(StorageTier::Temp));
        assert_eq!("media".parse::<StorageTier>(), Ok(StorageTier::Media));
        assert_eq!("permanent".parse::<StorageTier>(), Ok(StorageTier::Permanent));
        assert_eq!(
            "archive".parse::<StorageTier>(),
            Err(ValidationError::InvalidTier("archive".into()))
        );
        assert!("TEMP".parse::<StorageTier>().is_err());
        assert!("".parse::<StorageTier>().is_err());
    }

    #[test]
    fn largest_limit_is_media() {
        assert_eq!(largest_policy().tier, StorageTier::Media);
        assert_eq!(largest_limit(), 500 * 1024 * 1024);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&StorageTier::Permanent).unwrap(),
            "\"permanent\""
        );
    }
}
