use crate::errors::ValidationError;
use crate::policy::{AllowedExtensions, TierPolicy};
use crate::upload::UploadRequest;

/// Checks a request against the policy of its tier. The tier itself was
/// already checked when the request was built, so only the file type and
/// size rules remain, in that order.
pub fn validate(request: &UploadRequest, policy: &TierPolicy) -> Result<(), ValidationError> {
    if !extension_allowed(&request.file_name, policy) {
        return Err(ValidationError::UnsupportedType {
            tier: policy.tier,
            allowed: policy.describe_allowed(),
        });
    }

    if request.size_bytes > policy.max_bytes {
        return Err(too_large(policy));
    }

    Ok(())
}

/// The rejection for a file over the tier's limit.
pub fn too_large(policy: &TierPolicy) -> ValidationError {
    ValidationError::TooLarge {
        tier: policy.tier,
        limit_bytes: policy.max_bytes,
        limit: format_file_size(policy.max_bytes),
    }
}

pub fn extension_allowed(file_name: &str, policy: &TierPolicy) -> bool {
    let name = file_name.to_lowercase();

    match policy.allowed_extensions {
        AllowedExtensions::Any => true,
        AllowedExtensions::Only(extensions) => {
            name == ".env" || extensions.iter().any(|ext| name.ends_with(ext))
        }
    }
}

/// Renders a byte count for people: `0 Bytes`, `1.5 KB`, `500 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{value:.2}");
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{rendered} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{StorageTier, policy_for};
    use bytes::Bytes;

    const MIB: u64 = 1024 * 1024;

    fn request(name: &str, size_bytes: u64, tier: StorageTier) -> UploadRequest {
        UploadRequest {
            file_name: name.to_string(),
            declared_mime_type: mime::TEXT_PLAIN,
            size_bytes,
            tier,
            content: Bytes::new(),
        }
    }

    fn check(name: &str, size_bytes: u64, tier: StorageTier) -> Result<(), ValidationError> {
        validate(&request(name, size_bytes, tier), policy_for(tier))
    }

    #[test]
    fn accepts_every_listed_extension() {
        for tier in [StorageTier::Temp, StorageTier::Media] {
            let AllowedExtensions::Only(extensions) = policy_for(tier).allowed_extensions else {
                panic!("{tier} should have a fixed list");
            };
            for ext in extensions {
                let name = format!("file{ext}");
                assert_eq!(check(&name, 1, tier), Ok(()), "{name} in {tier}");
                let upper = name.to_uppercase();
                assert_eq!(check(&upper, 1, tier), Ok(()), "{upper} in {tier}");
            }
        }
    }

    #[test]
    fn rejects_unlisted_extensions() {
        for (name, tier) in [
            ("movie.mp4", StorageTier::Temp),
            ("script.sh", StorageTier::Temp),
            ("README", StorageTier::Temp),
            ("notes.txt", StorageTier::Media),
            ("archive.tar.gz", StorageTier::Media),
        ] {
            assert!(
                matches!(
                    check(name, 1, tier),
                    Err(ValidationError::UnsupportedType { tier: t, .. }) if t == tier
                ),
                "{name} in {tier}"
            );
        }
    }

    #[test]
    fn permanent_accepts_anything() {
        for name in ["a.exe", "README", "weird.name.tar.gz", "x.mp4", ""] {
            assert_eq!(check(name, 10, StorageTier::Permanent), Ok(()));
        }
    }

    #[test]
    fn bare_env_file_is_always_allowed() {
        for tier in StorageTier::ALL {
            assert_eq!(check(".env", 10, tier), Ok(()));
        }
        assert_eq!(check(".ENV", 10, StorageTier::Media), Ok(()));
    }

    #[test]
    fn size_over_limit_is_rejected() {
        for tier in StorageTier::ALL {
            let policy = policy_for(tier);
            let name = match tier {
                StorageTier::Media => "clip.mp4",
                _ => "notes.txt",
            };
            assert_eq!(check(name, policy.max_bytes, tier), Ok(()));
            assert!(matches!(
                check(name, policy.max_bytes + 1, tier),
                Err(ValidationError::TooLarge { limit_bytes, .. }) if limit_bytes == policy.max_bytes
            ));
        }
    }

    #[test]
    fn file_type_is_checked_before_size() {
        assert!(matches!(
            check("movie.mp4", 600 * MIB, StorageTier::Temp),
            Err(ValidationError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn scenarios() {
        assert_eq!(check("secrets.env", 1024, StorageTier::Temp), Ok(()));
        assert!(matches!(
            check("movie.mp4", 1024, StorageTier::Temp),
            Err(ValidationError::UnsupportedType { .. })
        ));
        assert_eq!(
            check("movie.mp4", 600 * MIB, StorageTier::Media),
            Err(ValidationError::TooLarge {
                tier: StorageTier::Media,
                limit_bytes: 500 * MIB,
                limit: "500 MB".into(),
            })
        );
    }

    #[test]
    fn formats_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * MIB), "5 MB");
        assert_eq!(format_file_size(100 * MIB), "100 MB");
        assert_eq!(format_file_size(3 * 1024 * MIB), "3 GB");
    }
}
