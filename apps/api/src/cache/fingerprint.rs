//! Content-addressed cache keys.
//!
//! Every key is `resume-analysis:<family>:<sha256-hex>`. The family segment keeps
//! parse results, upload URLs, download paths and LLM responses in separate
//! keyspaces even when their raw inputs happen to be byte-identical.

use std::fmt;

use sha2::{Digest, Sha256};

const NAMESPACE: &str = "resume-analysis";

/// Separator for multi-field text inputs. A field containing `|` can collide
/// with a different split of the same characters; that case is accepted.
const FIELD_DELIMITER: &str = "|";

/// The operation whose result a key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Upload,
    Download,
    Parse,
    Analyze,
    Tailor,
    CoverLetter,
}

impl Family {
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Upload => "upload",
            Family::Download => "download",
            Family::Parse => "parse",
            Family::Analyze => "analyze",
            Family::Tailor => "tailor",
            Family::CoverLetter => "cover-letter",
        }
    }
}

/// A derived cache key. Construct through the `of_*` functions only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Key for a remote resource. The URL is hashed exactly as given: no scheme,
    /// query or trailing-slash normalization.
    pub fn of_url(family: Family, url: &str) -> Self {
        Self::of_bytes(family, url.as_bytes())
    }

    /// Key for raw content. Any byte difference changes the key.
    pub fn of_bytes(family: Family, bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Fingerprint(format!(
            "{NAMESPACE}:{}:{}",
            family.as_str(),
            hex::encode(digest)
        ))
    }

    /// Key for a tuple of text fields joined by `|`.
    pub fn of_fields(family: Family, fields: &[&str]) -> Self {
        let joined = fields.join(FIELD_DELIMITER);
        Self::of_bytes(family, joined.as_bytes())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The hex digest without namespace or family.
    #[cfg(test)]
    pub fn digest(&self) -> &str {
        self.0.rsplit(':').next().unwrap_or_default()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_input_gives_identical_key() {
        let a = Fingerprint::of_bytes(Family::Parse, b"resume body");
        let b = Fingerprint::of_bytes(Family::Parse, b"resume body");
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_byte_difference_changes_key() {
        let a = Fingerprint::of_bytes(Family::Parse, b"resume body");
        let b = Fingerprint::of_bytes(Family::Parse, b"resume body ");
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_format() {
        let key = Fingerprint::of_bytes(Family::Parse, b"");
        assert_eq!(
            key.as_str(),
            "resume-analysis:parse:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(key.digest().len(), 64);
    }

    #[test]
    fn test_urls_are_not_normalized() {
        let plain = Fingerprint::of_url(Family::Download, "https://cdn.example.com/a.pdf");
        let slash = Fingerprint::of_url(Family::Download, "https://cdn.example.com/a.pdf/");
        let upper = Fingerprint::of_url(Family::Download, "HTTPS://cdn.example.com/a.pdf");
        assert_ne!(plain, slash);
        assert_ne!(plain, upper);
    }

    #[test]
    fn test_families_are_segmented() {
        let url = "https://cdn.example.com/a.pdf";
        let as_download = Fingerprint::of_url(Family::Download, url);
        let as_parse = Fingerprint::of_bytes(Family::Parse, url.as_bytes());
        assert_ne!(as_download, as_parse);
        assert_eq!(as_download.digest(), as_parse.digest());
    }

    #[test]
    fn test_fields_hash_the_joined_string() {
        let fields = Fingerprint::of_fields(Family::Analyze, &["rust", "5y", "JD", "Req"]);
        let joined = Fingerprint::of_bytes(Family::Analyze, b"rust|5y|JD|Req");
        assert_eq!(fields, joined);
    }

    #[test]
    fn test_delimiter_collision_is_accepted() {
        let a = Fingerprint::of_fields(Family::Analyze, &["a|b", "c"]);
        let b = Fingerprint::of_fields(Family::Analyze, &["a", "b|c"]);
        assert_eq!(a, b);
    }
}
