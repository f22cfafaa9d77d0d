//! Content fingerprints used as cache keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AkarError;

/// SHA-256 of the raw input text, rendered as lowercase hex.
///
/// The fingerprint is taken before any cleaning, so two inputs that normalize
/// to the same tokens still get distinct cache entries.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint raw text.
    pub fn of(text: &str) -> Self {
        Self::of_bytes(text.as_bytes())
    }

    /// Fingerprint raw bytes.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Fingerprint(Sha256::digest(bytes).into())
    }

    /// Fingerprint a sequence of byte strings.
    ///
    /// Each part is length-prefixed, so moving bytes between parts changes
    /// the digest.
    pub fn of_parts<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        Fingerprint(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..12])
    }
}

impl FromStr for Fingerprint {
    type Err = AkarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 64 || !s.is_ascii() {
            return Err(AkarError::invalid_input(format!("malformed fingerprint: {s}")));
        }
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .map_err(|_| AkarError::invalid_input(format!("malformed fingerprint: {s}")))?;
        }
        Ok(Fingerprint(bytes))
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = AkarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Fingerprint> for String {
    fn from(fingerprint: Fingerprint) -> Self {
        fingerprint.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(Fingerprint::of("taman kota"), Fingerprint::of("taman kota"));
        assert_ne!(Fingerprint::of("taman kota"), Fingerprint::of("Taman kota"));
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            Fingerprint::of("").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_parts_are_delimited() {
        let joined = Fingerprint::of_parts([b"ab".as_slice(), b"c".as_slice()]);
        let shifted = Fingerprint::of_parts([b"a".as_slice(), b"bc".as_slice()]);

        assert_ne!(joined, shifted);
        assert_eq!(joined, Fingerprint::of_parts([b"ab".as_slice(), b"c".as_slice()]));
        assert_ne!(joined, Fingerprint::of("abc"));
    }

    #[test]
    fn test_hex_parse() {
        let fingerprint = Fingerprint::of("buku");
        let parsed: Fingerprint = fingerprint.to_string().parse().unwrap();
        assert_eq!(parsed, fingerprint);

        assert!("xyz".parse::<Fingerprint>().is_err());
        assert!("zz".repeat(32).parse::<Fingerprint>().is_err());
    }

    #[test]
    fn test_serializes_as_hex_string() {
        let fingerprint = Fingerprint::of("buku");
        let json = serde_json::to_string(&fingerprint).unwrap();
        assert_eq!(json, format!("\"{}\"", fingerprint.to_hex()));
    }
}
