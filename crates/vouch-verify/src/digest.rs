use std::fmt;
use std::str::FromStr;

use crate::ParseDigestError;

/// Lowercase hexadecimal digest of some content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexDigest(String);

impl HexDigest {
    /// Encode raw digest bytes as lowercase hex.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self { Self(hex::encode(bytes)) }

    pub fn as_str(&self) -> &str { &self.0 }

    pub fn into_string(self) -> String { self.0 }

    /// Compare against a caller-supplied digest string, byte for byte.
    ///
    /// The digest is lowercase hex, so an uppercase or padded string never
    /// matches. Parse it with [`FromStr`] first to normalise it.
    pub fn matches(&self, expected: &str) -> bool { self.0 == expected }
}

impl fmt::Display for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl AsRef<str> for HexDigest {
    fn as_ref(&self) -> &str { &self.0 }
}

impl FromStr for HexDigest {
    type Err = ParseDigestError;

    /// Parse a SHA256 digest: exactly 64 hex characters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 64 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseDigestError(s.to_string()));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn test_from_bytes_is_lowercase_hex() {
        let digest = HexDigest::from_bytes([0xAB, 0x01, 0xff]);
        assert_eq!(digest.as_str(), "ab01ff");
    }

    #[test]
    fn test_parse_valid_digest() {
        let digest: HexDigest = HELLO.to_ascii_uppercase().parse().unwrap();
        assert_eq!(digest.as_str(), HELLO);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!("abc".parse::<HexDigest>().is_err());
        assert!(format!("{HELLO}00").parse::<HexDigest>().is_err());
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        let bad = format!("{}zz", &HELLO[..62]);
        let err = bad.parse::<HexDigest>().unwrap_err();
        assert_eq!(err.0, bad);
    }

    #[test]
    fn test_matches_is_exact() {
        let digest: HexDigest = HELLO.parse().unwrap();
        assert!(digest.matches(HELLO));
        assert!(!digest.matches(&HELLO.to_ascii_uppercase()));
        assert!(!digest.matches(&format!("  {HELLO}\n")));
        assert!(!digest.matches("incorrect_and_even_invalid_hash"));
        assert!(!digest.matches(""));
    }

    #[test]
    fn test_parsed_uppercase_matches() {
        let padded: HexDigest = format!("  {}\n", HELLO.to_ascii_uppercase()).parse().unwrap();
        assert!(padded.matches(HELLO));
    }
}
