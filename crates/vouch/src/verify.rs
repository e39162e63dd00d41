//! Accept or reject fetched content against the expected digest.

use std::fmt;

use bytes::Bytes;
use vouch_verify::{DigestError, DigestProvider, HexDigest};

/// The digest a caller expects, exactly as supplied.
///
/// No format is enforced and it is compared exactly: a malformed, padded or
/// uppercase value never matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpectedDigest(String);

impl ExpectedDigest {
    pub fn new(digest: impl Into<String>) -> Self { Self(digest.into()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ExpectedDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for ExpectedDigest {
    fn from(s: &str) -> Self { Self(s.to_string()) }
}

impl From<String> for ExpectedDigest {
    fn from(s: String) -> Self { Self(s) }
}

impl From<HexDigest> for ExpectedDigest {
    fn from(digest: HexDigest) -> Self { Self(digest.into_string()) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// `actual` is `None` when the source was trusted and nothing was hashed.
    Accept { actual: Option<HexDigest> },
    Reject { actual: HexDigest },
}

impl Verdict {
    pub fn is_accept(&self) -> bool { matches!(self, Self::Accept { .. }) }
}

/// Applies the verification policy using a [`DigestProvider`].
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    provider: DigestProvider,
}

impl Verifier {
    pub fn new(provider: DigestProvider) -> Self { Self { provider } }

    pub fn provider(&self) -> &DigestProvider { &self.provider }

    /// Decide whether `content` may be delivered.
    ///
    /// - Trusted: accepted without computing a digest.
    /// - No expected digest: accepted, reporting the computed digest.
    /// - Otherwise accepted iff the computed digest matches.
    ///
    /// # Errors
    ///
    /// Propagates [`DigestError`] from the provider; the content must then be
    /// treated as unverified.
    pub async fn verify(
        &self,
        content: &Bytes,
        expected: Option<&ExpectedDigest>,
        trusted: bool,
    ) -> Result<Verdict, DigestError> {
        if trusted {
            return Ok(Verdict::Accept { actual: None });
        }
        let actual = self.provider.compute(content.clone()).await?;
        Ok(match expected {
            Some(expected) if !actual.matches(expected.as_str()) => Verdict::Reject { actual },
            _ => Verdict::Accept { actual: Some(actual) },
        })
    }
}
