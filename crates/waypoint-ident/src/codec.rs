//! Identifier codec
//!
//! Wire format of a synthetic identifier:
//!
//! ```text
//! <origin-identifier>?<url-encoded-json-payload>
//! ```
//!
//! The origin is kept verbatim. Percent-escaping never produces `?`, so the
//! last `?` always separates origin from payload, even when the origin
//! itself contains one.

use crate::id::{ResourceId, ITEM_AUTHORITY, PART_AUTHORITY};
use crate::token::Token;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Separator between origin and payload
pub const PAYLOAD_DELIMITER: char = '?';

/// A decoded synthetic identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    /// Identifier of the canonical record this one derives from
    pub origin: String,

    /// Structured payload
    pub token: T,
}

/// Encode an origin and payload into an identifier string
///
/// # Errors
/// Returns [`CodecError::Serialize`] if the payload cannot be represented as JSON
pub fn encode_identifier<T: Serialize>(origin: &str, payload: &T) -> Result<String, CodecError> {
    let json = serde_json::to_string(payload)?;
    Ok(format!(
        "{origin}{PAYLOAD_DELIMITER}{}",
        urlencoding::encode(&json)
    ))
}

/// Decode an identifier string into origin and payload
///
/// # Errors
/// Returns [`CodecError::MalformedIdentifier`] when the delimiter is missing,
/// the escaping is invalid or the payload is not the expected JSON shape
pub fn decode_identifier<T: DeserializeOwned>(identifier: &str) -> Result<Decoded<T>, CodecError> {
    let (origin, escaped) = identifier
        .rsplit_once(PAYLOAD_DELIMITER)
        .ok_or_else(|| CodecError::malformed(identifier, "missing payload delimiter"))?;

    let json = urlencoding::decode(escaped)
        .map_err(|e| CodecError::malformed(identifier, format!("invalid escaping: {e}")))?;

    let token = serde_json::from_str(&json)
        .map_err(|e| CodecError::malformed(identifier, format!("invalid payload: {e}")))?;

    Ok(Decoded {
        origin: origin.to_string(),
        token,
    })
}

/// Origin prefix of an identifier; the whole string if it has no payload
#[inline]
#[must_use]
pub fn origin_of(identifier: &str) -> &str {
    identifier
        .rsplit_once(PAYLOAD_DELIMITER)
        .map_or(identifier, |(origin, _)| origin)
}

/// Codec bound to one synthetic authority
///
/// # Example
/// ```
/// use waypoint_ident::{Codec, PartToken, PART_NAMESPACE};
///
/// let codec = Codec::parts();
/// let token = PartToken::root(vec!["lo-1".into()], None);
/// let id = codec.encode(PART_NAMESPACE, "5f1e", &token).unwrap();
///
/// let decoded = codec.decode::<PartToken>(&id).unwrap();
/// assert_eq!(decoded.origin, "5f1e");
/// assert_eq!(decoded.token, token);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codec {
    authority: String,
}

impl Codec {
    /// Create codec for an authority
    #[inline]
    #[must_use]
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
        }
    }

    /// Codec for synthetic scaffold parts
    #[inline]
    #[must_use]
    pub fn parts() -> Self {
        Self::new(PART_AUTHORITY)
    }

    /// Codec for randomized items
    #[inline]
    #[must_use]
    pub fn items() -> Self {
        Self::new(ITEM_AUTHORITY)
    }

    /// Authority this codec issues and accepts
    #[inline]
    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Check whether an id carries this codec's authority
    #[inline]
    #[must_use]
    pub fn is_synthetic(&self, id: &ResourceId) -> bool {
        id.has_authority(&self.authority)
    }

    /// Encode a token into a synthetic identifier
    ///
    /// # Errors
    /// Returns [`CodecError::Serialize`] if the token cannot be serialized
    pub fn encode<T: Token>(
        &self,
        namespace: &str,
        origin: &str,
        token: &T,
    ) -> Result<ResourceId, CodecError> {
        let identifier = encode_identifier(origin, token)?;
        Ok(ResourceId::new(namespace, identifier, self.authority.as_str()))
    }

    /// Decode a synthetic identifier
    ///
    /// # Errors
    /// - [`CodecError::UnknownAuthority`] if the id is not from this authority;
    ///   the caller should fall through to canonical lookup
    /// - [`CodecError::MalformedIdentifier`] if the payload cannot be parsed
    pub fn decode<T: Token>(&self, id: &ResourceId) -> Result<Decoded<T>, CodecError> {
        if !self.is_synthetic(id) {
            return Err(CodecError::UnknownAuthority {
                expected: self.authority.clone(),
                found: id.authority().to_string(),
            });
        }
        decode_identifier(id.identifier())
    }
}

/// Codec errors
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Payload could not be parsed
    #[error("malformed identifier '{identifier}': {reason}")]
    MalformedIdentifier {
        /// Offending identifier
        identifier: String,
        /// What was wrong with it
        reason: String,
    },

    /// Authority is not the synthetic marker this codec handles
    #[error("unknown authority '{found}' (expected '{expected}')")]
    UnknownAuthority {
        /// Authority the codec handles
        expected: String,
        /// Authority found on the id
        found: String,
    },

    /// Payload could not be serialized
    #[error("payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CodecError {
    /// Create malformed identifier error
    pub fn malformed(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// True for the pass-through signal
    #[inline]
    #[must_use]
    pub fn is_unknown_authority(&self) -> bool {
        matches!(self, Self::UnknownAuthority { .. })
    }
}
