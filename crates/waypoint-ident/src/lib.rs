//! Waypoint identifiers
//!
//! Self-describing identifiers for records that are never stored.
//!
//! # Overview
//!
//! - **ResourceId**: `(namespace, identifier, authority)` triple
//! - **PartToken / ItemToken**: structured state packed into an identifier
//! - **Codec**: encode/decode bound to one synthetic authority
//!
//! # Example
//!
//! ```rust
//! use waypoint_ident::{Codec, PartToken, PART_NAMESPACE};
//!
//! let codec = Codec::parts();
//! let root = PartToken::root(vec!["lo-fractions".into()], Some(2));
//! let root_id = codec.encode(PART_NAMESPACE, "5f1e", &root).unwrap();
//!
//! let child = root.child(root_id.to_string(), "lo-division", 0).unwrap();
//! let child_id = codec.encode(PART_NAMESPACE, "5f1e", &child).unwrap();
//!
//! let decoded = codec.decode::<PartToken>(&child_id).unwrap();
//! assert_eq!(decoded.token.depth, 1);
//! assert_eq!(decoded.origin, "5f1e");
//! ```

#![warn(missing_docs)]

pub mod codec;
pub mod id;
pub mod token;

// Re-exports
pub use codec::{decode_identifier, encode_identifier, origin_of, Codec, CodecError, Decoded, PAYLOAD_DELIMITER};
pub use id::{
    IdError, ResourceId, CANONICAL_AUTHORITY, ITEM_AUTHORITY, ITEM_NAMESPACE, PART_AUTHORITY,
    PART_NAMESPACE,
};
pub use token::{ItemToken, PartToken, Token};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for identifier operations
    pub use crate::{Codec, CodecError, Decoded, ItemToken, PartToken, ResourceId, Token};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
