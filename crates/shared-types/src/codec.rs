//! # Codec and Validation Capabilities
//!
//! Values cross the ledger boundary as raw bytes. Instead of inspecting
//! values at runtime, every type that is stored, emitted or bound from an
//! argument implements [`Byteable`]. Types that carry domain rules
//! implement [`Validatable`].
//!
//! ## Encodings
//!
//! | Type | Bytes |
//! |------|-------|
//! | `Vec<u8>` | as-is |
//! | `String` | UTF-8 |
//! | `bool`, integers | decimal text (`"true"`, `"42"`) |
//! | `()` | empty |
//! | `Option<T>` | empty for `None`, otherwise `T`'s encoding |
//! | structured types | JSON, via [`impl_json_byteable!`](crate::impl_json_byteable) |

use crate::errors::{CodecError, ValidationError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Conversion to and from the ledger's byte representation.
pub trait Byteable: Sized {
    /// Serialize the value.
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError>;

    /// Deserialize a value from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError>;
}

/// Domain-level checks run before a value is written to the ledger.
pub trait Validatable {
    /// Check the value. The default accepts everything.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Serialize a structured value as JSON.
pub fn to_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(value).map_err(CodecError::encode::<T>)
}

/// Deserialize a structured value from JSON.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::decode::<T>)
}

/// Implement [`Byteable`] for one or more `serde` types using JSON.
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct Paper { issuer: String, number: String }
///
/// shared_types::impl_json_byteable!(Paper);
/// ```
#[macro_export]
macro_rules! impl_json_byteable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::codec::Byteable for $ty {
                fn to_bytes(
                    &self,
                ) -> ::std::result::Result<::std::vec::Vec<u8>, $crate::errors::CodecError> {
                    $crate::codec::to_json_bytes(self)
                }

                fn from_bytes(
                    bytes: &[u8],
                ) -> ::std::result::Result<Self, $crate::errors::CodecError> {
                    $crate::codec::from_json_bytes(bytes)
                }
            }
        )+
    };
}

impl Byteable for Vec<u8> {
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        Ok(self.clone())
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(bytes.to_vec())
    }
}

impl Byteable for String {
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        Ok(self.as_bytes().to_vec())
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        String::from_utf8(bytes.to_vec()).map_err(CodecError::decode::<String>)
    }
}

impl Byteable for () {
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        Ok(Vec::new())
    }

    fn from_bytes(_bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(())
    }
}

// An empty payload always decodes to `None`, so `Some` of a value whose
// encoding is empty does not survive a round trip.
impl<T: Byteable> Byteable for Option<T> {
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        match self {
            Some(value) => value.to_bytes(),
            None => Ok(Vec::new()),
        }
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.is_empty() {
            Ok(None)
        } else {
            T::from_bytes(bytes).map(Some)
        }
    }
}

macro_rules! impl_text_byteable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Byteable for $ty {
                fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
                    Ok(self.to_string().into_bytes())
                }

                fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
                    let text = std::str::from_utf8(bytes).map_err(CodecError::decode::<$ty>)?;
                    text.trim().parse::<$ty>().map_err(CodecError::decode::<$ty>)
                }
            }
        )+
    };
}

impl_text_byteable!(bool, i32, i64, u32, u64);

// =============================================================================
// TESTS
// =============================================================================
