pub mod block;
pub mod validator;

pub use block::*;
pub use validator::*;

/// Number of bytes in a validator address.
pub const ADDRESS_LEN: usize = 20;

/// Number of bytes in a SHA256 hash.
pub const HASH_LEN: usize = 32;

/// Fixed-length byte newtypes travel as hex strings (with or without `0x`).
macro_rules! hex_bytes {
    ($name:ident, $len:expr, $what:literal) => {
        impl $name {
            pub fn from_bytes(bytes: &[u8]) -> Result<Self, &'static str> {
                if bytes.len() != $len {
                    return Err(concat!("Invalid ", $what, " length"));
                }
                let mut arr = [0u8; $len];
                arr.copy_from_slice(bytes);
                Ok(Self(arr))
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&::hex::encode(self.0))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&::hex::encode(self.0))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                let s = s.strip_prefix("0x").unwrap_or(&s);
                let bytes = ::hex::decode(s).map_err(::serde::de::Error::custom)?;
                Self::from_bytes(&bytes).map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use hex_bytes;

/// A SHA256 digest: header hashes, validator set hashes, application hashes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Hash(pub [u8; HASH_LEN]);

hex_bytes!(Hash, HASH_LEN, "hash");

/// A validator address: the first 20 bytes of SHA256(public key bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; ADDRESS_LEN]);

hex_bytes!(Address, ADDRESS_LEN, "address");
