//! Content addressing.
//!
//! The content store addresses blobs by CIDv0 (`Qm...`, base58btc of the sha2-256
//! multihash), while the ledger only carries the raw 32 byte digest. The conversion
//! between both is a pure bijection.

use crate::error::ContentError;

use cid::Cid;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

const SHA2_256_CODE: u64 = 0x12;
const SHA2_256_LEN: u8 = 32;

/// Native address of a blob in the content store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentAddress(String);

impl ContentAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentAddress {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentDigest::from_address_str(s).map(|digest| digest.to_address())
    }
}

/// Canonical 32 byte sha2-256 digest, the ledger-facing content reference.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hashes `data` the way the content store does.
    pub fn of(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Encodes the digest as a CIDv0 content address.
    pub fn to_address(&self) -> ContentAddress {
        let mut multihash = Vec::with_capacity(34);
        multihash.push(SHA2_256_CODE as u8);
        multihash.push(SHA2_256_LEN);
        multihash.extend_from_slice(&self.0);
        ContentAddress(bs58::encode(multihash).into_string())
    }

    /// Extracts the digest from a content address.
    pub fn from_address(address: &ContentAddress) -> Result<Self, ContentError> {
        Self::from_address_str(address.as_str())
    }

    fn from_address_str(address: &str) -> Result<Self, ContentError> {
        let cid = Cid::from_str(address)
            .map_err(|e| ContentError::InvalidAddress(format!("{address}: {e}")))?;

        let hash = cid.hash();
        if hash.code() != SHA2_256_CODE {
            return Err(ContentError::InvalidAddress(format!(
                "{address}: unsupported multihash code 0x{:x}",
                hash.code()
            )));
        }

        let bytes: [u8; 32] = hash.digest().try_into().map_err(|_| {
            ContentError::InvalidAddress(format!(
                "{address}: expected 32 digest bytes, got {}",
                hash.digest().len()
            ))
        })?;

        Ok(Self(bytes))
    }

    /// `0x` prefixed lowercase hex, the form used on the ledger.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn from_hex(s: &str) -> Result<Self, ContentError> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(raw, &mut bytes)
            .map_err(|e| ContentError::InvalidDigest(format!("{s}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", self.to_hex())
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
