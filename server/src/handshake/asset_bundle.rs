use ring::digest;

use facade_shared::{AssetBundlePush, BundleHash, Text};

/// An asset bundle peers are asked to install: where to fetch it and the
/// SHA-1 digest they verify it against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBundle {
    address: String,
    hash: BundleHash,
}

impl AssetBundle {
    pub fn new(address: &str, hash: BundleHash) -> Self {
        Self {
            address: address.to_string(),
            hash,
        }
    }

    /// Describes the bundle served at `address`, hashing its contents
    pub fn from_bytes(address: &str, bytes: &[u8]) -> Self {
        let digest = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, bytes);
        let mut hash = [0u8; 20];
        hash.copy_from_slice(digest.as_ref());
        Self::new(address, BundleHash(hash))
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn hash(&self) -> BundleHash {
        self.hash
    }

    pub fn push_packet(&self, required: bool, message: Option<Text>) -> AssetBundlePush {
        AssetBundlePush {
            address: self.address.clone(),
            hash: self.hash,
            required,
            message,
        }
    }
}
