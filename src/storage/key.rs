//! Object keys

use serde::{Deserialize, Serialize};

use crate::core::Address;

/// Location of a stored object: owning contract, logical space, key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectKey {
    /// Contract that owns the object
    pub zone: Address,
    /// Logical space within the zone
    pub space: u32,
    pub key: Vec<u8>,
}

impl ObjectKey {
    pub fn new(zone: Address, space: u32, key: &[u8]) -> Self {
        Self {
            zone,
            space,
            key: key.to_vec(),
        }
    }

    /// Encoded form used as the sled key
    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ADDRESS_SIZE;

    #[test]
    fn test_encoded_keys_differ_by_space() {
        let zone = Address::new([1u8; ADDRESS_SIZE]);
        let a = ObjectKey::new(zone, 0, b"k").encode().unwrap();
        let b = ObjectKey::new(zone, 1, b"k").encode().unwrap();
        assert_ne!(a, b);
        assert_eq!(ObjectKey::decode(&a).unwrap(), ObjectKey::new(zone, 0, b"k"));
    }
}
