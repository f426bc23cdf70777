//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `PaymentId` where a
//! `BillId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(BillId, "Unique identifier for a bill.");
typed_id!(PaymentId, "Unique identifier for a payment on a bill.");
typed_id!(BillItemId, "Unique identifier for a line item on a bill.");
typed_id!(
    ReceivedItemId,
    "Unique identifier for a garment received from a customer."
);
typed_id!(CustomerId, "Unique identifier for a customer.");
typed_id!(ServiceId, "Unique identifier for a tailoring service offering.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_ids_are_unique() {
        let a = BillId::new();
        let b = BillId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_roundtrip_via_str() {
        let id = PaymentId::new();
        let parsed = PaymentId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_id_from_uuid() {
        let uuid = Uuid::now_v7();
        let id = BillItemId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = CustomerId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: CustomerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_parse_rejects_garbage() {
        assert!(BillId::from_str("not-a-uuid").is_err());
    }
}
