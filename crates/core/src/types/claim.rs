//! Identity claim carried between requests.
//!
//! The claim is produced by the auth boundary and refreshed by every operation
//! that changes a user's membership. Family and role travel together as an
//! [`Affiliation`], so "a family without a role" cannot be expressed.
//!
//! On the wire the claim keeps the flat shape clients expect:
//!
//! ```json
//! { "userId": 1, "email": "a@b.c", "familyId": 7, "role": "admin" }
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Email, FamilyId, FamilyRole, UserId};

/// A user's relationship to a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affiliation {
    /// Not in any family.
    Unaffiliated,
    /// Regular member of the family.
    Member {
        /// The family.
        family_id: FamilyId,
    },
    /// Creator of the family.
    Admin {
        /// The family.
        family_id: FamilyId,
    },
}

impl Affiliation {
    /// Build an affiliation from a stored membership.
    #[must_use]
    pub const fn from_membership(family_id: FamilyId, role: FamilyRole) -> Self {
        match role {
            FamilyRole::Admin => Self::Admin { family_id },
            FamilyRole::Member => Self::Member { family_id },
        }
    }

    /// The family, if any.
    #[must_use]
    pub const fn family_id(self) -> Option<FamilyId> {
        match self {
            Self::Unaffiliated => None,
            Self::Member { family_id } | Self::Admin { family_id } => Some(family_id),
        }
    }

    /// The role, if any.
    #[must_use]
    pub const fn role(self) -> Option<FamilyRole> {
        match self {
            Self::Unaffiliated => None,
            Self::Member { .. } => Some(FamilyRole::Member),
            Self::Admin { .. } => Some(FamilyRole::Admin),
        }
    }
}

/// Authenticated identity plus the caller's current affiliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    /// Authenticated user.
    pub user_id: UserId,
    /// The user's email.
    pub email: Email,
    /// Family membership at the time the claim was issued.
    pub affiliation: Affiliation,
}

impl IdentityClaim {
    /// Claim for a user with the given affiliation.
    #[must_use]
    pub const fn new(user_id: UserId, email: Email, affiliation: Affiliation) -> Self {
        Self {
            user_id,
            email,
            affiliation,
        }
    }

    /// Same identity, new affiliation.
    #[must_use]
    pub fn with_affiliation(&self, affiliation: Affiliation) -> Self {
        Self {
            user_id: self.user_id,
            email: self.email.clone(),
            affiliation,
        }
    }

    /// The family in the claim, if any.
    #[must_use]
    pub const fn family_id(&self) -> Option<FamilyId> {
        self.affiliation.family_id()
    }
}

/// Flat wire representation.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClaimRepr {
    user_id: UserId,
    email: Email,
    family_id: Option<FamilyId>,
    role: Option<FamilyRole>,
}

impl Serialize for IdentityClaim {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ClaimRepr {
            user_id: self.user_id,
            email: self.email.clone(),
            family_id: self.affiliation.family_id(),
            role: self.affiliation.role(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for IdentityClaim {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = ClaimRepr::deserialize(deserializer)?;
        let affiliation = match (repr.family_id, repr.role) {
            (None, None) => Affiliation::Unaffiliated,
            (Some(family_id), Some(role)) => Affiliation::from_membership(family_id, role),
            _ => {
                return Err(serde::de::Error::custom(
                    "familyId and role must both be set or both be null",
                ));
            }
        };
        Ok(Self {
            user_id: repr.user_id,
            email: repr.email,
            affiliation,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn claim(affiliation: Affiliation) -> IdentityClaim {
        IdentityClaim::new(
            UserId::new(3),
            Email::parse("kid@family.test").unwrap(),
            affiliation,
        )
    }

    #[test]
    fn test_serialize_unaffiliated_uses_nulls() {
        let value = serde_json::to_value(claim(Affiliation::Unaffiliated)).unwrap();
        assert_eq!(
            value,
            json!({"userId": 3, "email": "kid@family.test", "familyId": null, "role": null})
        );
    }

    #[test]
    fn test_serialize_admin() {
        let value = serde_json::to_value(claim(Affiliation::Admin {
            family_id: FamilyId::new(8),
        }))
        .unwrap();
        assert_eq!(value["familyId"], 8);
        assert_eq!(value["role"], "admin");
    }

    #[test]
    fn test_deserialize_rejects_half_filled_claim() {
        let value = json!({"userId": 3, "email": "kid@family.test", "familyId": 8, "role": null});
        assert!(serde_json::from_value::<IdentityClaim>(value).is_err());
    }

    #[test]
    fn test_with_affiliation_keeps_identity() {
        let original = claim(Affiliation::Admin {
            family_id: FamilyId::new(1),
        });
        let left = original.with_affiliation(Affiliation::Unaffiliated);
        assert_eq!(left.user_id, original.user_id);
        assert_eq!(left.email, original.email);
        assert_eq!(left.family_id(), None);
    }

    #[test]
    fn test_from_membership() {
        let member = Affiliation::from_membership(FamilyId::new(2), FamilyRole::Member);
        assert_eq!(member.role(), Some(FamilyRole::Member));
        assert_eq!(member.family_id(), Some(FamilyId::new(2)));
    }
}
