use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type AccountId = u32;
pub type VendorId = u32;
pub type UserId = u32;

/// Physical location of a vendor branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Location {
    pub fn new(
        city: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
            country: country.into(),
        }
    }
}

/// The two kinds of balance-holding entities in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountKind {
    /// Physical gold stock held at a vendor branch.
    BranchStock {
        vendor_id: VendorId,
        location: Location,
    },
    /// Virtual gold owned by a user, backed by stock at a linked branch.
    VirtualHolding {
        user_id: UserId,
        branch_id: AccountId,
    },
}

/// A balance-holding account. The quantity itself lives in the balance
/// store; this is the directory entry describing who owns it and where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub kind: AccountKind,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a branch stock account.
    pub fn branch(id: AccountId, vendor_id: VendorId, location: Location) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind: AccountKind::BranchStock {
                vendor_id,
                location,
            },
            metadata: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a virtual holding account linked to the branch backing it.
    pub fn holding(id: AccountId, user_id: UserId, branch_id: AccountId) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind: AccountKind::VirtualHolding { user_id, branch_id },
            metadata: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.kind, AccountKind::BranchStock { .. })
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.kind, AccountKind::VirtualHolding { .. })
    }

    /// Returns true if both accounts hold the same kind of balance, the
    /// precondition for transferring between them.
    pub fn same_kind(&self, other: &Account) -> bool {
        matches!(
            (&self.kind, &other.kind),
            (
                AccountKind::BranchStock { .. },
                AccountKind::BranchStock { .. }
            ) | (
                AccountKind::VirtualHolding { .. },
                AccountKind::VirtualHolding { .. }
            )
        )
    }

    pub fn vendor_id(&self) -> Option<VendorId> {
        match self.kind {
            AccountKind::BranchStock { vendor_id, .. } => Some(vendor_id),
            AccountKind::VirtualHolding { .. } => None,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self.kind {
            AccountKind::VirtualHolding { user_id, .. } => Some(user_id),
            AccountKind::BranchStock { .. } => None,
        }
    }

    /// The branch where a holding's backing gold physically sits.
    pub fn linked_branch(&self) -> Option<AccountId> {
        match self.kind {
            AccountKind::VirtualHolding { branch_id, .. } => Some(branch_id),
            AccountKind::BranchStock { .. } => None,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match &self.kind {
            AccountKind::BranchStock { location, .. } => Some(location),
            AccountKind::VirtualHolding { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mumbai() -> Location {
        Location::new("Mumbai", "Maharashtra", "India")
    }

    #[test]
    fn test_branch_creation() {
        let branch = Account::branch(1, 10, mumbai());
        assert!(branch.is_branch());
        assert!(!branch.is_holding());
        assert_eq!(branch.vendor_id(), Some(10));
        assert_eq!(branch.user_id(), None);
        assert_eq!(branch.linked_branch(), None);
        assert_eq!(branch.location().map(|l| l.city.as_str()), Some("Mumbai"));
    }

    #[test]
    fn test_holding_creation() {
        let holding = Account::holding(2, 42, 1);
        assert!(holding.is_holding());
        assert_eq!(holding.user_id(), Some(42));
        assert_eq!(holding.linked_branch(), Some(1));
        assert_eq!(holding.vendor_id(), None);
    }

    #[test]
    fn test_same_kind() {
        let a = Account::branch(1, 10, mumbai());
        let b = Account::branch(2, 11, Location::new("Pune", "Maharashtra", "India"));
        let h = Account::holding(3, 42, 1);

        assert!(a.same_kind(&b));
        assert!(!a.same_kind(&h));
        assert!(h.same_kind(&Account::holding(4, 43, 2)));
    }

    #[test]
    fn test_with_metadata() {
        let metadata = serde_json::json!({"manager": "A. Rao"});
        let branch = Account::branch(1, 10, mumbai()).with_metadata(metadata.clone());
        assert_eq!(branch.metadata, Some(metadata));
    }

    #[test]
    fn test_serialization_round_trip() {
        let holding = Account::holding(2, 42, 1);
        let json = serde_json::to_string(&holding).unwrap();
        let back: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(back, holding);
    }
}
