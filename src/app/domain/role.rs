use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Role stored on a membership row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")] // Serialize as lowercase string
#[strum(serialize_all = "lowercase")] // Display/FromStr as lowercase string
pub enum MembershipRole {
    Admin,
    Staff,
    Referrer,
}

/// Role a request resolves to. `SuperAdmin` never appears on a membership row;
/// it comes from the super-admin registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Staff,
    Referrer,
}

impl Role {
    /// Whether this role satisfies the org-admin gate.
    pub fn is_org_admin(self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }
}

impl From<MembershipRole> for Role {
    fn from(role: MembershipRole) -> Self {
        match role {
            MembershipRole::Admin => Role::Admin,
            MembershipRole::Staff => Role::Staff,
            MembershipRole::Referrer => Role::Referrer,
        }
    }
}
