use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Membership lifecycle. Only `Active` satisfies tenancy resolution;
/// `Pending` is surfaced as "awaiting approval", `Rejected` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MembershipStatus {
    Pending,
    Active,
    Rejected,
}
