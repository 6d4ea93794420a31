pub mod membership_status;
pub mod organization_id;
pub mod role;
pub mod user_id;

pub use membership_status::MembershipStatus;
pub use organization_id::OrganizationId;
pub use role::{MembershipRole, Role};
pub use user_id::UserId;
