pub mod access_tokens;
pub mod memberships;
pub mod organizations;
pub mod super_admins;
pub mod users;

pub use memberships::{MembershipRow, NewMembership};
pub use organizations::{NewOrganization, Organization};
pub use users::{NewUser, User};
