pub mod me;
pub mod members;
pub mod orgs;
