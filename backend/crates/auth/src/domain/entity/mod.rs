pub mod claims;
pub mod user;
