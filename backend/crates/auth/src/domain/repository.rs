//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::user::{NewUser, User};
use crate::domain::value_object::UserId;
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by account identifier
    async fn find_by_account_identifier(&self, account_identifier: &str)
    -> AuthResult<Option<User>>;

    /// Stored password hash (PHC string) for basic accounts
    async fn find_password_hash(&self, user_id: &UserId) -> AuthResult<Option<String>>;

    /// Return the user with this account identifier, creating it if absent
    async fn get_or_create(&self, user: &NewUser) -> AuthResult<User>;

    /// Insert a new user; `UserExists` if the identifier is taken
    async fn create(&self, user: &NewUser) -> AuthResult<User>;
}
