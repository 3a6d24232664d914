//! The two GraphQL schemas: the public auth schema (token issuance and
//! credential-guarded record mutations) and the protected user schema
//! (read-only lookup and listing). Resolvers are thin delegations to the
//! services held in schema data.

pub mod auth_schema;
pub mod user_schema;

pub use auth_schema::{build_auth_schema, AuthSchema};
pub use user_schema::{build_user_schema, UserSchema};

use async_graphql::SimpleObject;

use crate::storage::User;

/// User type shared by both schemas.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "User")]
pub struct GqlUser {
    pub name: String,
    pub email: String,
    /// The stored password hash
    pub password: String,
    pub level: i64,
}

impl From<User> for GqlUser {
    fn from(user: User) -> Self {
        Self { name: user.name, email: user.email, password: user.password, level: user.level }
    }
}
