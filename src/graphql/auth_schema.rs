//! The public auth schema: login plus the account mutations.
//!
//! Misses and conflicts resolve to `null` fields; store timeouts and other
//! failures surface as GraphQL errors carrying the structured error message.

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, Object, Schema, SimpleObject};

use super::GqlUser;
use crate::auth::AuthService;

pub type AuthSchema = Schema<AuthQuery, AuthMutation, EmptySubscription>;

/// Issued bearer token.
#[derive(Debug, Clone, SimpleObject)]
pub struct Token {
    pub token: String,
}

pub struct AuthQuery;

#[Object]
impl AuthQuery {
    /// Authenticate with email and password. Resolves to `null` on unknown
    /// email or wrong password.
    async fn login(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> async_graphql::Result<Option<Token>> {
        let service = ctx.data_unchecked::<Arc<AuthService>>();
        Ok(service.login(&email, &password).await?.map(|token| Token { token }))
    }
}

pub struct AuthMutation;

#[Object]
impl AuthMutation {
    /// Create an account and obtain a token for it. Resolves to `null` when
    /// the email is already taken.
    async fn register(
        &self,
        ctx: &Context<'_>,
        name: String,
        email: String,
        password: String,
        level: i64,
    ) -> async_graphql::Result<Option<Token>> {
        let service = ctx.data_unchecked::<Arc<AuthService>>();
        Ok(service
            .register(&name, &email, &password, level)
            .await?
            .map(|token| Token { token }))
    }

    /// Re-set the password used to authenticate. Resolves to `null` when the
    /// credentials don't match.
    async fn change_password(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> async_graphql::Result<Option<GqlUser>> {
        let service = ctx.data_unchecked::<Arc<AuthService>>();
        Ok(service.change_password(&email, &password).await?.map(GqlUser::from))
    }

    /// Replace the account's password with a generated one.
    async fn reset_password(
        &self,
        ctx: &Context<'_>,
        email: String,
    ) -> async_graphql::Result<Option<GqlUser>> {
        let service = ctx.data_unchecked::<Arc<AuthService>>();
        Ok(service.reset_password(&email).await?.map(GqlUser::from))
    }

    /// Change the account email after authenticating.
    async fn change_email(
        &self,
        ctx: &Context<'_>,
        email: String,
        new_email: String,
        password: String,
    ) -> async_graphql::Result<Option<GqlUser>> {
        let service = ctx.data_unchecked::<Arc<AuthService>>();
        Ok(service.change_email(&email, &password, &new_email).await?.map(GqlUser::from))
    }

    /// Change the display name after authenticating.
    async fn change_name(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
        new_name: String,
    ) -> async_graphql::Result<Option<GqlUser>> {
        let service = ctx.data_unchecked::<Arc<AuthService>>();
        Ok(service.change_name(&email, &password, &new_name).await?.map(GqlUser::from))
    }
}

/// Build the auth schema with its backing service.
pub fn build_auth_schema(service: Arc<AuthService>) -> AuthSchema {
    Schema::build(AuthQuery, AuthMutation, EmptySubscription).data(service).finish()
}
