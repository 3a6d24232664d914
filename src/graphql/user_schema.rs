//! The protected user schema: read-only lookups against the user store.
//! No timeout guard here; these queries hit the store directly.

use std::sync::Arc;

use async_graphql::{Context, EmptyMutation, EmptySubscription, Object, Schema};

use super::GqlUser;
use crate::storage::UserStore;

pub type UserSchema = Schema<UserQuery, EmptyMutation, EmptySubscription>;

pub struct UserQuery;

#[Object]
impl UserQuery {
    /// Look up a single account by email.
    async fn find_by_email(
        &self,
        ctx: &Context<'_>,
        email: String,
    ) -> async_graphql::Result<Option<GqlUser>> {
        let store = ctx.data_unchecked::<Arc<dyn UserStore>>();
        Ok(store.find_one(&email).await?.map(GqlUser::from))
    }

    /// Materialize every account. Unbounded by design.
    async fn list_all(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<GqlUser>> {
        let store = ctx.data_unchecked::<Arc<dyn UserStore>>();
        Ok(store.find_all().await?.into_iter().map(GqlUser::from).collect())
    }
}

/// Build the user schema with its backing store.
pub fn build_user_schema(store: Arc<dyn UserStore>) -> UserSchema {
    Schema::build(UserQuery, EmptyMutation, EmptySubscription).data(store).finish()
}
