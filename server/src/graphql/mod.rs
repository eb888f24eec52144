mod calendar;
mod directory;

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, Object, Schema, SimpleObject};
use platform_api::{ApiResult, internal_error};
use platform_store::ObjectStore;
use products_calendar::EventStore;
use products_directory::DirectoryStore;
use serde::Serialize;
use tracing::instrument;

use crate::prefs::{Preferences, PreferencesPatch, PrefsStore};

pub use calendar::{CalendarMutation, CalendarQuery, EventNode};
pub use directory::{DirectoryMutation, DirectoryQuery, TeammateNode};

pub type HubSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Shared handles every resolver reaches through the schema context.
#[derive(Clone)]
pub struct GraphqlData {
    pub directory: Arc<dyn DirectoryStore>,
    pub events: Arc<dyn EventStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub prefs: Arc<PrefsStore>,
    pub export_slug: String,
}

pub fn build_schema(data: GraphqlData) -> HubSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(data)
        .finish()
}

/// Unconfigured schema used for SDL export.
pub fn schema_sdl() -> String {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .finish()
        .sdl()
}

fn hub_data<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a GraphqlData> {
    ctx.data::<GraphqlData>()
        .map_err(|_| internal_error(anyhow::anyhow!("schema built without GraphqlData")))
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    #[instrument(name = "graphql.health", skip_all)]
    async fn health(&self) -> ApiResult<HealthPayload> {
        Ok(HealthPayload { ok: true })
    }

    #[instrument(name = "graphql.version", skip_all)]
    async fn version(&self) -> ApiResult<String> {
        Ok(env!("CARGO_PKG_VERSION").to_string())
    }

    async fn directory(&self) -> DirectoryQuery {
        DirectoryQuery
    }

    async fn calendar(&self) -> CalendarQuery {
        CalendarQuery
    }

    #[instrument(name = "graphql.preferences", skip_all)]
    async fn preferences(&self, ctx: &Context<'_>) -> async_graphql::Result<Preferences> {
        Ok(hub_data(ctx)?.prefs.get().await)
    }
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn directory(&self) -> DirectoryMutation {
        DirectoryMutation
    }

    async fn calendar(&self) -> CalendarMutation {
        CalendarMutation
    }

    #[instrument(name = "graphql.update_preferences", skip_all)]
    async fn update_preferences(
        &self,
        ctx: &Context<'_>,
        input: PreferencesPatch,
    ) -> async_graphql::Result<Preferences> {
        hub_data(ctx)?
            .prefs
            .update(input)
            .await
            .map_err(internal_error)
    }
}

#[derive(Clone, Debug, SimpleObject, Serialize)]
pub struct HealthPayload {
    pub ok: bool,
}
