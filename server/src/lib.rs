//! Hub server: HTTP routes, the GraphQL schema, viewer preferences and the
//! helpers behind the `hub` CLI.

pub mod commands;
pub mod config;
pub mod graphql;
pub mod http;
pub mod prefs;

pub use config::AppConfig;
pub use graphql::{GraphqlData, HubSchema, build_schema, schema_sdl};
pub use http::{AppState, ServeConfig, build_router, serve};
