pub mod graphql_client;
pub mod health_handler;
pub mod proxy_handler;
pub mod schema_store;
pub mod ui_handler;
