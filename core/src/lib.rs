//! # infraview-core
//!
//! Target-independent logic shared by the native host and the browser UI.
//!
//! Everything in this crate is synchronous and free of I/O: it turns a schema
//! document fetched from the remote API into query documents, form field
//! descriptors and mutation inputs, and it models the few pieces of UI state
//! that need more than a signal (the two-step cascading select).
//!
//! ## Layout
//!
//! - [`schema`]: node, generic, attribute and relationship definitions
//! - [`snapshot`]: an immutable, indexed view over one fetched schema document
//! - [`row`]: typed object rows parsed from GraphQL node payloads
//! - [`query`]: GraphQL document model, builders and the query state hook type
//! - [`form`]: form-structure deriver and mutation input builder
//! - [`select2step`]: the cascading parent/child select state machine
//! - [`dropdown`], [`permissions`], [`branch`], [`layout`]: view helpers

pub mod branch;
pub mod dropdown;
pub mod error;
pub mod form;
pub mod layout;
pub mod permissions;
pub mod query;
pub mod row;
pub mod schema;
pub mod select2step;
pub mod snapshot;

pub use error::SchemaError;
pub use snapshot::SchemaSnapshot;
