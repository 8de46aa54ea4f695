//! Shared UI state
//!
//! The active branch lives in the URL (`?branch=<name>`). The schema of that
//! branch is held by a [`SchemaContext`] provided at the root of the app and
//! replaced wholesale whenever the branch changes or a reload is requested.

use std::sync::Arc;

use infraview_core::branch::{with_branch_param, BRANCH_QUERY_PARAM};
use infraview_core::query::{GraphqlRequest, QueryState};
use infraview_core::SchemaSnapshot;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;
use serde_json::Value;

use crate::api;

/// Branch named by the current URL; `None` means the default branch
pub fn use_branch() -> Memo<Option<String>> {
    let query = use_query_map();
    Memo::new(move |_| {
        query
            .read()
            .get(BRANCH_QUERY_PARAM)
            .filter(|b| !b.is_empty())
    })
}

/// `path` carrying the active branch, for links inside the app
pub fn branch_href(path: &str, branch: Option<&str>) -> String {
    with_branch_param(path, branch)
}

#[derive(Clone, Copy)]
pub struct SchemaContext {
    state: RwSignal<QueryState<Arc<SchemaSnapshot>>>,
    generation: StoredValue<u64>,
}

impl SchemaContext {
    pub fn state(&self) -> QueryState<Arc<SchemaSnapshot>> {
        self.state.get()
    }

    /// Loaded snapshot, or an empty one while loading or after a failure
    pub fn snapshot(&self) -> Arc<SchemaSnapshot> {
        self.state
            .with(|s| s.data().cloned())
            .unwrap_or_else(|| Arc::new(SchemaSnapshot::empty()))
    }

    /// Fetch the schema of `branch` and replace the current snapshot.
    ///
    /// Only the latest reload applies its result.
    pub fn reload(&self, branch: Option<String>) {
        let generation = self.generation.get_value() + 1;
        self.generation.set_value(generation);
        self.state.set(QueryState::Loading);

        let ctx = *self;
        spawn_local(async move {
            let result = api::fetch_schema(branch.as_deref()).await;
            if ctx.generation.try_get_value() != Some(generation) {
                log::debug!("Dropping schema of superseded branch {:?}", branch);
                return;
            }
            match &result {
                Ok(snapshot) => log::info!(
                    "Loaded schema: {} nodes, {} generics",
                    snapshot.nodes().len(),
                    snapshot.generics().len()
                ),
                Err(e) => log::error!("Failed to load schema: {}", e),
            }
            ctx.state.try_set(QueryState::from(result.map(Arc::new)));
        });
    }
}

/// Create the schema context and keep it in sync with the URL's branch.
/// Must be called under the router.
pub fn provide_schema_context() -> SchemaContext {
    let ctx = SchemaContext {
        state: RwSignal::new(QueryState::Loading),
        generation: StoredValue::new(0),
    };
    let branch = use_branch();
    Effect::new(move |_| {
        ctx.reload(branch.get());
    });
    provide_context(ctx);
    ctx
}

pub fn use_schema() -> SchemaContext {
    expect_context::<SchemaContext>()
}

/// Result of [`use_query`]
#[derive(Clone, Copy)]
pub struct QueryHandle {
    resource: LocalResource<QueryState<Value>>,
}

impl QueryHandle {
    pub fn state(&self) -> QueryState<Value> {
        self.resource.get().unwrap_or_default()
    }

    pub fn refetch(&self) {
        self.resource.refetch();
    }
}

/// Issue the request built by `build` on the active branch, again whenever
/// a signal it reads changes
pub fn use_query<F>(build: F) -> QueryHandle
where
    F: Fn() -> GraphqlRequest + 'static,
{
    let branch = use_branch();
    let resource = LocalResource::new(move || {
        let request = build();
        let branch = branch.get();
        async move { QueryState::from(api::execute(&request, branch.as_deref()).await) }
    });
    QueryHandle { resource }
}
