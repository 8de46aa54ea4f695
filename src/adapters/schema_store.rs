use infraview_core::SchemaSnapshot;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::adapters::graphql_client::{ClientError, GraphqlClient};

/// Holds the schema snapshot every request reads.
///
/// A reload builds a complete new snapshot before swapping it in, so readers
/// see either the old schema or the new one, never a mix.
#[derive(Clone, Default)]
pub struct SchemaStore {
    snapshot: Arc<RwLock<Arc<SchemaSnapshot>>>,
}

impl SchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: SchemaSnapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    pub async fn snapshot(&self) -> Arc<SchemaSnapshot> {
        self.snapshot.read().await.clone()
    }

    /// True once a non-empty schema has been loaded
    pub async fn is_loaded(&self) -> bool {
        !self.snapshot.read().await.is_empty()
    }

    pub async fn replace(&self, snapshot: SchemaSnapshot) {
        let mut current = self.snapshot.write().await;
        *current = Arc::new(snapshot);
    }

    /// Fetch the schema again and swap it in. On error the previous snapshot
    /// stays in place.
    pub async fn reload(
        &self,
        client: &GraphqlClient,
        branch: Option<&str>,
    ) -> Result<Arc<SchemaSnapshot>, ClientError> {
        let fresh = Arc::new(client.fetch_schema(branch).await?);
        info!(
            nodes = fresh.nodes().len(),
            generics = fresh.generics().len(),
            "Schema reloaded"
        );
        let mut current = self.snapshot.write().await;
        *current = fresh.clone();
        Ok(fresh)
    }
}
