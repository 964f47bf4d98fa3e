use async_trait::async_trait;
use fiat_core::truth::{NewTruthPost, TRUTH_TABLE, TruthPost, TruthRepository};
use fiat_core::{FiatError, Result};

use super::client::{Access, RemoteClient};
use super::query::RowQuery;

const COLUMNS: &str = "id,text,author,created_at,user_id";

/// The shared board. Readable without signing in; inserting needs a user.
#[derive(Clone)]
pub struct RemoteTruthRepository {
    client: RemoteClient,
}

impl RemoteTruthRepository {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TruthRepository for RemoteTruthRepository {
    async fn list(&self, limit: usize) -> Result<Vec<TruthPost>> {
        let query = RowQuery::new()
            .select(COLUMNS)
            .order("created_at", false)
            .limit(limit);
        self.client.select(TRUTH_TABLE, &query, Access::Public).await
    }

    async fn insert(&self, post: &NewTruthPost) -> Result<TruthPost> {
        let query = RowQuery::new().select(COLUMNS);
        let rows: Vec<TruthPost> = self
            .client
            .insert(TRUTH_TABLE, std::slice::from_ref(post), &query, Access::User)
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| FiatError::internal("insert into truth_board returned no row"))
    }
}
