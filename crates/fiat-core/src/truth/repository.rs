//! Truth board repository trait.

use async_trait::async_trait;

use super::model::{NewTruthPost, TruthPost};
use crate::error::Result;

/// Read and append access to the shared board.
#[async_trait]
pub trait TruthRepository: Send + Sync {
    /// Newest posts first, at most `limit`.
    async fn list(&self, limit: usize) -> Result<Vec<TruthPost>>;

    async fn insert(&self, post: &NewTruthPost) -> Result<TruthPost>;
}
