//! Persistence seam consumed by the importer

use anyhow::Result;
use async_trait::async_trait;

use crate::records::{CommunityRef, DerivedFields, NewCommunity, NewProperty};

/// Store operations an import needs. Each call is its own unit of work;
/// the importer never groups rows into a transaction.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a community, returning its id
    async fn insert_community(&self, community: &NewCommunity) -> Result<i64>;

    /// Insert a property with its already-computed derived fields
    async fn insert_property(&self, property: &NewProperty, derived: &DerivedFields) -> Result<i64>;

    /// Every stored community's id and name
    async fn list_communities(&self) -> Result<Vec<CommunityRef>>;
}
