//! SQLite-backed record store used by the importer

use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::import::RecordStore;
use crate::records::{CommunityRef, DerivedFields, NewCommunity, NewProperty};

#[async_trait]
impl RecordStore for SqlitePool {
    async fn insert_community(&self, community: &NewCommunity) -> Result<i64> {
        super::insert_community(self, community).await
    }

    async fn insert_property(&self, property: &NewProperty, derived: &DerivedFields) -> Result<i64> {
        super::insert_property(self, property, derived).await
    }

    async fn list_communities(&self) -> Result<Vec<CommunityRef>> {
        super::list_community_refs(self).await
    }
}
