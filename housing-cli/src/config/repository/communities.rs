//! Community repository

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::records::{Community, CommunityRef, CommunityUpdate, NewCommunity};

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 500;

pub(crate) fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Listing filter for communities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityFilter {
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for CommunityFilter {
    fn default() -> Self {
        Self {
            district: None,
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

const COMMUNITY_COLUMNS: [&str; 16] = [
    "id",
    "name",
    "district",
    "address",
    "property_fee",
    "parking",
    "build_year",
    "metro",
    "primary_school",
    "middle_school",
    "environment_score",
    "photos",
    "videos",
    "notes",
    "created_at",
    "updated_at",
];

/// Select list for a joined community table `alias`, each column renamed
/// with `prefix` (`c.id AS c_id, ...`)
pub(super) fn prefixed_community_columns(alias: &str, prefix: &str) -> String {
    COMMUNITY_COLUMNS
        .iter()
        .map(|column| format!("{alias}.{column} AS {prefix}{column}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn community_from_row(row: &SqliteRow) -> Result<Community> {
    community_from_prefixed_row(row, "")
}

/// Map community columns read under `prefix`
pub(super) fn community_from_prefixed_row(row: &SqliteRow, prefix: &str) -> Result<Community> {
    let col = |name: &str| format!("{}{}", prefix, name);
    Ok(Community {
        id: row.try_get(col("id").as_str())?,
        name: row.try_get(col("name").as_str())?,
        district: row.try_get(col("district").as_str())?,
        address: row.try_get(col("address").as_str())?,
        property_fee: row.try_get(col("property_fee").as_str())?,
        parking: row.try_get(col("parking").as_str())?,
        build_year: row.try_get(col("build_year").as_str())?,
        metro: row.try_get(col("metro").as_str())?,
        primary_school: row.try_get(col("primary_school").as_str())?,
        middle_school: row.try_get(col("middle_school").as_str())?,
        environment_score: row.try_get(col("environment_score").as_str())?,
        photos: row.try_get(col("photos").as_str())?,
        videos: row.try_get(col("videos").as_str())?,
        notes: row.try_get(col("notes").as_str())?,
        created_at: row.try_get(col("created_at").as_str())?,
        updated_at: row.try_get(col("updated_at").as_str())?,
    })
}

/// Insert a community and return its id
pub async fn insert_community(pool: &SqlitePool, community: &NewCommunity) -> Result<i64> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO communities (
            name, district, address, property_fee, parking, build_year, metro,
            primary_school, middle_school, environment_score, photos, videos, notes,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&community.name)
    .bind(&community.district)
    .bind(&community.address)
    .bind(&community.property_fee)
    .bind(&community.parking)
    .bind(community.build_year)
    .bind(&community.metro)
    .bind(&community.primary_school)
    .bind(&community.middle_school)
    .bind(community.environment_score)
    .bind(&community.photos)
    .bind(&community.videos)
    .bind(&community.notes)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to insert community")?;

    Ok(result.last_insert_rowid())
}

/// Insert a community and return the stored record
pub async fn create_community(pool: &SqlitePool, community: &NewCommunity) -> Result<Community> {
    let id = insert_community(pool, community).await?;
    get_community(pool, id)
        .await?
        .with_context(|| format!("Community {} vanished after insert", id))
}

pub async fn get_community(pool: &SqlitePool, id: i64) -> Result<Option<Community>> {
    let row = sqlx::query("SELECT * FROM communities WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get community")?;

    row.as_ref().map(community_from_row).transpose()
}

/// List communities, optionally restricted to one district
pub async fn list_communities(pool: &SqlitePool, filter: &CommunityFilter) -> Result<Vec<Community>> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM communities");
    if let Some(district) = &filter.district {
        query.push(" WHERE district = ").push_bind(district.clone());
    }
    query
        .push(" ORDER BY id LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.skip);

    let rows = query
        .build()
        .fetch_all(pool)
        .await
        .context("Failed to list communities")?;

    rows.iter().map(community_from_row).collect()
}

/// Every community, oldest first
pub async fn list_all_communities(pool: &SqlitePool) -> Result<Vec<Community>> {
    let rows = sqlx::query("SELECT * FROM communities ORDER BY id")
        .fetch_all(pool)
        .await
        .context("Failed to list communities")?;

    rows.iter().map(community_from_row).collect()
}

/// Id and name of every community, oldest first
pub async fn list_community_refs(pool: &SqlitePool) -> Result<Vec<CommunityRef>> {
    let rows: Vec<(i64, String)> = sqlx::query_as("SELECT id, name FROM communities ORDER BY id")
        .fetch_all(pool)
        .await
        .context("Failed to list community names")?;

    Ok(rows
        .into_iter()
        .map(|(id, name)| CommunityRef { id, name })
        .collect())
}

/// Apply a partial update. Returns `None` when the community does not exist.
pub async fn update_community(
    pool: &SqlitePool,
    id: i64,
    update: CommunityUpdate,
) -> Result<Option<Community>> {
    let Some(mut community) = get_community(pool, id).await? else {
        return Ok(None);
    };

    community.apply_update(update);
    community.updated_at = Utc::now();

    sqlx::query(
        r#"
        UPDATE communities SET
            name = ?, district = ?, address = ?, property_fee = ?, parking = ?,
            build_year = ?, metro = ?, primary_school = ?, middle_school = ?,
            environment_score = ?, photos = ?, videos = ?, notes = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&community.name)
    .bind(&community.district)
    .bind(&community.address)
    .bind(&community.property_fee)
    .bind(&community.parking)
    .bind(community.build_year)
    .bind(&community.metro)
    .bind(&community.primary_school)
    .bind(&community.middle_school)
    .bind(community.environment_score)
    .bind(&community.photos)
    .bind(&community.videos)
    .bind(&community.notes)
    .bind(community.updated_at)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update community")?;

    Ok(Some(community))
}

/// Delete a community and, through the foreign key, its properties.
/// Returns whether a row was deleted.
pub async fn delete_community(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM communities WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete community")?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::repository::{create_property, get_property, test_pool};
    use crate::records::NewProperty;

    fn new_community(name: &str, district: &str) -> NewCommunity {
        NewCommunity {
            name: name.to_string(),
            district: Some(district.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = test_pool().await;
        let created = create_community(&pool, &new_community("A", "徐汇区")).await.unwrap();

        let fetched = get_community(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(get_community(&pool, created.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_by_district_and_pages() {
        let pool = test_pool().await;
        for (name, district) in [("A", "徐汇区"), ("B", "静安区"), ("C", "徐汇区"), ("D", "徐汇区")] {
            create_community(&pool, &new_community(name, district)).await.unwrap();
        }

        let filter = CommunityFilter {
            district: Some("徐汇区".to_string()),
            ..Default::default()
        };
        let names: Vec<_> = list_communities(&pool, &filter)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["A", "C", "D"]);

        let page = CommunityFilter {
            district: None,
            skip: 1,
            limit: 2,
        };
        let names: Vec<_> = list_communities(&pool, &page)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let pool = test_pool().await;
        let mut new = new_community("A", "徐汇区");
        new.build_year = Some(1999);
        let created = create_community(&pool, &new).await.unwrap();

        let update = CommunityUpdate {
            name: Some("A2".to_string()),
            ..Default::default()
        };
        let updated = update_community(&pool, created.id, update).await.unwrap().unwrap();
        assert_eq!(updated.name, "A2");
        assert_eq!(updated.build_year, Some(1999));

        let fetched = get_community(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "A2");

        let missing = update_community(&pool, 999, CommunityUpdate::default()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_properties() {
        let pool = test_pool().await;
        let community = create_community(&pool, &new_community("A", "徐汇区")).await.unwrap();
        let property = create_property(
            &pool,
            &NewProperty {
                community_id: community.id,
                area: Some(50.0),
                price: Some(200.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(delete_community(&pool, community.id).await.unwrap());
        assert!(get_property(&pool, property.id).await.unwrap().is_none());
        assert!(!delete_community(&pool, community.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_refs_in_id_order() {
        let pool = test_pool().await;
        create_community(&pool, &new_community("B", "x")).await.unwrap();
        create_community(&pool, &new_community("A", "x")).await.unwrap();

        let refs = list_community_refs(&pool).await.unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].name, "B");
        assert!(refs[0].id < refs[1].id);
    }
}
