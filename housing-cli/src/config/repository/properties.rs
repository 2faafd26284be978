//! Property repository
//!
//! Derived fields are computed here from the stored price/rent/area on every
//! create and update; callers cannot supply them.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::records::{DerivedFields, NewProperty, Property, PropertyUpdate};

use super::communities::{
    DEFAULT_LIMIT, community_from_prefixed_row, default_limit, prefixed_community_columns,
};

/// Prefix of the joined community columns
const COMMUNITY_PREFIX: &str = "c_";

/// Property columns plus the owning community, aliased `p` and `c`
fn select_properties() -> String {
    format!(
        "SELECT p.*, {} FROM properties p LEFT JOIN communities c ON c.id = p.community_id",
        prefixed_community_columns("c", COMMUNITY_PREFIX)
    )
}

/// Listing filter for properties. Range bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilter {
    #[serde(default)]
    pub community_id: Option<i64>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub min_area: Option<f64>,
    #[serde(default)]
    pub max_area: Option<f64>,
    #[serde(default)]
    pub min_rent_ratio: Option<f64>,
    #[serde(default)]
    pub max_rent_ratio: Option<f64>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for PropertyFilter {
    fn default() -> Self {
        Self {
            community_id: None,
            district: None,
            min_price: None,
            max_price: None,
            min_area: None,
            max_area: None,
            min_rent_ratio: None,
            max_rent_ratio: None,
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn property_from_row(row: &SqliteRow) -> Result<Property> {
    let community_id: Option<i64> = row.try_get(format!("{}id", COMMUNITY_PREFIX).as_str())?;
    let community = match community_id {
        Some(_) => Some(community_from_prefixed_row(row, COMMUNITY_PREFIX)?),
        None => None,
    };

    Ok(Property {
        id: row.try_get("id")?,
        community_id: row.try_get("community_id")?,
        building: row.try_get("building")?,
        unit: row.try_get("unit")?,
        room: row.try_get("room")?,
        area: row.try_get("area")?,
        layout: row.try_get("layout")?,
        floor: row.try_get("floor")?,
        orientation: row.try_get("orientation")?,
        decoration: row.try_get("decoration")?,
        price: row.try_get("price")?,
        price_per_sqm: row.try_get("price_per_sqm")?,
        rent: row.try_get("rent")?,
        rent_ratio: row.try_get("rent_ratio")?,
        expected_price: row.try_get("expected_price")?,
        visit_date: row.try_get("visit_date")?,
        photos: row.try_get("photos")?,
        videos: row.try_get("videos")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        community,
    })
}

/// Insert a property with its derived fields and return its id
pub async fn insert_property(
    pool: &SqlitePool,
    property: &NewProperty,
    derived: &DerivedFields,
) -> Result<i64> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO properties (
            community_id, building, unit, room, area, layout, floor, orientation,
            decoration, price, price_per_sqm, rent, rent_ratio, expected_price,
            visit_date, photos, videos, notes, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(property.community_id)
    .bind(&property.building)
    .bind(&property.unit)
    .bind(&property.room)
    .bind(property.area)
    .bind(&property.layout)
    .bind(&property.floor)
    .bind(&property.orientation)
    .bind(&property.decoration)
    .bind(property.price)
    .bind(derived.price_per_sqm)
    .bind(property.rent)
    .bind(derived.rent_ratio)
    .bind(property.expected_price)
    .bind(property.visit_date)
    .bind(&property.photos)
    .bind(&property.videos)
    .bind(&property.notes)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to insert property")?;

    Ok(result.last_insert_rowid())
}

/// Compute derived fields, insert, and return the stored record
pub async fn create_property(pool: &SqlitePool, property: &NewProperty) -> Result<Property> {
    let id = insert_property(pool, property, &property.derived()).await?;
    get_property(pool, id)
        .await?
        .with_context(|| format!("Property {} vanished after insert", id))
}

pub async fn get_property(pool: &SqlitePool, id: i64) -> Result<Option<Property>> {
    let sql = format!("{} WHERE p.id = ?", select_properties());
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get property")?;

    row.as_ref().map(property_from_row).transpose()
}

pub async fn list_properties(pool: &SqlitePool, filter: &PropertyFilter) -> Result<Vec<Property>> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(select_properties());
    query.push(" WHERE 1 = 1");

    if let Some(community_id) = filter.community_id {
        query.push(" AND p.community_id = ").push_bind(community_id);
    }
    if let Some(district) = &filter.district {
        query.push(" AND c.district = ").push_bind(district.clone());
    }

    let ranges = [
        ("p.price", filter.min_price, filter.max_price),
        ("p.area", filter.min_area, filter.max_area),
        ("p.rent_ratio", filter.min_rent_ratio, filter.max_rent_ratio),
    ];
    for (column, min, max) in ranges {
        if let Some(min) = min {
            query.push(format!(" AND {} >= ", column)).push_bind(min);
        }
        if let Some(max) = max {
            query.push(format!(" AND {} <= ", column)).push_bind(max);
        }
    }

    query
        .push(" ORDER BY p.id LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.skip);

    let rows = query
        .build()
        .fetch_all(pool)
        .await
        .context("Failed to list properties")?;

    rows.iter().map(property_from_row).collect()
}

/// Every property with the name of its community, oldest first
pub async fn list_properties_with_community(pool: &SqlitePool) -> Result<Vec<(Property, String)>> {
    let sql = format!("{} ORDER BY p.id", select_properties());
    let rows = sqlx::query(&sql)
        .fetch_all(pool)
        .await
        .context("Failed to list properties")?;

    rows.iter()
        .map(|row| {
            let property = property_from_row(row)?;
            let name = property
                .community
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_default();
            Ok((property, name))
        })
        .collect()
}

/// Apply a partial update and recompute derived fields from the merged
/// values. Returns `None` when the property does not exist.
pub async fn update_property(
    pool: &SqlitePool,
    id: i64,
    update: PropertyUpdate,
) -> Result<Option<Property>> {
    let Some(mut property) = get_property(pool, id).await? else {
        return Ok(None);
    };

    property.apply_update(update);
    property.updated_at = Utc::now();

    sqlx::query(
        r#"
        UPDATE properties SET
            building = ?, unit = ?, room = ?, area = ?, layout = ?, floor = ?,
            orientation = ?, decoration = ?, price = ?, price_per_sqm = ?, rent = ?,
            rent_ratio = ?, expected_price = ?, visit_date = ?, photos = ?, videos = ?,
            notes = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&property.building)
    .bind(&property.unit)
    .bind(&property.room)
    .bind(property.area)
    .bind(&property.layout)
    .bind(&property.floor)
    .bind(&property.orientation)
    .bind(&property.decoration)
    .bind(property.price)
    .bind(property.price_per_sqm)
    .bind(property.rent)
    .bind(property.rent_ratio)
    .bind(property.expected_price)
    .bind(property.visit_date)
    .bind(&property.photos)
    .bind(&property.videos)
    .bind(&property.notes)
    .bind(property.updated_at)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update property")?;

    Ok(Some(property))
}

pub async fn delete_property(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM properties WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete property")?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::repository::{create_community, test_pool};
    use crate::records::NewCommunity;

    async fn community(pool: &SqlitePool, name: &str, district: &str) -> i64 {
        create_community(
            pool,
            &NewCommunity {
                name: name.to_string(),
                district: Some(district.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .id
    }

    fn unit(community_id: i64, area: f64, price: f64, rent: Option<f64>) -> NewProperty {
        NewProperty {
            community_id,
            area: Some(area),
            price: Some(price),
            rent,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_computes_derived() {
        let pool = test_pool().await;
        let c = community(&pool, "A", "徐汇区").await;

        let property = create_property(&pool, &unit(c, 100.0, 500.0, Some(5000.0))).await.unwrap();
        assert_eq!(property.price_per_sqm, Some(50_000.0));
        let community = property.community.as_ref().unwrap();
        assert_eq!(community.id, c);
        assert_eq!(community.name, "A");
        assert_eq!(community.district.as_deref(), Some("徐汇区"));
        assert!((property.rent_ratio.unwrap() - 1.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_community() {
        let pool = test_pool().await;
        let result = create_property(&pool, &unit(42, 100.0, 500.0, None)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_update_recomputes_derived() {
        let pool = test_pool().await;
        let c = community(&pool, "A", "徐汇区").await;
        let created = create_property(&pool, &unit(c, 100.0, 500.0, Some(5000.0))).await.unwrap();

        let update = PropertyUpdate {
            area: Some(Some(0.0)),
            ..Default::default()
        };
        let updated = update_property(&pool, created.id, update).await.unwrap().unwrap();
        assert_eq!(updated.price_per_sqm, None);
        assert_eq!(updated.rent_ratio, None);

        let fetched = get_property(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.area, Some(0.0));
        assert_eq!(fetched.price_per_sqm, None);
        assert_eq!(fetched.rent_ratio, None);

        let update = PropertyUpdate {
            area: Some(Some(125.0)),
            rent: Some(Some(2500.0)),
            ..Default::default()
        };
        let fetched = update_property(&pool, created.id, update).await.unwrap().unwrap();
        assert_eq!(fetched.price_per_sqm, Some(40_000.0));
        assert!((fetched.rent_ratio.unwrap() - 0.6).abs() < 1e-9);

        let update = PropertyUpdate {
            rent: Some(None),
            ..Default::default()
        };
        update_property(&pool, created.id, update).await.unwrap();
        let fetched = get_property(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.rent, None);
        assert_eq!(fetched.rent_ratio, None);
        assert_eq!(fetched.price_per_sqm, Some(40_000.0));
        assert_eq!(fetched.community.map(|c| c.id), Some(c));
    }

    #[tokio::test]
    async fn test_list_filters() {
        let pool = test_pool().await;
        let a = community(&pool, "A", "徐汇区").await;
        let b = community(&pool, "B", "静安区").await;

        create_property(&pool, &unit(a, 60.0, 300.0, Some(3000.0))).await.unwrap();
        create_property(&pool, &unit(a, 90.0, 450.0, Some(6000.0))).await.unwrap();
        create_property(&pool, &unit(b, 120.0, 900.0, None)).await.unwrap();

        let by_district = PropertyFilter {
            district: Some("静安区".to_string()),
            ..Default::default()
        };
        let found = list_properties(&pool, &by_district).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].community_id, b);
        assert_eq!(found[0].community.as_ref().map(|c| c.name.as_str()), Some("B"));

        let by_price = PropertyFilter {
            community_id: Some(a),
            min_price: Some(400.0),
            ..Default::default()
        };
        let found = list_properties(&pool, &by_price).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].price, Some(450.0));

        let by_ratio = PropertyFilter {
            min_rent_ratio: Some(1.5),
            ..Default::default()
        };
        let found = list_properties(&pool, &by_ratio).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].area, Some(90.0));

        let by_area = PropertyFilter {
            min_area: Some(60.0),
            max_area: Some(90.0),
            limit: 1,
            skip: 1,
            ..Default::default()
        };
        let found = list_properties(&pool, &by_area).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].area, Some(90.0));
    }

    #[tokio::test]
    async fn test_list_with_community_names() {
        let pool = test_pool().await;
        let a = community(&pool, "A", "徐汇区").await;
        create_property(&pool, &unit(a, 60.0, 300.0, None)).await.unwrap();

        let rows = list_properties_with_community(&pool).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1, "A");
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;
        let a = community(&pool, "A", "徐汇区").await;
        let p = create_property(&pool, &unit(a, 60.0, 300.0, None)).await.unwrap();

        assert!(delete_property(&pool, p.id).await.unwrap());
        assert!(!delete_property(&pool, p.id).await.unwrap());
    }
}
