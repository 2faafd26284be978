//! Aggregate statistics over the stored communities and properties

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

/// Label for communities without a district
pub const UNKNOWN_DISTRICT: &str = "未知";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictStats {
    pub district: String,
    pub community_count: i64,
    pub property_count: i64,
    pub average_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_communities: i64,
    pub total_properties: i64,
    pub average_price: Option<f64>,
    pub average_rent: Option<f64>,
    pub average_rent_ratio: Option<f64>,
    pub district_stats: Vec<DistrictStats>,
}

/// Totals, averages (nulls ignored) and a per-district breakdown.
/// Averages are `None` when there is nothing to average.
pub async fn get_stats(pool: &SqlitePool) -> Result<Stats> {
    let total_communities: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM communities")
        .fetch_one(pool)
        .await
        .context("Failed to count communities")?;

    let totals = sqlx::query(
        "SELECT COUNT(*) AS total, AVG(price) AS price, AVG(rent) AS rent, AVG(rent_ratio) AS ratio FROM properties",
    )
    .fetch_one(pool)
    .await
    .context("Failed to aggregate properties")?;

    let rows = sqlx::query(
        r#"
        SELECT c.district AS district,
               COUNT(DISTINCT c.id) AS community_count,
               COUNT(p.id) AS property_count,
               AVG(p.price) AS average_price
        FROM communities c
        LEFT JOIN properties p ON p.community_id = c.id
        GROUP BY c.district
        ORDER BY c.district
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to aggregate districts")?;

    let district_stats = rows
        .iter()
        .map(|row| {
            let district: Option<String> = row.try_get("district")?;
            Ok(DistrictStats {
                district: district.unwrap_or_else(|| UNKNOWN_DISTRICT.to_string()),
                community_count: row.try_get("community_count")?,
                property_count: row.try_get("property_count")?,
                average_price: row.try_get("average_price")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Stats {
        total_communities,
        total_properties: totals.try_get("total")?,
        average_price: totals.try_get("price")?,
        average_rent: totals.try_get("rent")?,
        average_rent_ratio: totals.try_get("ratio")?,
        district_stats,
    })
}
