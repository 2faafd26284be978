//! Whole-table exports in the import layout

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::repository;
use crate::excel::{write_community_export, write_property_export};
use crate::import::EntityKind;

/// Every stored record of `kind` as an xlsx workbook that imports back
/// cleanly. Derived fields are left out; they are recomputed on import.
pub async fn export_workbook(pool: &SqlitePool, kind: EntityKind) -> Result<Vec<u8>> {
    let bytes = match kind {
        EntityKind::Community => {
            let communities = repository::list_all_communities(pool).await?;
            log::info!("Exporting {} communities", communities.len());
            write_community_export(&communities)?
        }
        EntityKind::Property => {
            let properties = repository::list_properties_with_community(pool).await?;
            log::info!("Exporting {} properties", properties.len());
            write_property_export(&properties)?
        }
    };
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::repository::{create_community, create_property, test_pool};
    use crate::import::Importer;
    use crate::records::{NewCommunity, NewProperty};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_export_imports_back() {
        let source = test_pool().await;
        let community = create_community(
            &source,
            &NewCommunity {
                name: "春申小区".to_string(),
                district: Some("闵行区".to_string()),
                build_year: Some(2003),
                environment_score: Some(7),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        create_property(
            &source,
            &NewProperty {
                community_id: community.id,
                room: Some("502".to_string()),
                area: Some(89.5),
                price: Some(420.0),
                rent: Some(5200.0),
                visit_date: NaiveDate::from_ymd_opt(2024, 3, 9),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let communities = export_workbook(&source, EntityKind::Community).await.unwrap();
        let properties = export_workbook(&source, EntityKind::Property).await.unwrap();

        let target = test_pool().await;
        let importer = Importer::new(&target);
        let report = importer
            .import_communities("communities.xlsx", communities)
            .await
            .unwrap();
        assert_eq!(report.imported, 1);
        let report = importer
            .import_properties("properties.xlsx", properties)
            .await
            .unwrap();
        assert_eq!(report.imported, 1);
        assert!(report.errors.is_empty());

        let imported = repository::get_property(&target, report.details[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(imported.room.as_deref(), Some("502"));
        assert_eq!(imported.area, Some(89.5));
        assert_eq!(imported.visit_date, NaiveDate::from_ymd_opt(2024, 3, 9));
        assert_eq!(imported.price_per_sqm, Some(420.0 * 10_000.0 / 89.5));

        let imported = repository::get_community(&target, imported.community_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(imported.build_year, Some(2003));
        assert_eq!(imported.environment_score, Some(7));
    }

    #[tokio::test]
    async fn test_empty_export_has_header_only() {
        let pool = test_pool().await;
        let bytes = export_workbook(&pool, EntityKind::Property).await.unwrap();

        let report = Importer::new(&pool)
            .import_properties("properties.xlsx", bytes)
            .await
            .unwrap();
        assert_eq!(report.imported, 0);
    }
}
