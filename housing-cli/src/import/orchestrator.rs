//! Drives one import request from uploaded bytes to an aggregated report

use calamine::Data;

use crate::excel::{cells::is_blank, read_first_sheet};

use super::decoder::{decode_community, decode_property, property_community_name};
use super::layout::validate_header;
use super::{
    CommunityImported, EntityKind, ImportError, ImportOutcome, ImportReport, PropertyImported, RecordStore,
    ReferenceIndex, Resolution, RowError, check_extension,
};

/// Row number shown in the sheet for the `idx`-th data row (the header is row 1)
fn display_row(idx: usize) -> usize {
    idx + 2
}

/// Runs imports against a store
pub struct Importer<'a, S: RecordStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> Importer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Importer { store }
    }

    /// Import community rows. Rows are stored one by one; failures are
    /// reported per row.
    pub async fn import_communities(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ImportReport<CommunityImported>, ImportError> {
        let rows = load_rows(EntityKind::Community, file_name, bytes)?;
        let mut report = ImportReport::default();

        log::info!(
            "Importing communities from '{}': {} data rows",
            file_name,
            rows.len()
        );

        for (idx, row) in rows.iter().enumerate() {
            let row_num = display_row(idx);
            if is_blank(row) {
                log::debug!("Row {}: blank, skipped", row_num);
                continue;
            }

            let community = match decode_community(row, row_num) {
                Ok(community) => community,
                Err(e) => {
                    report.record_error(e);
                    continue;
                }
            };

            match self.store.insert_community(&community).await {
                Ok(id) => report.record_success(CommunityImported {
                    id,
                    name: community.name,
                }),
                Err(e) => report.record_error(RowError::new(row_num, format!("{:#}", e))),
            }
        }

        log::info!(
            "Community import from '{}' finished: {} imported, {} errors",
            file_name,
            report.imported,
            report.errors.len()
        );

        Ok(report)
    }

    /// Import property rows, resolving each row's community by name against
    /// the communities stored when the import starts.
    pub async fn import_properties(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ImportReport<PropertyImported>, ImportError> {
        let rows = load_rows(EntityKind::Property, file_name, bytes)?;

        let communities = self
            .store
            .list_communities()
            .await
            .map_err(ImportError::Store)?;
        let index = ReferenceIndex::build(communities);

        log::info!(
            "Importing properties from '{}': {} data rows, {} known communities ({} shared names)",
            file_name,
            rows.len(),
            index.len(),
            index.duplicate_names().count()
        );

        let mut report = ImportReport::default();

        for (idx, row) in rows.iter().enumerate() {
            let row_num = display_row(idx);
            if is_blank(row) {
                log::debug!("Row {}: blank, skipped", row_num);
                continue;
            }

            let community_name = property_community_name(row);
            let community_id = match index.resolve(&community_name) {
                Resolution::Found(id) => id,
                Resolution::Ambiguous(id) => {
                    report.record_warning(
                        row_num,
                        format!("小区 '{}' 存在重名，已关联 ID {}", community_name, id),
                    );
                    id
                }
                Resolution::NotFound => {
                    report.record_error(RowError::new(
                        row_num,
                        format!("小区 '{}' 不存在，请先创建小区", community_name),
                    ));
                    continue;
                }
            };

            let property = match decode_property(row, row_num, community_id) {
                Ok(property) => property,
                Err(e) => {
                    report.record_error(e);
                    continue;
                }
            };

            let derived = property.derived();

            match self.store.insert_property(&property, &derived).await {
                Ok(id) => report.record_success(PropertyImported {
                    id,
                    area: property.area.unwrap_or_default(),
                    price: property.price.unwrap_or_default(),
                }),
                Err(e) => report.record_error(RowError::new(row_num, format!("{:#}", e))),
            }
        }

        log::info!(
            "Property import from '{}' finished: {} imported, {} errors",
            file_name,
            report.imported,
            report.errors.len()
        );

        Ok(report)
    }

    /// Import a sheet of the given kind
    pub async fn import(
        &self,
        kind: EntityKind,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ImportOutcome, ImportError> {
        match kind {
            EntityKind::Community => self
                .import_communities(file_name, bytes)
                .await
                .map(ImportOutcome::Communities),
            EntityKind::Property => self
                .import_properties(file_name, bytes)
                .await
                .map(ImportOutcome::Properties),
        }
    }
}

/// Structural checks shared by both kinds: extension, readable workbook,
/// matching header. Returns the data rows (header removed).
fn load_rows(kind: EntityKind, file_name: &str, bytes: Vec<u8>) -> Result<Vec<Vec<Data>>, ImportError> {
    check_extension(file_name)?;

    let mut rows = read_first_sheet(bytes)?;
    if rows.is_empty() {
        return Err(ImportError::Empty);
    }

    let data = rows.split_off(1);
    validate_header(kind, &rows[0])?;
    Ok(data)
}
