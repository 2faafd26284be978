//! Fixed positional column layouts for the two spreadsheet kinds

use calamine::Data;

use crate::excel::cells::cell_string;

use super::{EntityKind, ImportError};

/// Community sheet columns
pub mod community_cols {
    pub const NAME: usize = 0;
    pub const DISTRICT: usize = 1;
    pub const ADDRESS: usize = 2;
    pub const PROPERTY_FEE: usize = 3;
    pub const PARKING: usize = 4;
    pub const BUILD_YEAR: usize = 5;
    pub const METRO: usize = 6;
    pub const PRIMARY_SCHOOL: usize = 7;
    pub const MIDDLE_SCHOOL: usize = 8;
    pub const ENVIRONMENT_SCORE: usize = 9;
    pub const NOTES: usize = 10;
}

/// Property sheet columns
pub mod property_cols {
    pub const COMMUNITY_NAME: usize = 0;
    pub const BUILDING: usize = 1;
    pub const UNIT: usize = 2;
    pub const ROOM: usize = 3;
    pub const AREA: usize = 4;
    pub const LAYOUT: usize = 5;
    pub const FLOOR: usize = 6;
    pub const ORIENTATION: usize = 7;
    pub const DECORATION: usize = 8;
    pub const PRICE: usize = 9;
    pub const RENT: usize = 10;
    pub const EXPECTED_PRICE: usize = 11;
    pub const VISIT_DATE: usize = 12;
    pub const NOTES: usize = 13;
}

pub const COMMUNITY_HEADERS: [&str; 11] = [
    "小区名称*",
    "所属区*",
    "详细地址",
    "物业费",
    "停车位",
    "建成年份",
    "周边配套/地铁",
    "对口小学",
    "对口中学",
    "环境打分(1-10)",
    "备注",
];

pub const PROPERTY_HEADERS: [&str; 14] = [
    "小区名称*",
    "楼号",
    "单元",
    "房号",
    "面积(㎡)*",
    "户型",
    "楼层",
    "朝向",
    "装修情况",
    "挂牌价格(万)*",
    "租金(元/月)",
    "预计价格(万)",
    "看房日期(YYYY-MM-DD)",
    "备注",
];

const COMMUNITY_WIDTHS: [f64; 11] = [15.0, 12.0, 25.0, 15.0, 20.0, 10.0, 20.0, 15.0, 15.0, 12.0, 30.0];

const PROPERTY_WIDTHS: [f64; 14] = [
    15.0, 8.0, 8.0, 8.0, 12.0, 12.0, 10.0, 10.0, 12.0, 15.0, 15.0, 15.0, 18.0, 30.0,
];

impl EntityKind {
    /// Header labels in column order
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            EntityKind::Community => &COMMUNITY_HEADERS,
            EntityKind::Property => &PROPERTY_HEADERS,
        }
    }

    /// Column widths for generated sheets
    pub fn column_widths(self) -> &'static [f64] {
        match self {
            EntityKind::Community => &COMMUNITY_WIDTHS,
            EntityKind::Property => &PROPERTY_WIDTHS,
        }
    }

    /// Columns a header row must carry. The property notes column may be
    /// left off.
    pub fn required_header_columns(self) -> usize {
        match self {
            EntityKind::Community => COMMUNITY_HEADERS.len(),
            EntityKind::Property => PROPERTY_HEADERS.len() - 1,
        }
    }

    pub fn sheet_name(self) -> &'static str {
        match self {
            EntityKind::Community => "小区信息",
            EntityKind::Property => "房源信息",
        }
    }

    pub fn template_filename(self) -> &'static str {
        match self {
            EntityKind::Community => "community_template.xlsx",
            EntityKind::Property => "property_template.xlsx",
        }
    }

    pub fn export_filename(self) -> &'static str {
        match self {
            EntityKind::Community => "communities.xlsx",
            EntityKind::Property => "properties.xlsx",
        }
    }
}

/// Check a header row against the fixed label set.
///
/// Columns are bound by position, so a sheet with reordered or foreign
/// columns would silently land values in the wrong fields. Rejecting the
/// header up front turns that into a single structural error.
pub fn validate_header(kind: EntityKind, header: &[Data]) -> Result<(), ImportError> {
    let expected = kind.headers();
    let width = expected.len().max(header.len());

    for column in 0..width {
        let found = cell_string(header.get(column)).unwrap_or_default();
        match expected.get(column) {
            Some(label) if found == *label => {}
            Some(_) if found.is_empty() && column >= kind.required_header_columns() => {}
            None if found.is_empty() => {}
            label => {
                return Err(ImportError::HeaderMismatch {
                    column: column + 1,
                    expected: label.map(|l| l.to_string()).unwrap_or_default(),
                    found,
                });
            }
        }
    }

    Ok(())
}
