//! Write templates and exports in the import layout

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::import::EntityKind;
use crate::records::{Community, Property};

/// A cell value to write
enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Blank,
}

impl<'a> From<&'a Option<String>> for Cell<'a> {
    fn from(value: &'a Option<String>) -> Self {
        match value.as_deref() {
            Some(s) if !s.is_empty() => Cell::Text(s),
            _ => Cell::Blank,
        }
    }
}

fn number<T: Into<f64>>(value: Option<T>) -> Cell<'static> {
    value.map_or(Cell::Blank, |v| Cell::Number(v.into()))
}

const COMMUNITY_EXAMPLE: [Cell<'static>; 11] = [
    Cell::Text("示例小区"),
    Cell::Text("浦东新区"),
    Cell::Text("XX路123号"),
    Cell::Text("2.5元/平/月"),
    Cell::Text("地上50个,地下100个"),
    Cell::Number(2015.0),
    Cell::Text("地铁9号线, 商场"),
    Cell::Text("明珠小学"),
    Cell::Text("明珠中学"),
    Cell::Number(8.0),
    Cell::Text("小区环境好"),
];

const PROPERTY_EXAMPLE: [Cell<'static>; 14] = [
    Cell::Text("示例小区"),
    Cell::Text("1"),
    Cell::Text("1"),
    Cell::Text("101"),
    Cell::Number(120.0),
    Cell::Text("3室2厅"),
    Cell::Text("中楼层"),
    Cell::Text("南"),
    Cell::Text("精装"),
    Cell::Number(800.0),
    Cell::Number(6000.0),
    Cell::Number(750.0),
    Cell::Text("2024-01-15"),
    Cell::Text("采光好"),
];

/// Blank template: the header row plus one example row
pub fn write_template(kind: EntityKind) -> Result<Vec<u8>> {
    let example: &[Cell] = match kind {
        EntityKind::Community => &COMMUNITY_EXAMPLE,
        EntityKind::Property => &PROPERTY_EXAMPLE,
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    write_header(worksheet, kind)?;
    write_row(worksheet, 1, example)?;

    workbook
        .save_to_buffer()
        .with_context(|| format!("Failed to build {} template", kind))
}

/// All communities, one row each
pub fn write_community_export(communities: &[Community]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    write_header(worksheet, EntityKind::Community)?;

    for (idx, c) in communities.iter().enumerate() {
        let row = [
            Cell::Text(&c.name),
            Cell::from(&c.district),
            Cell::from(&c.address),
            Cell::from(&c.property_fee),
            Cell::from(&c.parking),
            number(c.build_year.map(|y| y as f64)),
            Cell::from(&c.metro),
            Cell::from(&c.primary_school),
            Cell::from(&c.middle_school),
            number(c.environment_score.map(|s| s as f64)),
            Cell::from(&c.notes),
        ];
        write_row(worksheet, (idx + 1) as u32, &row)?;
    }

    workbook
        .save_to_buffer()
        .context("Failed to build community export")
}

/// All properties paired with their community's name, one row each
pub fn write_property_export(properties: &[(Property, String)]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    write_header(worksheet, EntityKind::Property)?;

    for (idx, (p, community_name)) in properties.iter().enumerate() {
        let visit_date = p.visit_date.map(|d| d.format("%Y-%m-%d").to_string());
        let row = [
            Cell::Text(community_name),
            Cell::from(&p.building),
            Cell::from(&p.unit),
            Cell::from(&p.room),
            number(p.area),
            Cell::from(&p.layout),
            Cell::from(&p.floor),
            Cell::from(&p.orientation),
            Cell::from(&p.decoration),
            number(p.price),
            number(p.rent),
            number(p.expected_price),
            Cell::from(&visit_date),
            Cell::from(&p.notes),
        ];
        write_row(worksheet, (idx + 1) as u32, &row)?;
    }

    workbook
        .save_to_buffer()
        .context("Failed to build property export")
}

fn write_header(ws: &mut Worksheet, kind: EntityKind) -> Result<()> {
    ws.set_name(kind.sheet_name())?;

    let bold = Format::new().set_bold();
    for (col, label) in kind.headers().iter().enumerate() {
        ws.write_string_with_format(0, col as u16, *label, &bold)?;
    }
    for (col, width) in kind.column_widths().iter().enumerate() {
        ws.set_column_width(col as u16, *width)?;
    }
    Ok(())
}

fn write_row(ws: &mut Worksheet, row: u32, cells: &[Cell]) -> Result<()> {
    for (col, cell) in cells.iter().enumerate() {
        let col = col as u16;
        match cell {
            Cell::Text(s) => {
                ws.write_string(row, col, *s)?;
            }
            Cell::Number(n) => {
                ws.write_number(row, col, *n)?;
            }
            Cell::Blank => {}
        }
    }
    Ok(())
}
