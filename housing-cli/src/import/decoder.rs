//! Decode positional rows into record fields

use calamine::Data;

use crate::excel::cells::{cell_date, cell_float, cell_int, cell_text};
use crate::records::{NewCommunity, NewProperty};

use super::RowError;
use super::layout::{community_cols as cc, property_cols as pc};

/// Decode a community row. `row_num` is the row number shown in the sheet.
pub fn decode_community(row: &[Data], row_num: usize) -> Result<NewCommunity, RowError> {
    let community = NewCommunity {
        name: cell_text(row, cc::NAME),
        district: Some(cell_text(row, cc::DISTRICT)),
        address: Some(cell_text(row, cc::ADDRESS)),
        property_fee: Some(cell_text(row, cc::PROPERTY_FEE)),
        parking: Some(cell_text(row, cc::PARKING)),
        build_year: cell_int(row, cc::BUILD_YEAR),
        metro: Some(cell_text(row, cc::METRO)),
        primary_school: Some(cell_text(row, cc::PRIMARY_SCHOOL)),
        middle_school: Some(cell_text(row, cc::MIDDLE_SCHOOL)),
        environment_score: cell_int(row, cc::ENVIRONMENT_SCORE),
        photos: None,
        videos: None,
        notes: Some(cell_text(row, cc::NOTES)),
    };

    if community.name.is_empty() {
        return Err(RowError::new(row_num, "小区名称不能为空"));
    }
    if community.district.as_deref().unwrap_or_default().is_empty() {
        return Err(RowError::new(row_num, "所属区不能为空"));
    }
    community
        .validate()
        .map_err(|e| RowError::new(row_num, e.to_string()))?;

    Ok(community)
}

/// Community name a property row refers to
pub fn property_community_name(row: &[Data]) -> String {
    cell_text(row, pc::COMMUNITY_NAME)
}

/// Decode a property row whose community has already been resolved
pub fn decode_property(
    row: &[Data],
    row_num: usize,
    community_id: i64,
) -> Result<NewProperty, RowError> {
    let property = NewProperty {
        community_id,
        building: Some(cell_text(row, pc::BUILDING)),
        unit: Some(cell_text(row, pc::UNIT)),
        room: Some(cell_text(row, pc::ROOM)),
        area: cell_float(row, pc::AREA),
        layout: Some(cell_text(row, pc::LAYOUT)),
        floor: Some(cell_text(row, pc::FLOOR)),
        orientation: Some(cell_text(row, pc::ORIENTATION)),
        decoration: Some(cell_text(row, pc::DECORATION)),
        price: cell_float(row, pc::PRICE),
        rent: cell_float(row, pc::RENT),
        expected_price: cell_float(row, pc::EXPECTED_PRICE),
        visit_date: cell_date(row, pc::VISIT_DATE),
        photos: None,
        videos: None,
        notes: Some(cell_text(row, pc::NOTES)),
    };

    if property.area.is_none() {
        return Err(RowError::new(row_num, "面积不能为空"));
    }
    if property.price.is_none() {
        return Err(RowError::new(row_num, "挂牌价格不能为空"));
    }

    Ok(property)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    fn community_row() -> Vec<Data> {
        vec![
            s(" 示例小区 "),
            s("浦东新区"),
            s("XX路123号"),
            s("2.5元/平/月"),
            s("地上50个,地下100个"),
            Data::Float(2015.0),
            s("地铁9号线, 商场"),
            s("明珠小学"),
            s("明珠中学"),
            Data::Float(8.0),
            s("小区环境好"),
        ]
    }

    fn property_row() -> Vec<Data> {
        vec![
            s("示例小区"),
            Data::Float(1.0),
            s("1"),
            s("101"),
            Data::Float(120.0),
            s("3室2厅"),
            s("中楼层"),
            s("南"),
            s("精装"),
            Data::Float(800.0),
            Data::Float(6000.0),
            Data::Float(750.0),
            s("2024-01-15"),
            s("采光好"),
        ]
    }

    #[test]
    fn test_decode_community() {
        let community = decode_community(&community_row(), 2).unwrap();
        assert_eq!(community.name, "示例小区");
        assert_eq!(community.district.as_deref(), Some("浦东新区"));
        assert_eq!(community.build_year, Some(2015));
        assert_eq!(community.environment_score, Some(8));
        assert_eq!(community.notes.as_deref(), Some("小区环境好"));
    }

    #[test]
    fn test_short_community_row_defaults_to_empty_text() {
        let community = decode_community(&[s("A"), s("B")], 5).unwrap();
        assert_eq!(community.address.as_deref(), Some(""));
        assert_eq!(community.build_year, None);
        assert_eq!(community.notes.as_deref(), Some(""));
    }

    #[test]
    fn test_community_requires_name_and_district() {
        let mut row = community_row();
        row[0] = s("   ");
        let err = decode_community(&row, 4).unwrap_err();
        assert_eq!(err.to_string(), "Row 4: 小区名称不能为空");

        let mut row = community_row();
        row[1] = Data::Empty;
        let err = decode_community(&row, 6).unwrap_err();
        assert_eq!(err.to_string(), "Row 6: 所属区不能为空");
    }

    #[test]
    fn test_malformed_integers_become_null() {
        let mut row = community_row();
        row[5] = s("2015年");
        row[9] = s("good");
        let community = decode_community(&row, 2).unwrap();
        assert_eq!(community.build_year, None);
        assert_eq!(community.environment_score, None);
    }

    #[test]
    fn test_out_of_range_score_is_row_error() {
        let mut row = community_row();
        row[9] = Data::Float(11.0);
        let err = decode_community(&row, 3).unwrap_err();
        assert_eq!(err.row, 3);
        assert_eq!(err.message, "环境打分必须在1-10之间");
    }

    #[test]
    fn test_decode_property() {
        let row = property_row();
        assert_eq!(property_community_name(&row), "示例小区");

        let property = decode_property(&row, 2, 9).unwrap();
        assert_eq!(property.community_id, 9);
        assert_eq!(property.building.as_deref(), Some("1"));
        assert_eq!(property.area, Some(120.0));
        assert_eq!(property.price, Some(800.0));
        assert_eq!(property.rent, Some(6000.0));
        assert_eq!(property.expected_price, Some(750.0));
        assert_eq!(property.visit_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(property.notes.as_deref(), Some("采光好"));
    }

    #[test]
    fn test_property_without_notes_column() {
        let mut row = property_row();
        row.truncate(13);
        let property = decode_property(&row, 2, 1).unwrap();
        assert_eq!(property.notes.as_deref(), Some(""));
        assert!(property.visit_date.is_some());
    }

    #[test]
    fn test_property_requires_area_then_price() {
        let mut row = property_row();
        row[4] = s("大约100");
        row[9] = Data::Empty;
        let err = decode_property(&row, 7, 1).unwrap_err();
        assert_eq!(err.to_string(), "Row 7: 面积不能为空");

        let mut row = property_row();
        row[9] = Data::Empty;
        let err = decode_property(&row, 8, 1).unwrap_err();
        assert_eq!(err.to_string(), "Row 8: 挂牌价格不能为空");
    }

    #[test]
    fn test_bad_date_is_null_not_error() {
        let mut row = property_row();
        row[12] = s("下周六");
        let property = decode_property(&row, 2, 1).unwrap();
        assert_eq!(property.visit_date, None);
    }
}
