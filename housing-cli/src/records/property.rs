//! Property (unit) records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::community::Community;
use super::derived::{DerivedFields, derive_fields};
use super::merge;

/// A stored property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub community_id: i64,
    pub building: Option<String>,
    pub unit: Option<String>,
    pub room: Option<String>,
    pub area: Option<f64>,
    pub layout: Option<String>,
    pub floor: Option<String>,
    pub orientation: Option<String>,
    pub decoration: Option<String>,
    pub price: Option<f64>,
    pub price_per_sqm: Option<f64>,
    pub rent: Option<f64>,
    pub rent_ratio: Option<f64>,
    pub expected_price: Option<f64>,
    pub visit_date: Option<NaiveDate>,
    pub photos: Option<String>,
    pub videos: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Owning community, filled in by repository reads
    #[serde(default)]
    pub community: Option<Community>,
}

/// Fields for creating a property. Derived fields are not accepted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProperty {
    pub community_id: i64,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default)]
    pub orientation: Option<String>,
    #[serde(default)]
    pub decoration: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub rent: Option<f64>,
    #[serde(default)]
    pub expected_price: Option<f64>,
    #[serde(default)]
    pub visit_date: Option<NaiveDate>,
    #[serde(default)]
    pub photos: Option<String>,
    #[serde(default)]
    pub videos: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewProperty {
    pub fn derived(&self) -> DerivedFields {
        derive_fields(self.price, self.rent, self.area)
    }
}

/// Partial update; absent fields keep their stored value and an explicit
/// null clears the field.
///
/// There is no `community_id`: a property stays with the community it was
/// created under.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyUpdate {
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub building: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub unit: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub room: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub area: Option<Option<f64>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub layout: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub floor: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub decoration: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub price: Option<Option<f64>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub rent: Option<Option<f64>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub expected_price: Option<Option<f64>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub visit_date: Option<Option<NaiveDate>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub photos: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub videos: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl Property {
    /// Merge a partial update over this record and recompute derived fields
    pub fn apply_update(&mut self, update: PropertyUpdate) {
        let PropertyUpdate {
            building,
            unit,
            room,
            area,
            layout,
            floor,
            orientation,
            decoration,
            price,
            rent,
            expected_price,
            visit_date,
            photos,
            videos,
            notes,
        } = update;

        merge(&mut self.building, building);
        merge(&mut self.unit, unit);
        merge(&mut self.room, room);
        merge(&mut self.area, area);
        merge(&mut self.layout, layout);
        merge(&mut self.floor, floor);
        merge(&mut self.orientation, orientation);
        merge(&mut self.decoration, decoration);
        merge(&mut self.price, price);
        merge(&mut self.rent, rent);
        merge(&mut self.expected_price, expected_price);
        merge(&mut self.visit_date, visit_date);
        merge(&mut self.photos, photos);
        merge(&mut self.videos, videos);
        merge(&mut self.notes, notes);

        self.recompute();
    }

    /// Bring `price_per_sqm` and `rent_ratio` in line with price/rent/area
    pub fn recompute(&mut self) {
        let derived = derive_fields(self.price, self.rent, self.area);
        self.price_per_sqm = derived.price_per_sqm;
        self.rent_ratio = derived.rent_ratio;
    }
}
