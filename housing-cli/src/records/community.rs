//! Community (housing complex) records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ValidationError, merge};

/// Allowed range for `environment_score`
pub const ENVIRONMENT_SCORE_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

/// A stored community
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    pub id: i64,
    pub name: String,
    pub district: Option<String>,
    pub address: Option<String>,
    pub property_fee: Option<String>,
    pub parking: Option<String>,
    pub build_year: Option<i64>,
    pub metro: Option<String>,
    pub primary_school: Option<String>,
    pub middle_school: Option<String>,
    pub environment_score: Option<i64>,
    pub photos: Option<String>,
    pub videos: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a community
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCommunity {
    pub name: String,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub property_fee: Option<String>,
    #[serde(default)]
    pub parking: Option<String>,
    #[serde(default)]
    pub build_year: Option<i64>,
    #[serde(default)]
    pub metro: Option<String>,
    #[serde(default)]
    pub primary_school: Option<String>,
    #[serde(default)]
    pub middle_school: Option<String>,
    #[serde(default)]
    pub environment_score: Option<i64>,
    #[serde(default)]
    pub photos: Option<String>,
    #[serde(default)]
    pub videos: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewCommunity {
    /// Check field constraints shared by the API and the importer
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_environment_score(self.environment_score)
    }
}

/// Partial update; absent fields keep their stored value, an explicit null
/// clears the field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityUpdate {
    pub name: Option<String>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub district: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub address: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub property_fee: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub parking: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub build_year: Option<Option<i64>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub metro: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub primary_school: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub middle_school: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub environment_score: Option<Option<i64>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub photos: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub videos: Option<Option<String>>,
    #[serde(deserialize_with = "crate::records::nullable", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl CommunityUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        validate_environment_score(self.environment_score.flatten())
    }
}

impl Community {
    /// Merge a partial update over this record
    pub fn apply_update(&mut self, update: CommunityUpdate) {
        let CommunityUpdate {
            name,
            district,
            address,
            property_fee,
            parking,
            build_year,
            metro,
            primary_school,
            middle_school,
            environment_score,
            photos,
            videos,
            notes,
        } = update;

        if let Some(name) = name {
            self.name = name;
        }
        merge(&mut self.district, district);
        merge(&mut self.address, address);
        merge(&mut self.property_fee, property_fee);
        merge(&mut self.parking, parking);
        merge(&mut self.build_year, build_year);
        merge(&mut self.metro, metro);
        merge(&mut self.primary_school, primary_school);
        merge(&mut self.middle_school, middle_school);
        merge(&mut self.environment_score, environment_score);
        merge(&mut self.photos, photos);
        merge(&mut self.videos, videos);
        merge(&mut self.notes, notes);
    }
}

/// Community id and name, as used for reference resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityRef {
    pub id: i64,
    pub name: String,
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError("小区名称不能为空".to_string()));
    }
    Ok(())
}

fn validate_environment_score(score: Option<i64>) -> Result<(), ValidationError> {
    match score {
        Some(score) if !ENVIRONMENT_SCORE_RANGE.contains(&score) => Err(ValidationError(
            "环境打分必须在1-10之间".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Community {
        let now = Utc::now();
        Community {
            id: 1,
            name: "阳光小区".to_string(),
            district: Some("徐汇区".to_string()),
            address: None,
            property_fee: None,
            parking: None,
            build_year: Some(2001),
            metro: None,
            primary_school: None,
            middle_school: None,
            environment_score: Some(6),
            photos: None,
            videos: None,
            notes: Some("旧备注".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_environment_score_bounds() {
        let mut community = NewCommunity {
            name: "A".to_string(),
            ..Default::default()
        };
        assert!(community.validate().is_ok());

        community.environment_score = Some(10);
        assert!(community.validate().is_ok());

        community.environment_score = Some(0);
        assert!(community.validate().is_err());

        community.environment_score = Some(11);
        assert!(community.validate().is_err());
    }

    #[test]
    fn test_apply_update_keeps_absent_fields() {
        let mut community = stored();
        community.apply_update(CommunityUpdate {
            district: Some(Some("静安区".to_string())),
            notes: Some(None),
            ..Default::default()
        });

        assert_eq!(community.name, "阳光小区");
        assert_eq!(community.district.as_deref(), Some("静安区"));
        assert_eq!(community.build_year, Some(2001));
        assert_eq!(community.notes, None);
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let community = NewCommunity {
            name: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            community.validate(),
            Err(ValidationError("小区名称不能为空".to_string()))
        );
    }

    #[test]
    fn test_update_rejects_blank_name() {
        let update = CommunityUpdate {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
