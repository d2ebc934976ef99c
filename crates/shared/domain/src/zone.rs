//! Geographic tree: countries, departments, regions and cities.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    ZONE_TYPE_COUNTRY, ZONE_TYPE_DEPARTMENT, ZONE_TYPE_LARGE_REGION, ZONE_TYPE_REGION,
};
use crate::error::DomainError;
use crate::text::capitalize;

/// Kind of zone in the geographic hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ZoneType {
    Country,
    Department,
    Region,
    LargeRegion,
    Other(String),
}

impl ZoneType {
    /// Type code as stored in the database
    pub fn code(&self) -> &str {
        match self {
            ZoneType::Country => ZONE_TYPE_COUNTRY,
            ZoneType::Department => ZONE_TYPE_DEPARTMENT,
            ZoneType::Region => ZONE_TYPE_REGION,
            ZoneType::LargeRegion => ZONE_TYPE_LARGE_REGION,
            ZoneType::Other(code) => code,
        }
    }
}

impl From<&str> for ZoneType {
    fn from(s: &str) -> Self {
        match s {
            ZONE_TYPE_COUNTRY => ZoneType::Country,
            ZONE_TYPE_DEPARTMENT => ZoneType::Department,
            ZONE_TYPE_REGION => ZoneType::Region,
            ZONE_TYPE_LARGE_REGION => ZoneType::LargeRegion,
            other => ZoneType::Other(other.to_string()),
        }
    }
}

impl From<String> for ZoneType {
    fn from(s: String) -> Self {
        ZoneType::from(s.as_str())
    }
}

impl From<ZoneType> for String {
    fn from(zone_type: ZoneType) -> Self {
        zone_type.code().to_string()
    }
}

impl std::fmt::Display for ZoneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A node of the geographic tree (country, department, region...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: Uuid,
    pub name: String,
    /// Department code ("42") or empty
    pub code: String,
    pub zone_type: ZoneType,
    pub parent_id: Option<Uuid>,
    /// Grouping zones this zone belongs to (e.g. large regions)
    pub group_ids: Vec<Uuid>,
}

impl Zone {
    /// Top-most zone of the tree
    pub fn is_country(&self) -> bool {
        self.zone_type == ZoneType::Country
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Zone creation data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewZone {
    pub name: String,
    pub code: String,
    pub zone_type: ZoneType,
    pub parent_id: Option<Uuid>,
}

impl NewZone {
    /// A top-level country zone, named after the capitalized input
    pub fn country(name: &str) -> Self {
        Self {
            name: capitalize(name),
            code: String::new(),
            zone_type: ZoneType::Country,
            parent_id: None,
        }
    }
}

/// A city, leaf of the geographic tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    /// Zone groups the city belongs to
    pub group_ids: Vec<Uuid>,
}

/// In-memory view over zones and cities for ancestor lookups.
#[derive(Debug, Clone, Default)]
pub struct ZoneIndex {
    zones: HashMap<Uuid, Zone>,
    cities: HashMap<Uuid, City>,
}

impl ZoneIndex {
    pub fn new(zones: Vec<Zone>, cities: Vec<City>) -> Self {
        Self {
            zones: zones.into_iter().map(|z| (z.id, z)).collect(),
            cities: cities.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn zone(&self, id: Uuid) -> Option<&Zone> {
        self.zones.get(&id)
    }

    pub fn city(&self, id: Uuid) -> Option<&City> {
        self.cities.get(&id)
    }

    /// Direct parent zone of a city
    pub fn city_parent(&self, city: &City) -> Option<&Zone> {
        city.parent_id.and_then(|id| self.zone(id))
    }

    /// Parent zone of a zone
    pub fn parent(&self, zone: &Zone) -> Option<&Zone> {
        zone.parent_id.and_then(|id| self.zone(id))
    }

    /// First country found walking up from the city.
    pub fn country_of(&self, city: &City) -> Option<&Zone> {
        let mut current = self.city_parent(city);
        // bounded walk: a malformed tree must not loop forever
        for _ in 0..=self.zones.len() {
            let zone = current?;
            if zone.is_country() {
                return Some(zone);
            }
            current = self.parent(zone);
        }
        None
    }

    /// Country of the city, only if it is not the default country.
    pub fn foreign_country_of(&self, city: &City, default_country: &str) -> Option<&Zone> {
        self.country_of(city)
            .filter(|country| country.name != default_country)
    }
}

/// A formatting rule applied to city names before lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CityFormatter {
    /// Substitute every occurrence of `from` by `to`
    Replace { from: String, to: String },
    /// Capitalize each non-empty word split on `separator`
    CapitalizeWords { separator: String },
}

impl CityFormatter {
    /// Apply this rule to a name
    pub fn apply(&self, name: &str) -> String {
        match self {
            CityFormatter::Replace { from, to } => name.replace(from.as_str(), to),
            CityFormatter::CapitalizeWords { separator } => {
                if separator.is_empty() {
                    return capitalize(name);
                }
                name.split(separator.as_str())
                    .filter(|word| !word.is_empty())
                    .map(capitalize)
                    .collect::<Vec<_>>()
                    .join(separator)
            }
        }
    }
}

/// Parses `replace:<from>:<to>` and `capitalize_words:<sep>`.
impl FromStr for CityFormatter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("replace"), Some(from), Some(to)) if !from.is_empty() => Ok(CityFormatter::Replace {
                from: from.to_string(),
                to: to.to_string(),
            }),
            (Some("capitalize_words"), Some(separator), None) => Ok(CityFormatter::CapitalizeWords {
                separator: separator.to_string(),
            }),
            _ => Err(DomainError::validation(format!("Invalid city formatter '{}'", s))),
        }
    }
}

/// Trim a city name and run the configured formatters in order.
pub fn format_city_name(name: &str, formatters: &[CityFormatter]) -> String {
    formatters
        .iter()
        .fold(name.trim().to_string(), |current, formatter| formatter.apply(&current))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &str, zone_type: ZoneType, parent_id: Option<Uuid>) -> Zone {
        Zone {
            id: Uuid::new_v4(),
            name: name.to_string(),
            code: String::new(),
            zone_type,
            parent_id,
            group_ids: vec![],
        }
    }

    #[test]
    fn test_zone_type_round_trip() {
        assert_eq!(ZoneType::from("department"), ZoneType::Department);
        assert_eq!(String::from(ZoneType::LargeRegion), "large_region");
        assert_eq!(ZoneType::from("canton"), ZoneType::Other("canton".to_string()));
    }

    #[test]
    fn test_country_of_walks_up_the_tree() {
        let france = zone("France", ZoneType::Country, None);
        let region = zone("Auvergne-Rhône-Alpes", ZoneType::Region, Some(france.id));
        let loire = zone("Loire", ZoneType::Department, Some(region.id));
        let city = City {
            id: Uuid::new_v4(),
            name: "Saint-Étienne".to_string(),
            parent_id: Some(loire.id),
            group_ids: vec![],
        };
        let index = ZoneIndex::new(vec![france.clone(), region, loire], vec![city.clone()]);

        assert_eq!(index.country_of(&city).map(|z| z.id), Some(france.id));
        assert!(index.foreign_country_of(&city, "France").is_none());
        assert!(index.foreign_country_of(&city, "Belgique").is_some());
    }

    #[test]
    fn test_city_without_parent_has_no_country() {
        let city = City {
            id: Uuid::new_v4(),
            name: "Nowhere".to_string(),
            parent_id: None,
            group_ids: vec![],
        };
        let index = ZoneIndex::new(vec![], vec![city.clone()]);
        assert!(index.country_of(&city).is_none());
    }

    #[test]
    fn test_format_city_name() {
        let formatters = vec![
            "replace:St :Saint-".parse::<CityFormatter>().unwrap(),
            "capitalize_words:-".parse::<CityFormatter>().unwrap(),
        ];
        assert_eq!(format_city_name("  St etienne ", &formatters), "Saint-Etienne");
        assert_eq!(format_city_name(" Lyon ", &[]), "Lyon");
    }

    #[test]
    fn test_invalid_formatter() {
        assert!("upper".parse::<CityFormatter>().is_err());
        assert!("replace:only".parse::<CityFormatter>().is_err());
    }
}
