//! Search parameters and their typed form.
//!
//! Raw parameters arrive as a flat map keyed `"<group>-_-<filter>-_-<index>"`.
//! [`SearchQuery::parse`] turns them into ordered groups of [`SearchFilter`]s,
//! rejecting unknown filters and malformed values up front.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{CUSTOM_FIELD_PREFIX, SEARCH_DATE_FORMAT, SEARCH_KEY_SEPARATOR};

/// A raw parameter value: one string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    One(String),
    Many(Vec<String>),
}

impl ParamValue {
    fn values(&self) -> Vec<&str> {
        match self {
            ParamValue::One(value) => vec![value.as_str()],
            ParamValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::One(value.to_string())
    }
}

/// A search request as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SearchRequest {
    /// `gr{group}-_-{filter}-_-{index}` keys with one value or a list
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub params: BTreeMap<String, ParamValue>,
    /// Contacts removed from the results by hand
    #[serde(default)]
    pub excluded: Vec<Uuid>,
}

/// Inclusive datetime range built from `"dd/mm/YYYY dd/mm/YYYY"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateSpan {
    pub fn contains(&self, datetime: DateTime<Utc>) -> bool {
        self.start <= datetime && datetime <= self.end
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(date.and_time(NaiveTime::MIN).and_utc())
    }

    /// `start <= datetime < end + 1 day`
    pub fn contains_with_extra_day(&self, datetime: DateTime<Utc>) -> bool {
        self.start <= datetime && datetime < self.end + Duration::days(1)
    }
}

impl FromStr for DateSpan {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::validation("Two valid dates are required");
        let mut parts = s.split_whitespace();
        let (Some(first), Some(last), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let first = NaiveDate::parse_from_str(first, SEARCH_DATE_FORMAT).map_err(|_| invalid())?;
        let last = NaiveDate::parse_from_str(last, SEARCH_DATE_FORMAT).map_err(|_| invalid())?;
        let end_of_day = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).ok_or_else(invalid)?;
        Ok(DateSpan {
            start: first.and_time(NaiveTime::MIN).and_utc(),
            end: last.and_time(end_of_day).and_utc(),
        })
    }
}

/// Level of the zone tree a zone filter looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneLevel {
    Department,
    Region,
    LargeRegion,
    Country,
    ZoneGroup,
}

/// `has_same_as` choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameAsPresence {
    None,
    TopPriority,
    Any,
}

/// `no_same_email` choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateEmails {
    /// Keep the first contact of each email
    Exclude,
    /// Keep only the repeated ones
    Only,
}

/// `duplicated_contacts` choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKey {
    Fullname,
    Lastname,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Entity,
    Contact,
    Name,
    Zipcode,
}

/// One named search filter with its parsed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    // Entity and text
    EntityName(String),
    EntityDescription(String),
    EntityNotes(String),
    EntityNameStartsWith(String),
    Address(String),
    HasEntity(bool),
    EntityType(Uuid),
    RelationshipDate(DateSpan),

    // City and zip
    City(Uuid),
    EntityCity(Uuid),
    ZipCode(String),
    EntityZipCode(String),
    Zone {
        level: ZoneLevel,
        entity_only: bool,
        zone_ids: Vec<Uuid>,
    },
    HasCityAndZip(bool),
    HasAddress(bool),

    // Actions
    ActionInProgress(bool),
    HasAction(bool),
    ActionByDoneDate(DateSpan),
    ActionByStartDate(DateSpan),
    ActionByPlannedDate(DateSpan),
    ActionByUser(Uuid),
    ActionGteAmount(Decimal),
    ActionLtAmount(Decimal),
    ActionStatus(Uuid),
    ActionWithoutStatus(Uuid),
    ActionType(Uuid),
    ActionName(String),
    ExcludeActionName(String),
    Opportunity(Uuid),
    OpportunityName(String),

    // Groups
    Group(Uuid),
    AllGroups(Vec<Uuid>),
    AnyGroups(Vec<Uuid>),
    NoneGroups(Vec<Uuid>),
    NotInGroup(Uuid),

    // Contact fields
    ContactAge { min: u32, max: u32 },
    AcceptSubscription(Uuid),
    RefuseSubscription(Uuid),
    /// true: include secondary contacts, false: only them
    SecondaryContact(bool),
    /// true: include contacts who left, false: only them
    ContactHasLeft(bool),
    ContactRole(Uuid),
    ContactEntityEmail(String),
    ContactHasEmail(bool),
    ContactHasPersonalEmail(bool),
    UnknownContact(bool),
    ContactName(String),
    ContactFirstname(String),
    ContactNotes(String),
    ContactLang(String),

    // Same-as and duplicates
    NoSameAs(bool),
    HasSameAs(SameAsPresence),
    NoSameEmail(DuplicateEmails),
    DuplicatedContacts(DuplicateKey),

    // Import, modification and creation
    ContactImport(Uuid),
    ContactsAndEntitiesModifiedBy(Uuid),
    ContactsModifiedBy(Uuid),
    EntitiesModifiedBy(Uuid),
    EntityByModifiedDate(DateSpan),
    ContactByModifiedDate(DateSpan),
    ContactsByCreationDate(DateSpan),
    EntitiesByCreationDate(DateSpan),
    ContactsAndEntitiesByChangeDate(DateSpan),

    // Relationships and custom fields
    ContactsByRelationshipType { type_id: Uuid, reverse: bool },
    ContactsByRelationshipDates(DateSpan),
    ContactWithCustomField(Uuid),
    EntityWithCustomField(Uuid),
    CustomField { name: String, value: String },

    // Cross-result
    EmailInGroup(Uuid),
    Sort(SortKey),
}

/// When a filter runs relative to the group evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    /// Per-contact test, ANDed inside the group
    Predicate,
    /// Runs on the merged result of all groups
    Global,
}

impl SearchFilter {
    pub fn stage(&self) -> FilterStage {
        match self {
            SearchFilter::NoSameAs(_)
            | SearchFilter::NoSameEmail(_)
            | SearchFilter::DuplicatedContacts(_)
            | SearchFilter::EmailInGroup(_)
            | SearchFilter::Sort(_) => FilterStage::Global,
            _ => FilterStage::Predicate,
        }
    }

    /// Parse the value of the filter called `name`.
    pub fn parse(name: &str, value: &ParamValue) -> AppResult<Self> {
        let filter = match name {
            "entity_name" => SearchFilter::EntityName(text(name, value)?),
            "entity_description" => SearchFilter::EntityDescription(text(name, value)?),
            "entity_notes" => SearchFilter::EntityNotes(text(name, value)?),
            "entity_name_sw" => SearchFilter::EntityNameStartsWith(text(name, value)?),
            "address" => SearchFilter::Address(text(name, value)?),
            "has_entity" => SearchFilter::HasEntity(yes_no(name, value)?),
            "type" => SearchFilter::EntityType(id(name, value)?),
            "relationship_date" => SearchFilter::RelationshipDate(span(name, value)?),

            "city" => SearchFilter::City(id(name, value)?),
            "entity_city" => SearchFilter::EntityCity(id(name, value)?),
            "zip_code" => SearchFilter::ZipCode(text(name, value)?),
            "entity_zip_code" => SearchFilter::EntityZipCode(text(name, value)?),
            "department" | "entity_department" | "region" | "entity_region" | "large_region"
            | "entity_large_region" | "country" | "entity_country" | "zone_group"
            | "entity_zone_group" => {
                let entity_only = name.starts_with("entity_");
                let level = match name.trim_start_matches("entity_") {
                    "department" => ZoneLevel::Department,
                    "region" => ZoneLevel::Region,
                    "large_region" => ZoneLevel::LargeRegion,
                    "country" => ZoneLevel::Country,
                    _ => ZoneLevel::ZoneGroup,
                };
                SearchFilter::Zone {
                    level,
                    entity_only,
                    zone_ids: ids(name, value)?,
                }
            }
            "has_city_and_zip" => SearchFilter::HasCityAndZip(yes_no(name, value)?),
            "has_address" => SearchFilter::HasAddress(yes_no(name, value)?),

            "action" => SearchFilter::ActionInProgress(yes_no(name, value)?),
            "has_action" => SearchFilter::HasAction(yes_no(name, value)?),
            "action_by_done_date" => SearchFilter::ActionByDoneDate(span(name, value)?),
            "action_by_start_date" => SearchFilter::ActionByStartDate(span(name, value)?),
            "action_by_planned_date" => SearchFilter::ActionByPlannedDate(span(name, value)?),
            "action_by_user" => SearchFilter::ActionByUser(id(name, value)?),
            "action_gte_amount" => SearchFilter::ActionGteAmount(amount(name, value)?),
            "action_lt_amount" => SearchFilter::ActionLtAmount(amount(name, value)?),
            "action_status" => SearchFilter::ActionStatus(id(name, value)?),
            "action_without_status" => SearchFilter::ActionWithoutStatus(id(name, value)?),
            "action_type" => SearchFilter::ActionType(id(name, value)?),
            "action_name" => SearchFilter::ActionName(text(name, value)?),
            "exclude_action_name" => SearchFilter::ExcludeActionName(text(name, value)?),
            "opportunity" => SearchFilter::Opportunity(id(name, value)?),
            "opportunity_name" => SearchFilter::OpportunityName(text(name, value)?),

            "group" | "group_dropdown" => SearchFilter::Group(id(name, value)?),
            "all_groups" => SearchFilter::AllGroups(ids(name, value)?),
            "any_groups" => SearchFilter::AnyGroups(ids(name, value)?),
            "none_groups" => SearchFilter::NoneGroups(ids(name, value)?),
            "not_in_group" => SearchFilter::NotInGroup(id(name, value)?),

            "contact_age" => {
                let raw = text(name, value)?;
                let ages: Vec<u32> = raw
                    .split_whitespace()
                    .map(str::parse)
                    .collect::<Result<_, _>>()
                    .map_err(|_| invalid_value(name))?;
                match ages.as_slice() {
                    [min, max] => SearchFilter::ContactAge { min: *min, max: *max },
                    _ => return Err(invalid_value(name)),
                }
            }
            "accept_subscription" => SearchFilter::AcceptSubscription(id(name, value)?),
            "refuse_subscription" => SearchFilter::RefuseSubscription(id(name, value)?),
            "secondary_contact" => SearchFilter::SecondaryContact(yes_no(name, value)?),
            "contact_has_left" => SearchFilter::ContactHasLeft(yes_no(name, value)?),
            "contact_role" => SearchFilter::ContactRole(id(name, value)?),
            "contact_entity_email" => SearchFilter::ContactEntityEmail(text(name, value)?),
            "contact_has_email" => SearchFilter::ContactHasEmail(yes_no(name, value)?),
            "contact_has_personal_email" => {
                SearchFilter::ContactHasPersonalEmail(yes_no(name, value)?)
            }
            "unknown_contact" => SearchFilter::UnknownContact(yes_no(name, value)?),
            "contact_name" => SearchFilter::ContactName(text(name, value)?),
            "contact_firstname" => SearchFilter::ContactFirstname(text(name, value)?),
            "contact_notes" => SearchFilter::ContactNotes(text(name, value)?),
            "contact_lang" => SearchFilter::ContactLang(first(name, value)?.trim().to_string()),

            "no_same_as" => SearchFilter::NoSameAs(yes_no(name, value)?),
            "has_same_as" => SearchFilter::HasSameAs(match choice(name, value)? {
                0 => SameAsPresence::None,
                1 => SameAsPresence::TopPriority,
                2 => SameAsPresence::Any,
                _ => return Err(invalid_value(name)),
            }),
            "no_same_email" => SearchFilter::NoSameEmail(match choice(name, value)? {
                0 => DuplicateEmails::Exclude,
                1 => DuplicateEmails::Only,
                _ => return Err(invalid_value(name)),
            }),
            "duplicated_contacts" => SearchFilter::DuplicatedContacts(match choice(name, value)? {
                1 => DuplicateKey::Fullname,
                2 => DuplicateKey::Lastname,
                _ => return Err(invalid_value(name)),
            }),

            "contact_import" => SearchFilter::ContactImport(id(name, value)?),
            "contacts_and_entities_modified_by" => {
                SearchFilter::ContactsAndEntitiesModifiedBy(id(name, value)?)
            }
            "contacts_modified_by" => SearchFilter::ContactsModifiedBy(id(name, value)?),
            "entities_modified_by" => SearchFilter::EntitiesModifiedBy(id(name, value)?),
            "entity_by_modified_date" => SearchFilter::EntityByModifiedDate(span(name, value)?),
            "contact_by_modified_date" => SearchFilter::ContactByModifiedDate(span(name, value)?),
            "contacts_by_creation_date" => SearchFilter::ContactsByCreationDate(span(name, value)?),
            "entities_by_creation_date" => SearchFilter::EntitiesByCreationDate(span(name, value)?),
            "contacts_and_entities_by_change_date" => {
                SearchFilter::ContactsAndEntitiesByChangeDate(span(name, value)?)
            }

            "contacts_by_relationship_type" => {
                let raw = text(name, value)?;
                let (raw_id, reverse) = match raw.strip_prefix('-') {
                    Some(rest) => (rest, true),
                    None => (raw.as_str(), false),
                };
                let type_id = Uuid::parse_str(raw_id).map_err(|_| invalid_value(name))?;
                SearchFilter::ContactsByRelationshipType { type_id, reverse }
            }
            "contacts_by_relationship_dates" => {
                SearchFilter::ContactsByRelationshipDates(span(name, value)?)
            }
            "contact_with_custom_field" => SearchFilter::ContactWithCustomField(id(name, value)?),
            "entity_with_custom_field" => SearchFilter::EntityWithCustomField(id(name, value)?),

            "email_in_group" => SearchFilter::EmailInGroup(id(name, value)?),
            "sort" => SearchFilter::Sort(match text(name, value)?.as_str() {
                "entity" => SortKey::Entity,
                "contact" => SortKey::Contact,
                "name" => SortKey::Name,
                "zipcode" => SortKey::Zipcode,
                _ => return Err(invalid_value(name)),
            }),

            other => match other.strip_prefix(CUSTOM_FIELD_PREFIX) {
                Some(field_name) if !field_name.is_empty() => SearchFilter::CustomField {
                    name: field_name.to_string(),
                    value: text(name, value)?,
                },
                _ => {
                    return Err(AppError::validation(format!("Unknown search filter {}", other)))
                }
            },
        };
        Ok(filter)
    }
}

fn required(name: &str) -> AppError {
    AppError::validation(format!("{}: this field is required", name))
}

fn invalid_value(name: &str) -> AppError {
    AppError::validation(format!("{}: invalid value", name))
}

fn first<'v>(name: &str, value: &'v ParamValue) -> AppResult<&'v str> {
    value.values().into_iter().next().ok_or_else(|| required(name))
}

/// A non-blank string value.
fn text(name: &str, value: &ParamValue) -> AppResult<String> {
    let raw = first(name, value)?;
    if raw.trim().is_empty() {
        return Err(required(name));
    }
    Ok(raw.to_string())
}

fn choice(name: &str, value: &ParamValue) -> AppResult<i64> {
    text(name, value)?
        .trim()
        .parse()
        .map_err(|_| invalid_value(name))
}

fn yes_no(name: &str, value: &ParamValue) -> AppResult<bool> {
    match choice(name, value)? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(invalid_value(name)),
    }
}

fn id(name: &str, value: &ParamValue) -> AppResult<Uuid> {
    Uuid::parse_str(text(name, value)?.trim()).map_err(|_| invalid_value(name))
}

fn ids(name: &str, value: &ParamValue) -> AppResult<Vec<Uuid>> {
    let values: Vec<&str> = value
        .values()
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .collect();
    if values.is_empty() {
        return Err(required(name));
    }
    values
        .into_iter()
        .map(|v| Uuid::parse_str(v.trim()).map_err(|_| invalid_value(name)))
        .collect()
}

fn amount(name: &str, value: &ParamValue) -> AppResult<Decimal> {
    let raw = text(name, value)?;
    let amount: i64 = raw.trim().parse().map_err(|_| invalid_value(name))?;
    Ok(Decimal::from(amount))
}

fn span(name: &str, value: &ParamValue) -> AppResult<DateSpan> {
    first(name, value)?.parse()
}

/// Filters of one group, in index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchGroup {
    pub name: String,
    pub filters: Vec<SearchFilter>,
}

impl SearchGroup {
    pub fn has(&self, test: impl Fn(&SearchFilter) -> bool) -> bool {
        self.filters.iter().any(test)
    }
}

/// Parsed search: groups in key order plus the manually excluded contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub groups: Vec<SearchGroup>,
    pub excluded: Vec<Uuid>,
}

impl SearchQuery {
    pub fn parse(request: &SearchRequest) -> AppResult<Self> {
        let mut raw_groups: BTreeMap<&str, Vec<(i64, &str, &ParamValue)>> = BTreeMap::new();
        for (key, value) in &request.params {
            let mut parts = key.split(SEARCH_KEY_SEPARATOR);
            let (Some(group), Some(filter), Some(index), None) =
                (parts.next(), parts.next(), parts.next(), parts.next())
            else {
                continue;
            };
            let Ok(index) = index.parse::<i64>() else {
                continue;
            };
            raw_groups.entry(group).or_default().push((index, filter, value));
        }

        let mut groups = Vec::with_capacity(raw_groups.len());
        for (name, mut raw_filters) in raw_groups {
            raw_filters.sort_by_key(|(index, _, _)| *index);
            let filters = raw_filters
                .into_iter()
                .map(|(_, filter, value)| SearchFilter::parse(filter, value))
                .collect::<AppResult<Vec<_>>>()?;
            groups.push(SearchGroup {
                name: name.to_string(),
                filters,
            });
        }

        Ok(SearchQuery {
            groups,
            excluded: request.excluded.clone(),
        })
    }

    /// Same-as contacts are all shown when some group says so.
    pub fn allows_same_as(&self) -> bool {
        self.groups
            .iter()
            .any(|g| g.has(|f| matches!(f, SearchFilter::NoSameAs(true))))
    }

    /// Contacts who left are kept when some group mentions them.
    pub fn includes_left_contacts(&self) -> bool {
        self.groups
            .iter()
            .any(|g| g.has(|f| matches!(f, SearchFilter::ContactHasLeft(_))))
    }

    /// Global post-filters, in the order they were met.
    pub fn global_filters(&self) -> impl Iterator<Item = &SearchFilter> {
        self.groups
            .iter()
            .flat_map(|g| g.filters.iter())
            .filter(|f| f.stage() == FilterStage::Global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(params: &[(&str, &str)]) -> SearchRequest {
        SearchRequest {
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), ParamValue::from(*v)))
                .collect(),
            excluded: vec![],
        }
    }

    #[test]
    fn test_groups_and_filters_are_ordered() {
        let query = SearchQuery::parse(&request(&[
            ("gr1-_-contact_name-_-0", "ABCA"),
            ("gr0-_-contact_firstname-_-10", "Paul"),
            ("gr0-_-contact_name-_-2", "ABCD"),
        ]))
        .unwrap();

        assert_eq!(query.groups.len(), 2);
        assert_eq!(query.groups[0].name, "gr0");
        assert_eq!(
            query.groups[0].filters,
            vec![
                SearchFilter::ContactName("ABCD".to_string()),
                SearchFilter::ContactFirstname("Paul".to_string()),
            ]
        );
        assert_eq!(query.groups[1].filters, vec![SearchFilter::ContactName("ABCA".to_string())]);
    }

    #[test]
    fn test_keys_with_non_integer_index_are_ignored() {
        let query = SearchQuery::parse(&request(&[
            ("gr0-_-city-_-visible", "Nantes"),
            ("name", "my search"),
        ]))
        .unwrap();
        assert!(query.groups.is_empty());
    }

    #[test]
    fn test_blank_value_is_rejected() {
        let result = SearchQuery::parse(&request(&[("gr0-_-contact_entity_email-_-0", "  ")]));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_unknown_filter_is_rejected() {
        let result = SearchQuery::parse(&request(&[("gr0-_-favourite_colour-_-0", "blue")]));
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("favourite_colour")));
    }

    #[test]
    fn test_date_span() {
        let span: DateSpan = "01/03/2024 02/03/2024".parse().unwrap();
        assert_eq!(span.start.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert!(span.contains("2024-03-02T23:59:59Z".parse().unwrap()));
        assert!(!span.contains("2024-03-03T00:00:00Z".parse().unwrap()));
        assert!(span.contains_with_extra_day("2024-03-03T12:00:00Z".parse().unwrap()));

        let result = SearchQuery::parse(&request(&[("gr0-_-action_by_done_date-_-0", "01/03/2024")]));
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg == "Two valid dates are required"));
        assert!("31/02/2024 01/03/2024".parse::<DateSpan>().is_err());
    }

    #[test]
    fn test_reverse_relationship_type() {
        let type_id = Uuid::new_v4();
        let value = ParamValue::One(format!("-{}", type_id));
        assert_eq!(
            SearchFilter::parse("contacts_by_relationship_type", &value).unwrap(),
            SearchFilter::ContactsByRelationshipType { type_id, reverse: true }
        );
    }

    #[test]
    fn test_zone_filters_take_lists() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let value = ParamValue::Many(vec![a.to_string(), b.to_string()]);
        assert_eq!(
            SearchFilter::parse("entity_region", &value).unwrap(),
            SearchFilter::Zone {
                level: ZoneLevel::Region,
                entity_only: true,
                zone_ids: vec![a, b],
            }
        );
    }

    #[test]
    fn test_custom_field_filter() {
        let filter = SearchFilter::parse("cf_siret", &ParamValue::from("123")).unwrap();
        assert_eq!(
            filter,
            SearchFilter::CustomField {
                name: "siret".to_string(),
                value: "123".to_string()
            }
        );
    }

    #[test]
    fn test_global_filters_keep_order() {
        let query = SearchQuery::parse(&request(&[
            ("gr0-_-sort-_-1", "zipcode"),
            ("gr0-_-no_same_as-_-0", "1"),
            ("gr1-_-duplicated_contacts-_-0", "2"),
        ]))
        .unwrap();
        let globals: Vec<&SearchFilter> = query.global_filters().collect();
        assert_eq!(
            globals,
            vec![
                &SearchFilter::NoSameAs(true),
                &SearchFilter::Sort(SortKey::Zipcode),
                &SearchFilter::DuplicatedContacts(DuplicateKey::Lastname),
            ]
        );
        assert!(query.allows_same_as());
        assert!(!query.includes_left_contacts());
    }
}
