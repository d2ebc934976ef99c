//! Domain-level constants.
//!
//! These constants define business rules shared by search, import and the
//! geographic resolver.

// =============================================================================
// Geography
// =============================================================================

/// Country used when none is configured
pub const DEFAULT_COUNTRY: &str = "France";

/// Zone type code for countries (top of the tree)
pub const ZONE_TYPE_COUNTRY: &str = "country";

/// Zone type code for departments (parent of cities in the default country)
pub const ZONE_TYPE_DEPARTMENT: &str = "department";

/// Zone type code for regions (parent of departments)
pub const ZONE_TYPE_REGION: &str = "region";

/// Zone type code for groups of regions
pub const ZONE_TYPE_LARGE_REGION: &str = "large_region";

/// Number of zip code characters forming a department code
pub const DEPARTMENT_CODE_LENGTH: usize = 2;

// =============================================================================
// Contacts
// =============================================================================

/// Display name of a contact without any name or email
pub const UNKNOWN_NAME: &str = "< Unknown >";

/// Gender cells read as male during import
pub const MALE_GENDER_CODES: &[&str] = &["M", "M.", "Mr", "Mr."];

/// Gender cells read as a couple during import (when allowed)
pub const COUPLE_GENDER_CODES: &[&str] = &["Mrs and Mr", "Mme et M."];

/// Default scheme prepended to entity websites without one
pub const DEFAULT_WEBSITE_SCHEME: &str = "http://";

// =============================================================================
// Import
// =============================================================================

/// Email domains that identify a person rather than an organization
pub const CONSUMER_EMAIL_PROVIDERS: &[&str] = &[
    "free",
    "gmail",
    "yahoo",
    "yahoo.co",
    "wanadoo",
    "orange",
    "sfr",
    "laposte",
    "hotmail",
    "neuf",
    "club-internet",
    "voila",
    "aol",
    "live",
    "ymail",
];

/// Accepted formats for the birth date column
pub const BIRTH_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Prefix of the per-subscription-type import columns
pub const SUBSCRIPTION_FIELD_PREFIX: &str = "accept_";

/// Prefix of the custom field import columns and search filters
pub const CUSTOM_FIELD_PREFIX: &str = "cf_";

/// Check if an email domain belongs to a consumer provider
pub fn is_consumer_email_provider(domain: &str) -> bool {
    CONSUMER_EMAIL_PROVIDERS.contains(&domain)
}

// =============================================================================
// Search
// =============================================================================

/// Separator between group, filter name and index in search parameter keys
pub const SEARCH_KEY_SEPARATOR: &str = "-_-";

/// Date format used in search date spans
pub const SEARCH_DATE_FORMAT: &str = "%d/%m/%Y";

/// Year length used by the contact age filter
pub const DAYS_PER_YEAR: f64 = 365.25;
