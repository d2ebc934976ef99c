//! Interpretation of one import line.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::columns::ImportColumns;
use domain::text::capitalize;
use domain::{
    is_consumer_email_provider, split_email, Gender, BIRTH_DATE_FORMATS, COUPLE_GENDER_CODES,
    MALE_GENDER_CODES, UNKNOWN_NAME,
};

/// How cells are interpreted, from the import and the CRM settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowOptions {
    pub allow_couple_gender: bool,
    pub entity_name_from_email: bool,
}

/// Entity columns of a line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityCells {
    pub name: String,
    pub entity_type: String,
    pub description: String,
    pub website: String,
    pub email: String,
    pub phone: String,
    pub fax: String,
    pub notes: String,
    pub address: String,
    pub address2: String,
    pub address3: String,
    pub city: String,
    pub cedex: String,
    pub zip_code: String,
    pub country: String,
}

/// Postal columns of the contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressCells {
    pub address: String,
    pub address2: String,
    pub address3: String,
    pub city: String,
    pub cedex: String,
    pub zip_code: String,
    pub country: String,
}

/// A parsed import line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRow {
    /// `None` when the gender cell is blank
    pub gender: Option<Gender>,
    pub title: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub mobile: String,
    pub job: String,
    pub notes: String,
    pub favorite_language: String,
    pub birth_date: Option<NaiveDate>,
    pub roles: Vec<String>,
    /// Subscription type id and whether its cell is set
    pub subscriptions: Vec<(Uuid, bool)>,
    pub entity: EntityCells,
    pub address: AddressCells,
    pub entity_groups: Vec<String>,
    pub contact_groups: Vec<String>,
    /// Raw value of each `cf_<i>` column
    pub custom_values: Vec<String>,
}

/// Cell lookup by column name; missing cells read as empty.
struct Cells<'a> {
    values: HashMap<&'a str, &'a str>,
}

impl<'a> Cells<'a> {
    fn new(columns: &'a ImportColumns, row: &'a [String]) -> Self {
        let values = columns
            .names()
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), row.get(index).map(String::as_str).unwrap_or("")))
            .collect();
        Self { values }
    }

    fn get(&self, name: &str) -> &'a str {
        self.values.get(name).copied().unwrap_or("")
    }

    fn text(&self, name: &str) -> String {
        self.get(name).to_string()
    }
}

pub fn parse_gender(cell: &str, allow_couple_gender: bool) -> Option<Gender> {
    if cell.is_empty() {
        None
    } else if MALE_GENDER_CODES.contains(&cell) {
        Some(Gender::Male)
    } else if allow_couple_gender && COUPLE_GENDER_CODES.contains(&cell) {
        Some(Gender::Couple)
    } else {
        Some(Gender::Female)
    }
}

/// `;` separated list, else `,` separated.
pub fn split_roles(cell: &str) -> Vec<String> {
    let separator = if cell.contains(';') { ';' } else { ',' };
    split_names(cell, separator)
}

fn split_names(cell: &str, separator: char) -> Vec<String> {
    cell.split(separator)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_birth_date(cell: &str) -> Option<NaiveDate> {
    BIRTH_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(cell.trim(), format).ok())
}

/// `first.last` gives both names, anything else becomes the lastname.
fn names_from(source: &str) -> (String, String) {
    let parts: Vec<&str> = source.split('.').collect();
    match parts.as_slice() {
        [first, last] => (capitalize(first), capitalize(last)),
        _ => (String::new(), capitalize(source)),
    }
}

impl ImportRow {
    pub fn parse(row: &[String], columns: &ImportColumns, options: RowOptions) -> Self {
        let cells = Cells::new(columns, row);
        let email = cells.text("email");

        let mut entity_name = cells.text("entity");
        let mut name_source = None;
        if entity_name.is_empty() && options.entity_name_from_email {
            if let Some(parts) = split_email(&email) {
                entity_name = if is_consumer_email_provider(&parts.cpn) {
                    parts.name.clone()
                } else {
                    parts.cpn
                };
                name_source = Some(parts.name);
            }
        }

        let mut firstname = cells.text("firstname");
        let mut lastname = cells.text("lastname");
        if firstname.is_empty() && lastname.is_empty() {
            let source = match name_source {
                Some(name) => name,
                None if !entity_name.is_empty() => entity_name.clone(),
                None => UNKNOWN_NAME.to_string(),
            };
            (firstname, lastname) = names_from(&source);
        }

        let subscriptions = columns
            .subscriptions()
            .iter()
            .map(|field| (field.subscription_type_id, !cells.get(&field.key).is_empty()))
            .collect();
        let custom_values = columns
            .custom_fields()
            .map(|(name, _)| cells.text(&name))
            .collect();

        Self {
            gender: parse_gender(cells.get("gender"), options.allow_couple_gender),
            title: cells.text("title"),
            firstname,
            lastname,
            email,
            phone: cells.text("phone"),
            mobile: cells.text("mobile"),
            job: cells.text("job"),
            notes: cells.text("notes"),
            favorite_language: cells.text("favorite_language"),
            birth_date: parse_birth_date(cells.get("birth_date")),
            roles: split_roles(cells.get("role")),
            subscriptions,
            entity: EntityCells {
                name: entity_name,
                entity_type: cells.text("entity.type"),
                description: cells.text("entity.description"),
                website: cells.text("entity.website"),
                email: cells.text("entity.email"),
                phone: cells.text("entity.phone"),
                fax: cells.text("entity.fax"),
                notes: cells.text("entity.notes"),
                address: cells.text("entity.address"),
                address2: cells.text("entity.address2"),
                address3: cells.text("entity.address3"),
                city: cells.text("entity.city"),
                cedex: cells.text("entity.cedex"),
                zip_code: cells.text("entity.zip_code"),
                country: cells.text("entity.country"),
            },
            address: AddressCells {
                address: cells.text("address"),
                address2: cells.text("address2"),
                address3: cells.text("address3"),
                city: cells.text("city"),
                cedex: cells.text("cedex"),
                zip_code: cells.text("zip_code"),
                country: cells.text("country"),
            },
            entity_groups: split_names(cells.get("entity.groups"), ';'),
            contact_groups: split_names(cells.get("groups"), ';'),
            custom_values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPTIONS: RowOptions = RowOptions {
        allow_couple_gender: false,
        entity_name_from_email: true,
    };

    fn columns() -> ImportColumns {
        ImportColumns::new(&[], vec![]).unwrap()
    }

    fn row(values: &[(&str, &str)]) -> Vec<String> {
        let columns = columns();
        columns
            .names()
            .iter()
            .map(|name| {
                values
                    .iter()
                    .find(|(column, _)| column == name)
                    .map(|(_, value)| value.to_string())
                    .unwrap_or_default()
            })
            .collect()
    }

    #[test]
    fn test_gender_codes() {
        assert_eq!(parse_gender("Mr", false), Some(Gender::Male));
        assert_eq!(parse_gender("M.", false), Some(Gender::Male));
        assert_eq!(parse_gender("Mme", false), Some(Gender::Female));
        assert_eq!(parse_gender("Mme et M.", false), Some(Gender::Female));
        assert_eq!(parse_gender("Mme et M.", true), Some(Gender::Couple));
        assert_eq!(parse_gender("", true), None);
    }

    #[test]
    fn test_consumer_email_gives_person_entity() {
        let parsed = ImportRow::parse(&row(&[("email", "john@gmail.com")]), &columns(), OPTIONS);
        assert_eq!(parsed.entity.name, "john");
        assert_eq!(parsed.lastname, "John");
        assert_eq!(parsed.firstname, "");
    }

    #[test]
    fn test_company_email_gives_company_entity() {
        let parsed = ImportRow::parse(&row(&[("email", "pierre.dupont@apidev.fr")]), &columns(), OPTIONS);
        assert_eq!(parsed.entity.name, "apidev");
        assert_eq!(parsed.firstname, "Pierre");
        assert_eq!(parsed.lastname, "Dupont");
    }

    #[test]
    fn test_names_from_entity_cell() {
        let parsed = ImportRow::parse(&row(&[("entity", "pierre.dupont")]), &columns(), OPTIONS);
        assert_eq!(parsed.firstname, "Pierre");
        assert_eq!(parsed.lastname, "Dupont");
        assert_eq!(parsed.entity.name, "pierre.dupont");
    }

    #[test]
    fn test_email_ignored_when_disabled() {
        let options = RowOptions {
            entity_name_from_email: false,
            ..OPTIONS
        };
        let parsed = ImportRow::parse(&row(&[("email", "john@gmail.com")]), &columns(), options);
        assert_eq!(parsed.entity.name, "");
        assert_eq!(parsed.lastname, "< unknown >");
    }

    #[test]
    fn test_given_names_are_kept() {
        let parsed = ImportRow::parse(
            &row(&[("firstname", "Marie"), ("lastname", "Curie"), ("entity", "Radium")]),
            &columns(),
            OPTIONS,
        );
        assert_eq!((parsed.firstname.as_str(), parsed.lastname.as_str()), ("Marie", "Curie"));
    }

    #[test]
    fn test_lists_and_dates() {
        assert_eq!(split_roles("Boss; Owner"), vec!["Boss", "Owner"]);
        assert_eq!(split_roles("Boss, Owner"), vec!["Boss", "Owner"]);
        assert_eq!(split_roles(" Boss "), vec!["Boss"]);
        assert!(split_roles("").is_empty());

        let parsed = ImportRow::parse(
            &row(&[("groups", "A; B;"), ("birth_date", "12/03/1980"), ("lastname", "X")]),
            &columns(),
            OPTIONS,
        );
        assert_eq!(parsed.contact_groups, vec!["A", "B"]);
        assert_eq!(parsed.birth_date, NaiveDate::from_ymd_opt(1980, 3, 12));
        assert_eq!(parse_birth_date("1980-03-12"), NaiveDate::from_ymd_opt(1980, 3, 12));
        assert_eq!(parse_birth_date("March 1980"), None);
    }
}
