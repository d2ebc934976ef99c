//! Positional column layout of contact import files.

use common::{AppError, AppResult};
use domain::{subscription_fields, CustomField, SubscriptionField, SubscriptionType, CUSTOM_FIELD_PREFIX};

const CONTACT_COLUMNS: &[&str] = &[
    "gender", "firstname", "lastname", "email", "phone", "mobile", "job", "notes", "role",
];

const ENTITY_AND_ADDRESS_COLUMNS: &[&str] = &[
    "entity",
    "entity.type",
    "entity.description",
    "entity.website",
    "entity.email",
    "entity.phone",
    "entity.fax",
    "entity.notes",
    "entity.address",
    "entity.address2",
    "entity.address3",
    "entity.city",
    "entity.cedex",
    "entity.zip_code",
    "entity.country",
    "address",
    "address2",
    "address3",
    "city",
    "cedex",
    "zip_code",
    "country",
    "entity.groups",
    "groups",
    "favorite_language",
    "title",
    "birth_date",
];

/// Column names of an import file, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportColumns {
    names: Vec<String>,
    subscriptions: Vec<SubscriptionField>,
    /// Field of each `cf_<i>` column; `None` for gaps in the import order
    custom_fields: Vec<Option<CustomField>>,
}

impl ImportColumns {
    /// `custom_fields` are the fields with an import column, by import order.
    pub fn new(subscription_types: &[SubscriptionType], custom_fields: Vec<CustomField>) -> AppResult<Self> {
        let subscriptions = subscription_fields(subscription_types);

        let count = custom_fields
            .iter()
            .map(|f| f.import_order.max(0) as usize)
            .max()
            .unwrap_or(0);
        let mut slots: Vec<Option<CustomField>> = vec![None; count];
        for field in custom_fields.into_iter().filter(|f| f.import_order > 0) {
            let index = field.import_order as usize;
            let slot = &mut slots[index - 1];
            if slot.is_some() {
                return Err(AppError::validation(format!(
                    "There are several custom fields with index {}",
                    index
                )));
            }
            *slot = Some(field);
        }

        let names = CONTACT_COLUMNS
            .iter()
            .map(|name| name.to_string())
            .chain(subscriptions.iter().map(|field| field.key.clone()))
            .chain(ENTITY_AND_ADDRESS_COLUMNS.iter().map(|name| name.to_string()))
            .chain((1..=count).map(custom_field_column))
            .collect();

        Ok(Self {
            names,
            subscriptions,
            custom_fields: slots,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn subscriptions(&self) -> &[SubscriptionField] {
        &self.subscriptions
    }

    /// `(column name, field)` for every custom field column.
    pub fn custom_fields(&self) -> impl Iterator<Item = (String, Option<&CustomField>)> {
        self.custom_fields
            .iter()
            .enumerate()
            .map(|(index, field)| (custom_field_column(index + 1), field.as_ref()))
    }

    /// Header line of a blank import file: every column `"`-quoted and `;`-separated,
    /// custom fields under their own names.
    pub fn template(&self) -> String {
        let fixed = self.names.len() - self.custom_fields.len();
        let custom = self
            .custom_fields
            .iter()
            .map(|field| field.as_ref().map(|f| f.name.as_str()).unwrap_or_default());
        let header = self.names[..fixed]
            .iter()
            .map(String::as_str)
            .chain(custom)
            .map(|name| format!("\"{}\"", name))
            .collect::<Vec<_>>()
            .join(";");
        format!("{}\n", header)
    }
}

fn custom_field_column(index: usize) -> String {
    format!("{}{}", CUSTOM_FIELD_PREFIX, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::CustomFieldModel;
    use uuid::Uuid;

    fn custom_field(name: &str, import_order: i32) -> CustomField {
        CustomField {
            id: Uuid::new_v4(),
            model: CustomFieldModel::Contact,
            name: name.to_string(),
            label: name.to_string(),
            widget: String::new(),
            ordering: 0,
            import_order,
            export_order: 0,
            is_link: false,
        }
    }

    fn newsletter() -> SubscriptionType {
        SubscriptionType {
            id: Uuid::new_v4(),
            name: "Newsletter".to_string(),
            order_index: 1,
        }
    }

    #[test]
    fn test_column_order() {
        let columns = ImportColumns::new(&[newsletter()], vec![custom_field("siret", 2)]).unwrap();
        let names = columns.names();

        assert_eq!(names[0], "gender");
        assert_eq!(names[8], "role");
        assert_eq!(names[9], "accept_newsletter");
        assert_eq!(names[10], "entity");
        assert_eq!(names[names.len() - 3], "birth_date");
        assert_eq!(&names[names.len() - 2..], &["cf_1".to_string(), "cf_2".to_string()]);

        let fields: Vec<Option<String>> = columns
            .custom_fields()
            .map(|(_, field)| field.map(|f| f.name.clone()))
            .collect();
        assert_eq!(fields, vec![None, Some("siret".to_string())]);
    }

    #[test]
    fn test_duplicate_import_order_fails() {
        let result = ImportColumns::new(&[], vec![custom_field("a", 1), custom_field("b", 1)]);
        assert!(matches!(
            result,
            Err(AppError::Validation(msg)) if msg == "There are several custom fields with index 1"
        ));
    }

    #[test]
    fn test_template_uses_custom_field_names() {
        let columns = ImportColumns::new(&[], vec![custom_field("siret", 1)]).unwrap();
        let template = columns.template();

        assert!(template.starts_with("\"gender\";\"firstname\";"));
        assert!(template.ends_with(";\"birth_date\";\"siret\"\n"));
    }
}
