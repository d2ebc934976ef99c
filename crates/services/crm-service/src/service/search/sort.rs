//! Result ordering for the `sort` filter.

use super::evaluator::Hit;
use super::query::SortKey;
use domain::ZoneIndex;

const UNRESOLVED: &str = "?";

/// Lowercase "lastname firstname" for single-contact entities, else the entity name.
fn name_key(hit: &Hit<'_>) -> String {
    if hit.entity.is_single_contact {
        format!("{} {}", hit.contact.lastname, hit.contact.firstname).to_lowercase()
    } else {
        hit.entity.name.to_lowercase()
    }
}

/// `(prefix, country, zip, city, name)`: `A` home country, `B` abroad, `C` no city.
fn zipcode_key(hit: &Hit<'_>, zones: &ZoneIndex, default_country: &str) -> [String; 5] {
    let zip_code = hit.contact.effective_zip_code(hit.entity);
    let zip_code = if zip_code.is_empty() { UNRESOLVED } else { zip_code };
    let city = hit
        .contact
        .effective_city_id(hit.entity)
        .and_then(|id| zones.city(id));

    let (prefix, country, city_name) = match city {
        None => ("C", UNRESOLVED.to_string(), UNRESOLVED.to_string()),
        Some(city) => match zones.foreign_country_of(city, default_country) {
            Some(country) => ("B", country.name.clone(), city.name.clone()),
            None => ("A", default_country.to_string(), city.name.clone()),
        },
    };

    [prefix.to_string(), country, zip_code.to_string(), city_name, name_key(hit)]
}

pub fn sort_hits<'d>(
    mut hits: Vec<Hit<'d>>,
    key: SortKey,
    zones: &ZoneIndex,
    default_country: &str,
) -> Vec<Hit<'d>> {
    match key {
        SortKey::Entity => hits.sort_by_cached_key(|hit| {
            (
                hit.entity.name.to_lowercase(),
                hit.contact.lastname.to_lowercase(),
                hit.contact.firstname.to_lowercase(),
            )
        }),
        SortKey::Contact => hits.sort_by_cached_key(|hit| {
            (
                hit.contact.lastname.to_lowercase(),
                hit.contact.firstname.to_lowercase(),
                hit.entity.name.to_lowercase(),
            )
        }),
        SortKey::Name => hits.sort_by_cached_key(name_key),
        SortKey::Zipcode => {
            hits.sort_by_cached_key(|hit| zipcode_key(hit, zones, default_country))
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{City, Contact, Entity, Zone, ZoneType};
    use uuid::Uuid;

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

    fn city(name: &str, parent: &Zone) -> City {
        City {
            id: Uuid::new_v4(),
            name: name.to_string(),
            parent_id: Some(parent.id),
            group_ids: vec![],
        }
    }

    fn entity(name: &str, zip_code: &str, city: Option<&City>) -> Entity {
        let mut entity = Entity::new(name);
        entity.postal.zip_code = zip_code.to_string();
        entity.postal.city_id = city.map(|c| c.id);
        entity
    }

    #[test]
    fn test_zipcode_sort_puts_abroad_then_unknown_last() {
        let france = zone("France", ZoneType::Country, None);
        let loire = zone("Loire", ZoneType::Department, Some(france.id));
        let belgium = zone("Belgique", ZoneType::Country, None);
        let saint_etienne = city("Saint-Etienne", &loire);
        let brussels = city("Bruxelles", &belgium);
        let zones = ZoneIndex::new(
            vec![france, loire.clone(), belgium.clone()],
            vec![saint_etienne.clone(), brussels.clone()],
        );

        let nowhere = entity("Nowhere", "", None);
        let abroad = entity("Abroad", "1000", Some(&brussels));
        let home = entity("Home", "42000", Some(&saint_etienne));
        let contacts: Vec<Contact> = [&nowhere, &abroad, &home]
            .iter()
            .map(|e| Contact::new(e.id))
            .collect();
        let hits = vec![
            Hit { contact: &contacts[0], entity: &nowhere },
            Hit { contact: &contacts[1], entity: &abroad },
            Hit { contact: &contacts[2], entity: &home },
        ];

        let sorted = sort_hits(hits, SortKey::Zipcode, &zones, "France");
        let names: Vec<&str> = sorted.iter().map(|h| h.entity.name.as_str()).collect();
        assert_eq!(names, vec!["Home", "Abroad", "Nowhere"]);
    }

    #[test]
    fn test_name_sort_uses_person_for_single_contact_entities() {
        let acme = Entity::new("Zeta Corp");
        let single = Entity::single_contact("dupond pierre");
        let mut pierre = Contact::new(single.id);
        pierre.lastname = "Dupond".to_string();
        pierre.firstname = "Pierre".to_string();
        let employee = Contact::new(acme.id);

        let hits = vec![
            Hit { contact: &employee, entity: &acme },
            Hit { contact: &pierre, entity: &single },
        ];
        let sorted = sort_hits(hits, SortKey::Name, &ZoneIndex::default(), "France");
        assert_eq!(sorted[0].contact.id, pierre.id);
    }
}
