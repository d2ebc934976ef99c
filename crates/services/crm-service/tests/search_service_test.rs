//! Search service tests over mocked contact queries.

mod support;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sea_orm::{DbBackend, QueryTrait};
use uuid::Uuid;

use common::AppError;
use crm_service_lib::repository::{ContactQuery, MatchedContacts};
use crm_service_lib::service::search::{
    ContactHit, ParamValue, SearchManager, SearchRequest, SearchService,
};
use domain::{City, Contact, Entity, Zone, ZoneIndex, ZoneType};
use support::{settings, Mocks};

/// Rows the mocked query returns, contacts with single-contact entities.
struct Fixture {
    matched: MatchedContacts,
}

impl Fixture {
    fn new() -> Self {
        Self {
            matched: MatchedContacts::default(),
        }
    }

    fn entity(&mut self, name: &str) -> Uuid {
        let entity = Entity::new(name);
        let id = entity.id;
        self.matched.entities.insert(id, entity);
        id
    }

    fn contact_in(&mut self, entity_id: Uuid, firstname: &str, lastname: &str) -> Uuid {
        let contact = Contact {
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            ..Contact::new(entity_id)
        };
        let id = contact.id;
        self.matched.contacts.push(contact);
        id
    }

    fn contact(&mut self, firstname: &str, lastname: &str) -> Uuid {
        let entity_id = self.entity(&format!("{} {}", firstname, lastname));
        self.contact_in(entity_id, firstname, lastname)
    }

    fn edit(&mut self, id: Uuid, change: impl FnOnce(&mut Contact)) {
        if let Some(contact) = self.matched.contacts.iter_mut().find(|c| c.id == id) {
            change(contact);
        }
    }

    fn mocks(self) -> Mocks {
        let mut mocks = Mocks::default();
        let matched = self.matched;
        mocks
            .search
            .expect_find_contacts()
            .returning(move |_| Ok(matched.clone()));
        mocks
    }

    fn service(self) -> SearchManager<support::TestUnitOfWork> {
        SearchManager::new(self.mocks().into_uow(), settings())
    }
}

fn request(params: &[(&str, &str)]) -> SearchRequest {
    SearchRequest {
        params: params
            .iter()
            .map(|(k, v)| (k.to_string(), ParamValue::from(*v)))
            .collect(),
        excluded: vec![],
    }
}

fn sql(query: ContactQuery) -> String {
    query.select().build(DbBackend::Postgres).to_string()
}

fn lastnames(hits: &[ContactHit]) -> Vec<String> {
    let mut names: Vec<String> = hits.iter().map(|h| h.lastname.clone()).collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_groups_run_as_one_query() {
    let queries = Arc::new(Mutex::new(Vec::new()));

    let mut mocks = Mocks::default();
    let seen = queries.clone();
    mocks.search.expect_find_contacts().times(1).returning(move |query| {
        seen.lock().unwrap().push(sql(query));
        Ok(MatchedContacts::default())
    });
    let service = SearchManager::new(mocks.into_uow(), settings());

    let hits = service
        .search_contacts(request(&[
            ("gr0-_-contact_name-_-0", "ABCD"),
            ("gr0-_-contact_firstname-_-1", "Paul"),
            ("gr1-_-contact_name-_-0", "ABCA"),
        ]))
        .await
        .unwrap();

    assert!(hits.is_empty());
    let queries = queries.lock().unwrap();
    let (conditions, order) = queries[0].split_once(" ORDER BY ").unwrap();
    assert!(conditions.contains(r#"LIKE '%abcd%'"#));
    assert!(conditions.contains(r#"LIKE '%paul%'"#));
    assert!(conditions.contains(") OR ("));
    assert!(order.contains("CASE WHEN"));
}

#[tokio::test]
async fn test_hits_keep_query_order() {
    let mut fixture = Fixture::new();
    fixture.contact("", "Zed");
    fixture.contact("", "Able");
    let service = fixture.service();

    let hits = service
        .search_contacts(request(&[("gr0-_-has_entity-_-0", "0")]))
        .await
        .unwrap();

    let names: Vec<&str> = hits.iter().map(|h| h.lastname.as_str()).collect();
    assert_eq!(names, vec!["Zed", "Able"]);
}

#[tokio::test]
async fn test_contact_without_loaded_entity_is_skipped() {
    let mut fixture = Fixture::new();
    fixture.contact("", "Kept");
    fixture.contact_in(Uuid::new_v4(), "", "Orphan");
    let service = fixture.service();

    let hits = service
        .search_contacts(request(&[("gr0-_-has_entity-_-0", "0")]))
        .await
        .unwrap();

    assert_eq!(lastnames(&hits), vec!["Kept"]);
}

fn same_as_fixture(priorities: &[i32]) -> (Fixture, Vec<Uuid>) {
    let mut fixture = Fixture::new();
    let same_as_id = Uuid::new_v4();
    let ids = priorities
        .iter()
        .map(|priority| {
            let id = fixture.contact(&format!("P{}", priority), "Dupond");
            fixture.edit(id, |c| {
                c.same_as_id = Some(same_as_id);
                c.same_as_priority = *priority;
            });
            id
        })
        .collect();
    (fixture, ids)
}

#[tokio::test]
async fn test_same_as_keeps_the_top_priority_contact() {
    let (fixture, ids) = same_as_fixture(&[2, 1]);
    let service = fixture.service();

    let hits = service
        .search_contacts(request(&[("gr0-_-contact_name-_-0", "dupond")]))
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, ids[1]);
}

#[tokio::test]
async fn test_no_same_as_keeps_every_contact() {
    let (fixture, _) = same_as_fixture(&[1, 2]);
    let service = fixture.service();

    let hits = service
        .search_contacts(request(&[
            ("gr0-_-contact_name-_-0", "dupond"),
            ("gr0-_-no_same_as-_-1", "1"),
        ]))
        .await
        .unwrap();

    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn test_same_as_falls_back_when_top_priority_is_not_matched() {
    let (mut fixture, ids) = same_as_fixture(&[1, 3, 2]);
    fixture.matched.contacts.retain(|c| c.id != ids[0]);
    let service = fixture.service();

    let hits = service
        .search_contacts(request(&[("gr0-_-contact_name-_-0", "dupond")]))
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, ids[2]);
}

#[tokio::test]
async fn test_duplicated_contacts() {
    let mut fixture = Fixture::new();
    fixture.contact("Pierre", "Dupond");
    fixture.contact("Pierre", "Dupond");
    fixture.contact("Paul", "Dupond");
    fixture.contact("Jean", "Martin");
    let mocks = fixture.mocks();
    let service = SearchManager::new(mocks.into_uow(), settings());

    let by_fullname = service
        .search_contacts(request(&[
            ("gr0-_-has_entity-_-0", "1"),
            ("gr0-_-duplicated_contacts-_-1", "1"),
        ]))
        .await
        .unwrap();
    let by_lastname = service
        .search_contacts(request(&[
            ("gr0-_-has_entity-_-0", "1"),
            ("gr0-_-duplicated_contacts-_-1", "2"),
        ]))
        .await
        .unwrap();

    let firstnames: Vec<&str> = by_fullname.iter().map(|h| h.firstname.as_str()).collect();
    assert_eq!(firstnames, vec!["Pierre", "Pierre"]);
    assert_eq!(by_lastname.len(), 3);
}

#[tokio::test]
async fn test_post_filters_apply_to_every_group() {
    let mut fixture = Fixture::new();
    let first = fixture.contact("Anne", "Alpha");
    let second = fixture.contact("Bob", "Beta");
    fixture.edit(first, |c| c.email = "shared@example.com".to_string());
    fixture.edit(second, |c| c.email = "shared@example.com".to_string());
    let service = fixture.service();

    let hits = service
        .search_contacts(request(&[
            ("gr0-_-contact_name-_-0", "alpha"),
            ("gr0-_-no_same_email-_-1", "0"),
            ("gr1-_-contact_name-_-0", "beta"),
        ]))
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, first);
}

#[tokio::test]
async fn test_email_in_group_queries_the_group_members() {
    let group_id = Uuid::new_v4();

    let mut matching = Fixture::new();
    let kept = matching.contact("Marie", "Curie");
    matching.edit(kept, |c| c.email = "marie@radium.fr".to_string());
    let other = matching.contact("Pierre", "Curie");
    matching.edit(other, |c| c.email = "pierre@radium.fr".to_string());

    let mut members = Fixture::new();
    let member = members.contact("Marie", "Sklodowska");
    members.edit(member, |c| c.email = "marie@radium.fr".to_string());

    let calls = Arc::new(Mutex::new(0));
    let mut mocks = Mocks::default();
    let count = calls.clone();
    let (matching, members) = (matching.matched, members.matched);
    mocks.search.expect_find_contacts().times(2).returning(move |query| {
        let mut count = count.lock().unwrap();
        *count += 1;
        if *count == 1 {
            Ok(matching.clone())
        } else {
            assert!(sql(query).contains(&group_id.to_string()));
            Ok(members.clone())
        }
    });
    let service = SearchManager::new(mocks.into_uow(), settings());

    let hits = service
        .search_contacts(request(&[
            ("gr0-_-contact_name-_-0", "curie"),
            ("gr0-_-email_in_group-_-1", &group_id.to_string()),
        ]))
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, kept);
}

#[tokio::test]
async fn test_zipcode_sort_loads_the_zones() {
    let france = Zone {
        id: Uuid::new_v4(),
        name: "France".to_string(),
        code: String::new(),
        zone_type: ZoneType::Country,
        parent_id: None,
        group_ids: vec![],
    };
    let loire = Zone {
        id: Uuid::new_v4(),
        name: "Loire".to_string(),
        code: "42".to_string(),
        zone_type: ZoneType::Department,
        parent_id: None,
        group_ids: vec![],
    };
    let roanne = City {
        id: Uuid::new_v4(),
        name: "Roanne".to_string(),
        parent_id: Some(loire.id),
        group_ids: vec![],
    };

    let mut fixture = Fixture::new();
    fixture.contact("", "Nowhere");
    let located = fixture.contact("", "Roannais");
    fixture.edit(located, |c| {
        c.postal.zip_code = "42300".to_string();
        c.postal.city_id = Some(roanne.id);
    });
    let mut mocks = fixture.mocks();
    let city_id = roanne.id;
    mocks
        .search
        .expect_zone_index()
        .times(1)
        .returning(move |city_ids| {
            assert_eq!(city_ids, vec![city_id]);
            Ok(ZoneIndex::new(
                vec![france.clone(), loire.clone()],
                vec![roanne.clone()],
            ))
        });
    let service = SearchManager::new(mocks.into_uow(), settings());

    let hits = service
        .search_contacts(request(&[
            ("gr0-_-has_entity-_-0", "0"),
            ("gr0-_-sort-_-1", "zipcode"),
        ]))
        .await
        .unwrap();

    let names: Vec<&str> = hits.iter().map(|h| h.lastname.as_str()).collect();
    assert_eq!(names, vec!["Roannais", "Nowhere"]);
}

#[tokio::test]
async fn test_excluded_and_left_contacts_are_hidden() {
    let mut fixture = Fixture::new();
    let kept = fixture.contact("", "ABCD");
    let excluded = fixture.contact("", "ABCE");
    let left = fixture.contact("", "ABCF");
    fixture.edit(left, |c| c.has_left = true);
    let service = fixture.service();

    let mut search = request(&[("gr0-_-contact_name-_-0", "ABC")]);
    search.excluded = vec![excluded];
    let hits = service.search_contacts(search).await.unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, kept);
}

#[tokio::test]
async fn test_results_by_entity() {
    let mut fixture = Fixture::new();
    let zeta = fixture.entity("Zeta");
    let alpha = fixture.entity("Alpha");
    fixture.contact_in(zeta, "Zoe", "Zed");
    fixture.contact_in(alpha, "Ann", "Able");
    let service = fixture.service();

    let results = service
        .search_by_entity(request(&[("gr0-_-has_entity-_-0", "1")]))
        .await
        .unwrap();

    let names: Vec<&str> = results.entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Zeta"]);
    assert_eq!(results.contacts_count, 2);
    assert!(!results.has_empty_entities);
}

#[tokio::test]
async fn test_emails_skip_contacts_without_address() {
    let mut fixture = Fixture::new();
    let with_email = fixture.contact("Marie", "Curie");
    fixture.edit(with_email, |c| c.email = "marie@radium.fr".to_string());
    fixture.contact("Pierre", "Curie");
    let service = fixture.service();

    let emails = service
        .search_emails(request(&[("gr0-_-contact_name-_-0", "curie")]))
        .await
        .unwrap();

    assert_eq!(emails, vec!["\"Marie Curie\" <marie@radium.fr>".to_string()]);
}

#[tokio::test]
async fn test_invalid_query_fails_before_querying() {
    let mut mocks = Mocks::default();
    mocks.search.expect_find_contacts().never();
    let service = SearchManager::new(mocks.into_uow(), settings());

    let unknown = service
        .search_contacts(request(&[("gr0-_-favorite_color-_-0", "blue")]))
        .await;
    let bad_dates = service
        .search_contacts(request(&[("gr0-_-contacts_by_creation_date-_-0", "yesterday")]))
        .await;
    let nothing = service.search_contacts(request(&[])).await.unwrap();

    assert!(matches!(unknown, Err(AppError::Validation(_))));
    assert!(matches!(bad_dates, Err(AppError::Validation(_))));
    assert!(nothing.is_empty());
}

#[test]
fn test_request_accepts_lists_and_single_values() {
    let json = r#"{"params": {"gr0-_-any_groups-_-0": ["a", "b"], "gr0-_-city-_-1": "c"}}"#;
    let parsed: SearchRequest = serde_json::from_str(json).unwrap();
    let expected: HashMap<&str, ParamValue> = HashMap::from([
        (
            "gr0-_-any_groups-_-0",
            ParamValue::Many(vec!["a".to_string(), "b".to_string()]),
        ),
        ("gr0-_-city-_-1", ParamValue::One("c".to_string())),
    ]);
    for (key, value) in expected {
        assert_eq!(parsed.params.get(key), Some(&value));
    }
    assert!(parsed.excluded.is_empty());
}
