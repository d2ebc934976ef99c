//! Filters that need the whole result set rather than one contact.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::evaluator::Hit;
use super::query::{DuplicateEmails, DuplicateKey};

/// Keep one contact per same-as group: the lowest priority present, at the
/// position of the first one met.
pub fn keep_top_same_as(hits: Vec<Hit<'_>>) -> Vec<Hit<'_>> {
    let mut slots: HashMap<Uuid, usize> = HashMap::new();
    let mut kept: Vec<Hit<'_>> = Vec::with_capacity(hits.len());

    for hit in hits {
        let Some(same_as_id) = hit.contact.same_as_id else {
            kept.push(hit);
            continue;
        };
        match slots.get(&same_as_id) {
            Some(&slot) => {
                if kept[slot].contact.same_as_priority > hit.contact.same_as_priority {
                    kept[slot] = hit;
                }
            }
            None => {
                slots.insert(same_as_id, kept.len());
                kept.push(hit);
            }
        }
    }
    kept
}

pub fn no_same_email(hits: Vec<Hit<'_>>, mode: DuplicateEmails) -> Vec<Hit<'_>> {
    let mut emails = HashSet::new();
    hits.into_iter()
        .filter(|hit| {
            let email = hit.email();
            if email.is_empty() {
                return false;
            }
            let first = emails.insert(email);
            match mode {
                DuplicateEmails::Exclude => first,
                DuplicateEmails::Only => !first,
            }
        })
        .collect()
}

/// Pairs `(later, earlier)` of contacts sharing a name.
pub fn duplicated_contacts(hits: Vec<Hit<'_>>, key: DuplicateKey) -> Vec<Hit<'_>> {
    let mut firsts: HashMap<String, Hit<'_>> = HashMap::new();
    let mut emitted = HashSet::new();
    let mut pairs = Vec::new();

    for hit in hits {
        if hit.contact.lastname.is_empty() {
            continue;
        }
        let name = match key {
            DuplicateKey::Lastname => hit.contact.lastname.clone(),
            DuplicateKey::Fullname => hit.contact.fullname(),
        };
        match firsts.get(&name) {
            Some(earlier) => {
                for member in [hit, *earlier] {
                    if emitted.insert(member.contact.id) {
                        pairs.push(member);
                    }
                }
            }
            None => {
                firsts.insert(name, hit);
            }
        }
    }
    pairs
}

pub fn email_in<'d>(hits: Vec<Hit<'d>>, emails: &HashSet<String>) -> Vec<Hit<'d>> {
    hits.into_iter()
        .filter(|hit| {
            let email = hit.email();
            !email.is_empty() && emails.contains(email)
        })
        .collect()
}
