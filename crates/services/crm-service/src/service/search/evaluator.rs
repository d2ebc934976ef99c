//! Merged-result stage of a search: post-filters and the same-as policy.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::post_filters;
use super::query::{SearchFilter, SearchQuery};
use super::sort;
use crate::repository::MatchedContacts;
use common::CrmSettings;
use domain::{Contact, Entity, ZoneIndex};

/// A contact together with its entity.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'d> {
    pub contact: &'d Contact,
    pub entity: &'d Entity,
}

impl<'d> Hit<'d> {
    pub fn email(&self) -> &'d str {
        self.contact.effective_email(self.entity)
    }
}

/// Data the post-filters look up beyond the matched contacts.
#[derive(Debug, Default)]
pub struct PostFilterData {
    /// Effective emails of the members of each `email_in_group` group
    pub group_emails: HashMap<Uuid, HashSet<String>>,
    /// Loaded only when sorting by zip code
    pub zones: ZoneIndex,
}

pub struct SearchEvaluator<'d> {
    matched: &'d MatchedContacts,
    extra: &'d PostFilterData,
    settings: &'d CrmSettings,
}

/// Pairs each contact with its entity, in query order.
pub fn hits(matched: &MatchedContacts) -> Vec<Hit<'_>> {
    matched
        .contacts
        .iter()
        .filter_map(|contact| {
            let entity = matched.entities.get(&contact.entity_id);
            if entity.is_none() {
                tracing::warn!("Contact {} has no entity, skipped by search", contact.id);
            }
            entity.map(|entity| Hit { contact, entity })
        })
        .collect()
}

impl<'d> SearchEvaluator<'d> {
    pub fn new(
        matched: &'d MatchedContacts,
        extra: &'d PostFilterData,
        settings: &'d CrmSettings,
    ) -> Self {
        Self {
            matched,
            extra,
            settings,
        }
    }

    /// Global post-filters in the order met, then the same-as policy.
    ///
    /// Contacts who left and manually excluded ones are still present:
    /// each result shape removes them its own way.
    pub fn evaluate(&self, query: &SearchQuery) -> Vec<Hit<'d>> {
        let mut hits = hits(self.matched);

        for filter in query.global_filters() {
            hits = self.post_process(hits, filter);
        }

        if !query.allows_same_as() {
            hits = post_filters::keep_top_same_as(hits);
        }
        hits
    }

    fn post_process(&self, hits: Vec<Hit<'d>>, filter: &SearchFilter) -> Vec<Hit<'d>> {
        match filter {
            SearchFilter::NoSameEmail(mode) => post_filters::no_same_email(hits, *mode),
            SearchFilter::DuplicatedContacts(key) => post_filters::duplicated_contacts(hits, *key),
            SearchFilter::EmailInGroup(group_id) => match self.extra.group_emails.get(group_id) {
                Some(emails) => post_filters::email_in(hits, emails),
                None => Vec::new(),
            },
            SearchFilter::Sort(key) => {
                sort::sort_hits(hits, *key, &self.extra.zones, &self.settings.default_country)
            }
            _ => hits,
        }
    }
}
