//! Search service - dynamic filter groups over contacts and entities.
//!
//! Filters AND together inside a group and groups OR together. The query is
//! validated first, then runs as a single contact select; only the post-filters
//! working on the merged result run in memory.

mod evaluator;
mod post_filters;
mod predicates;
mod query;
mod results;
mod sort;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::infra::UnitOfWork;
use crate::repository::{ContactQuery, MatchedContacts};
use common::{AppResult, CrmSettings};

pub use evaluator::{Hit, PostFilterData, SearchEvaluator};
use predicates::{contact_query, PredicateContext};
pub use query::{
    DateSpan, DuplicateEmails, DuplicateKey, FilterStage, ParamValue, SameAsPresence,
    SearchFilter, SearchGroup, SearchQuery, SearchRequest, SortKey, ZoneLevel,
};
pub use results::{ContactHit, EntityHit, EntityResults};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Search service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Matching contacts as a flat list
    async fn search_contacts(&self, request: SearchRequest) -> AppResult<Vec<ContactHit>>;

    /// Matching contacts grouped by entity
    async fn search_by_entity(&self, request: SearchRequest) -> AppResult<EntityResults>;

    /// Mailing lines for the matching contacts
    async fn search_emails(&self, request: SearchRequest) -> AppResult<Vec<String>>;
}

/// Concrete implementation of SearchService using Unit of Work.
pub struct SearchManager<U: UnitOfWork> {
    uow: Arc<U>,
    settings: Arc<CrmSettings>,
}

impl<U: UnitOfWork> SearchManager<U> {
    pub fn new(uow: Arc<U>, settings: Arc<CrmSettings>) -> Self {
        Self { uow, settings }
    }

    /// Parse, query and post-filter, then shape the hits.
    async fn run<R>(
        &self,
        request: &SearchRequest,
        today: NaiveDate,
        shape: impl for<'d> FnOnce(Vec<Hit<'d>>, &SearchQuery) -> R,
    ) -> AppResult<R> {
        let query = SearchQuery::parse(request)?;
        if query.groups.is_empty() {
            return Ok(shape(Vec::new(), &query));
        }

        let context = PredicateContext {
            today,
            default_country: &self.settings.default_country,
        };
        let matched = self
            .uow
            .search()
            .find_contacts(contact_query(&query, &context))
            .await?;
        let extra = self.post_filter_data(&query, &matched).await?;

        let hits = SearchEvaluator::new(&matched, &extra, &self.settings).evaluate(&query);
        tracing::debug!(
            groups = query.groups.len(),
            matched = matched.contacts.len(),
            hits = hits.len(),
            "Search evaluated"
        );
        Ok(shape(hits, &query))
    }

    /// Loads what the query's post-filters need.
    async fn post_filter_data(
        &self,
        query: &SearchQuery,
        matched: &MatchedContacts,
    ) -> AppResult<PostFilterData> {
        let search = self.uow.search();
        let mut data = PostFilterData::default();

        for filter in query.global_filters() {
            match filter {
                SearchFilter::EmailInGroup(group_id) if !data.group_emails.contains_key(group_id) => {
                    let members = search
                        .find_contacts(ContactQuery::new(predicates::in_group(*group_id)))
                        .await?;
                    let emails: HashSet<String> = evaluator::hits(&members)
                        .into_iter()
                        .map(|hit| hit.email())
                        .filter(|email| !email.is_empty())
                        .map(str::to_string)
                        .collect();
                    data.group_emails.insert(*group_id, emails);
                }
                SearchFilter::Sort(SortKey::Zipcode) => {
                    let mut city_ids: Vec<_> = evaluator::hits(matched)
                        .iter()
                        .filter_map(|hit| hit.contact.effective_city_id(hit.entity))
                        .collect();
                    city_ids.sort_unstable();
                    city_ids.dedup();
                    data.zones = search.zone_index(city_ids).await?;
                }
                _ => {}
            }
        }
        Ok(data)
    }
}

#[async_trait]
impl<U: UnitOfWork> SearchService for SearchManager<U> {
    async fn search_contacts(&self, request: SearchRequest) -> AppResult<Vec<ContactHit>> {
        self.run(&request, Utc::now().date_naive(), results::contacts)
            .await
    }

    async fn search_by_entity(&self, request: SearchRequest) -> AppResult<EntityResults> {
        self.run(&request, Utc::now().date_naive(), results::by_entity)
            .await
    }

    async fn search_emails(&self, request: SearchRequest) -> AppResult<Vec<String>> {
        self.run(&request, Utc::now().date_naive(), results::emails)
            .await
    }
}
