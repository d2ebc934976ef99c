//! City service - resolves free-text city names to cities of the zone tree.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::infra::UnitOfWork;
use crate::repository::ZoneRepository;
use common::{AppError, AppResult, CrmSettings};
use domain::text::fold;
use domain::{format_city_name, City, NewZone, Zone, DEPARTMENT_CODE_LENGTH};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Where a city name was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityQuery {
    pub city_name: String,
    pub zip_code: String,
    /// Empty or the default country for domestic cities
    pub country: String,
    /// Department code used when the zip code is empty
    pub default_department: String,
}

/// The candidates named exactly `name` once folded, else all of them.
fn prefer_exact<T>(candidates: Vec<T>, name: &str, name_of: impl Fn(&T) -> &str) -> Vec<T> {
    let wanted = fold(name);
    let (exact, partial): (Vec<T>, Vec<T>) = candidates
        .into_iter()
        .partition(|candidate| fold(name_of(candidate)) == wanted);
    if exact.is_empty() {
        partial
    } else {
        exact
    }
}

/// Resolution rules, bound to whichever zone repository the caller holds.
pub struct CityResolver<'r> {
    zones: &'r dyn ZoneRepository,
    settings: &'r CrmSettings,
}

impl<'r> CityResolver<'r> {
    pub fn new(zones: &'r dyn ZoneRepository, settings: &'r CrmSettings) -> Self {
        Self { zones, settings }
    }

    fn is_foreign(&self, country: &str) -> bool {
        !country.is_empty() && country != self.settings.default_country
    }

    /// Return the matching city, creating it (and its country) when missing.
    pub async fn resolve(&self, query: &CityQuery) -> AppResult<City> {
        let country = query.country.trim();
        let name = format_city_name(&query.city_name, &self.settings.city_formatters);

        let parent = if self.is_foreign(country) {
            self.foreign_country(country).await?
        } else {
            self.department(&query.zip_code, &query.default_department)
                .await?
        };

        let candidates = self.zones.find_cities_matching(parent.id, &name).await?;
        let mut cities = prefer_exact(candidates, &name, |city| city.name.as_str());
        match cities.len() {
            0 => self.zones.create_city(name, parent.id).await,
            1 => Ok(cities.remove(0)),
            count => {
                tracing::warn!("{} different cities for '{}' {}", count, name, parent);
                Ok(cities.remove(0))
            }
        }
    }

    async fn foreign_country(&self, country: &str) -> AppResult<Zone> {
        let candidates = self.zones.find_countries_matching(country).await?;
        let mut zones = prefer_exact(candidates, country, |zone| zone.name.as_str());
        match zones.len() {
            0 => self.zones.create_zone(NewZone::country(country)).await,
            count => {
                if count > 1 {
                    tracing::warn!("{} different zones for '{}'", count, country);
                }
                Ok(zones.remove(0))
            }
        }
    }

    async fn department(&self, zip_code: &str, default_department: &str) -> AppResult<Zone> {
        let code = department_code(zip_code, default_department)
            .ok_or_else(invalid_zip_code)?;
        self.zones
            .find_zone_by_code(&code)
            .await?
            .ok_or_else(invalid_zip_code)
    }

    /// True when exactly one city of the parent zone carries this name.
    pub async fn exists(&self, city_name: &str, zip_code: &str, country: &str) -> AppResult<bool> {
        let parent = if self.is_foreign(country) {
            self.zones
                .find_countries_by_name(country)
                .await?
                .into_iter()
                .next()
        } else {
            match department_code(zip_code, "") {
                Some(code) => self.zones.find_zone_by_code(&code).await?,
                None => None,
            }
        };

        let Some(parent) = parent else {
            return Ok(false);
        };
        let cities = self.zones.find_cities_by_name(parent.id, city_name).await?;
        Ok(cities.len() == 1)
    }

    /// The top-level zone of the configured default country.
    pub async fn default_country(&self) -> AppResult<Zone> {
        let name = &self.settings.default_country;
        let existing = self
            .zones
            .find_countries_by_name(name)
            .await?
            .into_iter()
            .find(|zone| zone.parent_id.is_none());

        match existing {
            Some(zone) => Ok(zone),
            None => {
                tracing::info!("Creating default country {}", name);
                self.zones
                    .create_zone(NewZone {
                        name: name.clone(),
                        ..NewZone::country(name)
                    })
                    .await
            }
        }
    }
}

/// First two characters of the zip code, else the default department.
fn department_code(zip_code: &str, default_department: &str) -> Option<String> {
    let prefix: String = zip_code.trim().chars().take(DEPARTMENT_CODE_LENGTH).collect();
    if prefix.chars().count() == DEPARTMENT_CODE_LENGTH {
        Some(prefix)
    } else if !default_department.is_empty() {
        Some(default_department.to_string())
    } else {
        None
    }
}

fn invalid_zip_code() -> AppError {
    AppError::validation("invalid zip code for new city")
}

/// City service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CityService: Send + Sync {
    /// Get or create the city, in its own transaction
    async fn resolve_city(&self, query: CityQuery) -> AppResult<City>;

    async fn check_city_exists(&self, city_name: &str, zip_code: &str, country: &str) -> AppResult<bool>;

    async fn default_country(&self) -> AppResult<Zone>;
}

/// Concrete implementation of CityService using Unit of Work.
pub struct CityManager<U: UnitOfWork> {
    uow: Arc<U>,
    settings: Arc<CrmSettings>,
}

impl<U: UnitOfWork> CityManager<U> {
    pub fn new(uow: Arc<U>, settings: Arc<CrmSettings>) -> Self {
        Self { uow, settings }
    }
}

#[async_trait]
impl<U: UnitOfWork> CityService for CityManager<U> {
    async fn resolve_city(&self, query: CityQuery) -> AppResult<City> {
        let settings = self.settings.clone();
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    CityResolver::new(ctx.zones(), &settings)
                        .resolve(&query)
                        .await
                })
            })
            .await
    }

    async fn check_city_exists(&self, city_name: &str, zip_code: &str, country: &str) -> AppResult<bool> {
        let zones = self.uow.zones();
        CityResolver::new(zones.as_ref(), &self.settings)
            .exists(city_name, zip_code, country)
            .await
    }

    async fn default_country(&self) -> AppResult<Zone> {
        let settings = self.settings.clone();
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move { CityResolver::new(ctx.zones(), &settings).default_country().await })
            })
            .await
    }
}

/// Id of the resolved city, or none when the name is blank.
pub async fn resolve_optional_city(
    resolver: &CityResolver<'_>,
    query: &CityQuery,
) -> AppResult<Option<Uuid>> {
    if query.city_name.trim().is_empty() {
        return Ok(None);
    }
    resolver.resolve(query).await.map(|city| Some(city.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_code() {
        assert_eq!(department_code("42100", ""), Some("42".to_string()));
        assert_eq!(department_code("", "69"), Some("69".to_string()));
        assert_eq!(department_code("7", "69"), Some("69".to_string()));
        assert_eq!(department_code("7", ""), None);
        assert_eq!(department_code("  ", ""), None);
    }
}
