//! SQL predicates for the per-contact search filters.
//!
//! Each filter becomes a [`Condition`] over `contacts` joined to `entities`.
//! Links to actions, groups, zones, subscriptions, relationships and custom
//! field values are uncorrelated `IN (subquery)` tests, so a whole search is
//! a single select.

use chrono::{Duration, NaiveDate};
use sea_orm::sea_query::{CaseStatement, Expr, Func, IntoColumnRef, LikeExpr, SelectStatement, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect, QueryTrait};
use uuid::Uuid;

use super::query::{DateSpan, SameAsPresence, SearchFilter, SearchGroup, SearchQuery, ZoneLevel};
use crate::repository::entities::activity::{action, action_contact, action_entity, opportunity};
use crate::repository::entities::custom_field::{
    contact_custom_field_value, custom_field, entity_custom_field_value,
};
use crate::repository::entities::directory::{
    contact, contact_role, entity, group_contact, group_entity,
};
use crate::repository::entities::geography::{city, city_group, zone, zone_group};
use crate::repository::entities::relationship::{relationship, relationship_type};
use crate::repository::entities::subscription::subscription;
use crate::repository::ContactQuery;
use domain::{
    CustomFieldModel, DAYS_PER_YEAR, ZONE_TYPE_COUNTRY, ZONE_TYPE_DEPARTMENT, ZONE_TYPE_REGION,
};

/// Values some predicates depend on besides the filter itself.
#[derive(Debug, Clone, Copy)]
pub struct PredicateContext<'a> {
    pub today: NaiveDate,
    pub default_country: &'a str,
}

/// Groups ORed together, ranked by the first group each contact matches.
pub fn contact_query(query: &SearchQuery, context: &PredicateContext<'_>) -> ContactQuery {
    let groups: Vec<Condition> = query
        .groups
        .iter()
        .map(|group| group_condition(group, context))
        .collect();

    let rank = (groups.len() > 1).then(|| {
        let case = groups
            .iter()
            .enumerate()
            .fold(CaseStatement::new(), |case, (rank, condition)| {
                case.case(condition.clone(), Expr::val(rank as i32))
            });
        let rank: SimpleExpr = case.finally(Expr::val(groups.len() as i32)).into();
        rank
    });

    ContactQuery {
        condition: groups.into_iter().fold(Condition::any(), Condition::add),
        rank,
    }
}

/// Predicates of one group ANDed, restricted to main contacts unless the
/// group asks for secondary ones.
pub fn group_condition(group: &SearchGroup, context: &PredicateContext<'_>) -> Condition {
    let mut condition = Condition::all();
    if !group.has(|f| matches!(f, SearchFilter::SecondaryContact(_))) {
        condition = condition.add(contact::Column::MainContact.eq(true));
    }
    group
        .filters
        .iter()
        .filter_map(|filter| predicate(filter, context))
        .fold(condition, Condition::add)
}

/// The entity or the contact belongs to the group.
pub fn in_group(group_id: Uuid) -> Condition {
    Condition::any()
        .add(contact::Column::EntityId.in_subquery(ids::<group_entity::Entity>(
            group_entity::Column::EntityId,
            Condition::all().add(group_entity::Column::GroupId.eq(group_id)),
        )))
        .add(contact::Column::Id.in_subquery(ids::<group_contact::Entity>(
            group_contact::Column::ContactId,
            Condition::all().add(group_contact::Column::GroupId.eq(group_id)),
        )))
}

/// `SELECT <column> FROM <table> WHERE <condition>`
fn ids<E: EntityTrait>(column: E::Column, condition: Condition) -> SelectStatement {
    E::find()
        .select_only()
        .column(column)
        .filter(condition)
        .into_query()
}

fn yes_no(yes: bool, condition: Condition) -> Condition {
    if yes {
        condition
    } else {
        condition.not()
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn lower_like<C: IntoColumnRef>(column: C, pattern: String) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

/// Case-insensitive containment.
fn icontains<C: IntoColumnRef>(column: C, value: &str) -> SimpleExpr {
    lower_like(column, format!("%{}%", escape_like(value)))
}

/// Case-insensitive prefix.
fn istarts_with<C: IntoColumnRef>(column: C, value: &str) -> SimpleExpr {
    lower_like(column, format!("{}%", escape_like(value)))
}

fn contact_col(column: contact::Column) -> (contact::Entity, contact::Column) {
    (contact::Entity, column)
}

fn entity_col(column: entity::Column) -> (entity::Entity, entity::Column) {
    (entity::Entity, column)
}

fn within<C: ColumnTrait>(column: C, span: &DateSpan) -> SimpleExpr {
    column.between(span.start, span.end)
}

/// `start <= column < end + 1 day`
fn within_extra_day<C: ColumnTrait>(column: C, span: &DateSpan) -> Condition {
    Condition::all()
        .add(column.gte(span.start))
        .add(column.lt(span.end + Duration::days(1)))
}

/// The contact or its entity is linked to an action matching `condition`.
fn with_action(condition: Condition) -> Condition {
    let actions = ids::<action::Entity>(action::Column::Id, condition);
    Condition::any()
        .add(contact::Column::Id.in_subquery(ids::<action_contact::Entity>(
            action_contact::Column::ContactId,
            Condition::all().add(action_contact::Column::ActionId.in_subquery(actions.clone())),
        )))
        .add(contact::Column::EntityId.in_subquery(ids::<action_entity::Entity>(
            action_entity::Column::EntityId,
            Condition::all().add(action_entity::Column::ActionId.in_subquery(actions)),
        )))
}

fn action_where(expr: SimpleExpr) -> Condition {
    with_action(Condition::all().add(expr))
}

fn zones_where(condition: Condition) -> SelectStatement {
    ids::<zone::Entity>(zone::Column::Id, condition)
}

fn cities_under(parents: SelectStatement) -> SelectStatement {
    ids::<city::Entity>(
        city::Column::Id,
        Condition::all().add(city::Column::ParentId.in_subquery(parents)),
    )
}

/// Cities a zone filter value selects.
fn zone_cities(
    level: ZoneLevel,
    entity_only: bool,
    zone_id: Uuid,
    default_country: &str,
) -> SelectStatement {
    let is_type = |zone_type: &str| zone::Column::ZoneType.eq(zone_type);

    match level {
        ZoneLevel::Department => cities_under(zones_where(
            Condition::all()
                .add(zone::Column::Id.eq(zone_id))
                .add(is_type(ZONE_TYPE_DEPARTMENT)),
        )),
        ZoneLevel::Region => {
            let region = zones_where(
                Condition::all()
                    .add(zone::Column::Id.eq(zone_id))
                    .add(is_type(ZONE_TYPE_REGION)),
            );
            let mut parents = Condition::all().add(zone::Column::ParentId.in_subquery(region));
            if entity_only {
                parents = parents.add(is_type(ZONE_TYPE_DEPARTMENT));
            }
            cities_under(zones_where(parents))
        }
        ZoneLevel::LargeRegion => {
            let members = ids::<zone_group::Entity>(
                zone_group::Column::ZoneId,
                Condition::all().add(zone_group::Column::GroupId.eq(zone_id)),
            );
            cities_under(zones_where(
                Condition::all().add(zone::Column::ParentId.in_subquery(members)),
            ))
        }
        ZoneLevel::Country => {
            let home = zones_where(Condition::all().add(zone::Column::Name.eq(default_country)));
            let domestic = Condition::all()
                .add(is_type(ZONE_TYPE_DEPARTMENT))
                .add(Expr::val(zone_id).in_subquery(home.clone()));
            let mut abroad = Condition::all()
                .add(zone::Column::Id.eq(zone_id))
                .add(Expr::val(zone_id).not_in_subquery(home));
            if entity_only {
                abroad = abroad.add(is_type(ZONE_TYPE_COUNTRY));
            }
            cities_under(zones_where(Condition::any().add(domestic).add(abroad)))
        }
        ZoneLevel::ZoneGroup => ids::<city_group::Entity>(
            city_group::Column::CityId,
            Condition::all().add(city_group::Column::ZoneId.eq(zone_id)),
        ),
    }
}

/// The contact city (else the entity city) is one of `cities`.
fn city_in(entity_only: bool, cities: SelectStatement) -> Condition {
    if entity_only {
        return Condition::all().add(entity::Column::CityId.in_subquery(cities));
    }
    Condition::any()
        .add(contact::Column::CityId.in_subquery(cities.clone()))
        .add(
            Condition::all()
                .add(contact::Column::CityId.is_null())
                .add(entity::Column::CityId.in_subquery(cities)),
        )
}

fn has_city_and_zip() -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(contact::Column::ZipCode.ne(""))
                .add(contact::Column::CityId.is_not_null()),
        )
        .add(
            Condition::all()
                .add(entity::Column::ZipCode.ne(""))
                .add(entity::Column::CityId.is_not_null()),
        )
}

fn has_address() -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(contact::Column::ZipCode.ne(""))
                .add(contact::Column::CityId.is_not_null())
                .add(contact::Column::Address.ne("")),
        )
        .add(
            Condition::all()
                .add(entity::Column::ZipCode.ne(""))
                .add(entity::Column::CityId.is_not_null())
                .add(entity::Column::Address.ne("")),
        )
}

fn accepts_subscription(type_id: Uuid) -> Condition {
    Condition::all().add(contact::Column::Id.in_subquery(ids::<subscription::Entity>(
        subscription::Column::ContactId,
        Condition::all()
            .add(subscription::Column::SubscriptionTypeId.eq(type_id))
            .add(subscription::Column::AcceptSubscription.eq(true)),
    )))
}

/// Directed types match one side, undirected ones either side.
fn by_relationship_type(type_id: Uuid, reverse: bool) -> Condition {
    let undirected = ids::<relationship_type::Entity>(
        relationship_type::Column::Id,
        Condition::all().add(relationship_type::Column::Reverse.eq("")),
    );
    let side = |column: relationship::Column, undirected_only: bool| {
        let mut condition =
            Condition::all().add(relationship::Column::RelationshipTypeId.eq(type_id));
        if undirected_only {
            condition = condition
                .add(relationship::Column::RelationshipTypeId.in_subquery(undirected.clone()));
        }
        contact::Column::Id.in_subquery(ids::<relationship::Entity>(column, condition))
    };
    let (own, other) = if reverse {
        (relationship::Column::Contact2Id, relationship::Column::Contact1Id)
    } else {
        (relationship::Column::Contact1Id, relationship::Column::Contact2Id)
    };
    Condition::any().add(side(own, false)).add(side(other, true))
}

fn by_relationship_dates(span: &DateSpan) -> Condition {
    let side = |column: relationship::Column| {
        contact::Column::Id.in_subquery(ids::<relationship::Entity>(
            column,
            within_extra_day(relationship::Column::Created, span),
        ))
    };
    Condition::any()
        .add(side(relationship::Column::Contact1Id))
        .add(side(relationship::Column::Contact2Id))
}

fn custom_field_equals(name: &str, value: &str) -> Condition {
    let fields = |model: CustomFieldModel| {
        ids::<custom_field::Entity>(
            custom_field::Column::Id,
            Condition::all()
                .add(custom_field::Column::Name.eq(name))
                .add(custom_field::Column::Model.eq(i32::from(model))),
        )
    };
    Condition::any()
        .add(contact::Column::EntityId.in_subquery(ids::<entity_custom_field_value::Entity>(
            entity_custom_field_value::Column::EntityId,
            Condition::all()
                .add(entity_custom_field_value::Column::Value.eq(value))
                .add(
                    entity_custom_field_value::Column::CustomFieldId
                        .in_subquery(fields(CustomFieldModel::Entity)),
                ),
        )))
        .add(contact::Column::Id.in_subquery(ids::<contact_custom_field_value::Entity>(
            contact_custom_field_value::Column::ContactId,
            Condition::all()
                .add(contact_custom_field_value::Column::Value.eq(value))
                .add(
                    contact_custom_field_value::Column::CustomFieldId
                        .in_subquery(fields(CustomFieldModel::Contact)),
                ),
        )))
}

/// Condition for one filter. `None` when it does not restrict the contacts.
pub fn predicate(filter: &SearchFilter, context: &PredicateContext<'_>) -> Option<Condition> {
    let all = Condition::all;
    let any = Condition::any;

    let condition = match filter {
        SearchFilter::EntityName(value) => all().add(icontains(entity_col(entity::Column::Name), value)),
        SearchFilter::EntityDescription(value) => {
            all().add(icontains(entity_col(entity::Column::Description), value))
        }
        SearchFilter::EntityNotes(value) => all().add(icontains(entity_col(entity::Column::Notes), value)),
        SearchFilter::EntityNameStartsWith(value) => {
            all().add(istarts_with(entity_col(entity::Column::Name), value))
        }
        SearchFilter::Address(value) => [
            contact_col(contact::Column::Address),
            contact_col(contact::Column::Address2),
            contact_col(contact::Column::Address3),
        ]
        .into_iter()
        .map(|column| icontains(column, value))
        .chain(
            [entity::Column::Address, entity::Column::Address2, entity::Column::Address3]
                .into_iter()
                .map(|column| icontains(entity_col(column), value)),
        )
        .fold(any(), Condition::add),
        SearchFilter::HasEntity(yes) => all().add(entity::Column::IsSingleContact.eq(!*yes)),
        SearchFilter::EntityType(id) => all().add(entity::Column::EntityTypeId.eq(*id)),
        SearchFilter::RelationshipDate(span) => all().add(
            entity::Column::RelationshipDate.between(span.start.date_naive(), span.end.date_naive()),
        ),

        SearchFilter::City(id) => any().add(contact::Column::CityId.eq(*id)).add(
            all()
                .add(contact::Column::CityId.is_null())
                .add(entity::Column::CityId.eq(*id)),
        ),
        SearchFilter::EntityCity(id) => all().add(entity::Column::CityId.eq(*id)),
        SearchFilter::ZipCode(value) => any()
            .add(
                all()
                    .add(contact::Column::ZipCode.ne(""))
                    .add(istarts_with(contact_col(contact::Column::ZipCode), value)),
            )
            .add(
                all()
                    .add(contact::Column::ZipCode.eq(""))
                    .add(istarts_with(entity_col(entity::Column::ZipCode), value)),
            ),
        SearchFilter::EntityZipCode(value) => {
            all().add(istarts_with(entity_col(entity::Column::ZipCode), value))
        }
        SearchFilter::Zone {
            level,
            entity_only,
            zone_ids,
        } => zone_ids
            .iter()
            .map(|zone_id| {
                city_in(
                    *entity_only,
                    zone_cities(*level, *entity_only, *zone_id, context.default_country),
                )
            })
            .fold(any(), Condition::add),
        SearchFilter::HasCityAndZip(yes) => yes_no(*yes, has_city_and_zip()),
        SearchFilter::HasAddress(yes) => yes_no(*yes, has_address()),

        SearchFilter::ActionInProgress(yes) => {
            yes_no(*yes, action_where(action::Column::Done.eq(false)))
        }
        SearchFilter::HasAction(yes) => yes_no(*yes, with_action(all())),
        SearchFilter::ActionByDoneDate(span) => action_where(within(action::Column::DoneDate, span)),
        SearchFilter::ActionByStartDate(span) => {
            action_where(within(action::Column::PlannedDate, span))
        }
        SearchFilter::ActionByPlannedDate(span) => with_action(
            any()
                .add(
                    all()
                        .add(action::Column::EndDatetime.is_null())
                        .add(within(action::Column::PlannedDate, span)),
                )
                .add(
                    all()
                        .add(action::Column::EndDatetime.is_not_null())
                        .add(action::Column::PlannedDate.lte(span.end))
                        .add(action::Column::EndDatetime.gte(span.start)),
                ),
        ),
        SearchFilter::ActionByUser(id) => action_where(action::Column::InChargeId.eq(*id)),
        SearchFilter::ActionGteAmount(amount) => action_where(action::Column::Amount.gte(*amount)),
        SearchFilter::ActionLtAmount(amount) => action_where(action::Column::Amount.lt(*amount)),
        SearchFilter::ActionStatus(id) => action_where(action::Column::StatusId.eq(*id)),
        SearchFilter::ActionWithoutStatus(id) => {
            action_where(action::Column::StatusId.eq(*id)).not()
        }
        SearchFilter::ActionType(id) => action_where(action::Column::TypeId.eq(*id)),
        SearchFilter::ActionName(value) => {
            action_where(icontains((action::Entity, action::Column::Subject), value))
        }
        SearchFilter::ExcludeActionName(value) => {
            action_where(icontains((action::Entity, action::Column::Subject), value)).not()
        }
        SearchFilter::Opportunity(id) => action_where(action::Column::OpportunityId.eq(*id)),
        SearchFilter::OpportunityName(value) => {
            action_where(action::Column::OpportunityId.in_subquery(ids::<opportunity::Entity>(
                opportunity::Column::Id,
                all().add(icontains((opportunity::Entity, opportunity::Column::Name), value)),
            )))
        }

        SearchFilter::Group(id) => in_group(*id),
        SearchFilter::AllGroups(group_ids) => {
            group_ids.iter().map(|id| in_group(*id)).fold(all(), Condition::add)
        }
        SearchFilter::AnyGroups(group_ids) => {
            group_ids.iter().map(|id| in_group(*id)).fold(any(), Condition::add)
        }
        SearchFilter::NoneGroups(group_ids) => group_ids
            .iter()
            .map(|id| in_group(*id))
            .fold(any(), Condition::add)
            .not(),
        SearchFilter::NotInGroup(id) => in_group(*id).not(),

        SearchFilter::ContactAge { min, max } => {
            let years_ago = |years: u32| {
                context.today - Duration::days((years as f64 * DAYS_PER_YEAR) as i64)
            };
            all().add(contact::Column::BirthDate.between(years_ago(*max), years_ago(*min)))
        }
        SearchFilter::AcceptSubscription(id) => accepts_subscription(*id),
        SearchFilter::RefuseSubscription(id) => accepts_subscription(*id).not(),
        SearchFilter::SecondaryContact(true) | SearchFilter::ContactHasLeft(true) => return None,
        SearchFilter::SecondaryContact(false) => all().add(contact::Column::MainContact.eq(false)),
        SearchFilter::ContactHasLeft(false) => all().add(contact::Column::HasLeft.eq(true)),
        SearchFilter::ContactRole(id) => {
            all().add(contact::Column::Id.in_subquery(ids::<contact_role::Entity>(
                contact_role::Column::ContactId,
                all().add(contact_role::Column::RoleId.eq(*id)),
            )))
        }
        SearchFilter::ContactEntityEmail(value) => any()
            .add(icontains(contact_col(contact::Column::Email), value))
            .add(icontains(entity_col(entity::Column::Email), value)),
        SearchFilter::ContactHasEmail(yes) => yes_no(
            *yes,
            any()
                .add(contact::Column::Email.ne(""))
                .add(entity::Column::Email.ne("")),
        ),
        SearchFilter::ContactHasPersonalEmail(yes) => {
            yes_no(*yes, all().add(contact::Column::Email.ne("")))
        }
        SearchFilter::UnknownContact(yes) => yes_no(
            *yes,
            all()
                .add(contact::Column::Lastname.eq(""))
                .add(contact::Column::Firstname.eq("")),
        ),
        SearchFilter::ContactName(value) => {
            all().add(icontains(contact_col(contact::Column::Lastname), value))
        }
        SearchFilter::ContactFirstname(value) => {
            all().add(icontains(contact_col(contact::Column::Firstname), value))
        }
        SearchFilter::ContactNotes(value) => {
            all().add(icontains(contact_col(contact::Column::Notes), value))
        }
        SearchFilter::ContactLang(value) => {
            all().add(contact::Column::FavoriteLanguage.eq(value.as_str()))
        }

        SearchFilter::HasSameAs(presence) => match presence {
            SameAsPresence::None => all().add(contact::Column::SameAsId.is_null()),
            SameAsPresence::TopPriority => all()
                .add(contact::Column::SameAsId.is_not_null())
                .add(contact::Column::SameAsPriority.eq(1)),
            SameAsPresence::Any => all().add(contact::Column::SameAsId.is_not_null()),
        },

        SearchFilter::ContactImport(id) => all().add(contact::Column::ImportedBy.eq(*id)),
        SearchFilter::ContactsAndEntitiesModifiedBy(id) => any()
            .add(contact::Column::LastModifiedBy.eq(*id))
            .add(entity::Column::LastModifiedBy.eq(*id)),
        SearchFilter::ContactsModifiedBy(id) => all().add(contact::Column::LastModifiedBy.eq(*id)),
        SearchFilter::EntitiesModifiedBy(id) => all().add(entity::Column::LastModifiedBy.eq(*id)),
        SearchFilter::EntityByModifiedDate(span) => all()
            .add(entity::Column::IsSingleContact.eq(false))
            .add(within_extra_day(entity::Column::Modified, span)),
        SearchFilter::ContactByModifiedDate(span) => {
            within_extra_day(contact::Column::Modified, span)
        }
        SearchFilter::ContactsByCreationDate(span) => {
            all().add(within(contact::Column::Created, span))
        }
        SearchFilter::EntitiesByCreationDate(span) => all()
            .add(entity::Column::IsSingleContact.eq(false))
            .add(within(entity::Column::Created, span)),
        SearchFilter::ContactsAndEntitiesByChangeDate(span) => any()
            .add(within(contact::Column::Created, span))
            .add(within(contact::Column::Modified, span))
            .add(within(entity::Column::Created, span))
            .add(within(entity::Column::Modified, span)),

        SearchFilter::ContactsByRelationshipType { type_id, reverse } => {
            by_relationship_type(*type_id, *reverse)
        }
        SearchFilter::ContactsByRelationshipDates(span) => by_relationship_dates(span),
        SearchFilter::ContactWithCustomField(id) => {
            all().add(contact::Column::Id.in_subquery(ids::<contact_custom_field_value::Entity>(
                contact_custom_field_value::Column::ContactId,
                all().add(contact_custom_field_value::Column::CustomFieldId.eq(*id)),
            )))
        }
        SearchFilter::EntityWithCustomField(id) => all().add(contact::Column::EntityId.in_subquery(
            ids::<entity_custom_field_value::Entity>(
                entity_custom_field_value::Column::EntityId,
                all().add(entity_custom_field_value::Column::CustomFieldId.eq(*id)),
            ),
        )),
        SearchFilter::CustomField { name, value } => custom_field_equals(name, value),

        SearchFilter::NoSameAs(_)
        | SearchFilter::NoSameEmail(_)
        | SearchFilter::DuplicatedContacts(_)
        | SearchFilter::EmailInGroup(_)
        | SearchFilter::Sort(_) => return None,
    };
    Some(condition)
}
