//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers::action_handler::ActionRequest;
use crate::handlers::city_handler::ResolveCityRequest;
use crate::handlers::health_handler::HealthResponse;
use crate::handlers::import_handler::BatchResponse;
use crm_service_lib::service::search::{ContactHit, EntityHit, EntityResults, SearchRequest};
use crm_service_lib::service::ImportPreview;
use domain::{Action, Audit, City, Contact, Entity, PostalAddress};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_handler::health_check,
        crate::handlers::search_handler::search_contacts,
        crate::handlers::search_handler::search_by_entity,
        crate::handlers::search_handler::search_emails,
        crate::handlers::import_handler::template,
        crate::handlers::import_handler::preview,
        crate::handlers::import_handler::confirm,
        crate::handlers::import_handler::unsubscribe,
        crate::handlers::action_handler::create_action,
        crate::handlers::action_handler::update_action,
        crate::handlers::contact_handler::suggested_same_as,
        crate::handlers::contact_handler::delete_contact,
        crate::handlers::contact_handler::save_entity,
        crate::handlers::city_handler::resolve_city,
        crate::handlers::city_handler::city_exists,
    ),
    components(
        schemas(
            HealthResponse,
            SearchRequest,
            ContactHit,
            EntityHit,
            EntityResults,
            ImportPreview,
            BatchResponse,
            ActionRequest,
            Action,
            Contact,
            Entity,
            PostalAddress,
            Audit,
            City,
            ResolveCityRequest,
        )
    ),
    tags(
        (name = "Health", description = "Service status"),
        (name = "Search", description = "Contact search with filter groups"),
        (name = "Imports", description = "Contacts import from delimited files"),
        (name = "Actions", description = "Action bookkeeping"),
        (name = "Contacts", description = "Contacts and entities"),
        (name = "Cities", description = "City resolution"),
    )
)]
pub struct ApiDoc;
