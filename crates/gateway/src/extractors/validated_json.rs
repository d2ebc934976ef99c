//! JSON body extractor that runs `validator` rules before the handler.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use common::AppError;

/// Deserialized and validated request body.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| AppError::validation(describe(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// Every field message, ordered by field name and joined with `; `.
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    let messages: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();

    if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.join("; ")
    }
}
