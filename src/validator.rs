use std::collections::BTreeMap;

use anyhow::anyhow;
use axum::{
    Form,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use barberpro_core::AppError;

/// First validation message per field, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .iter()
            .filter_map(|(field, errors)| {
                errors.first().map(|error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field));
                    (field.to_string(), message)
                })
            })
            .collect();
        FieldErrors(fields)
    }
}

/// URL-encoded form plus the result of validating it.
///
/// Unlike a rejecting extractor, validation failures are handed to the handler
/// so it can re-render the form with the messages next to each field. Only an
/// undecodable body is rejected.
#[derive(Debug, Clone)]
pub struct ValidatedForm<T> {
    pub value: T,
    pub errors: FieldErrors,
}

impl<T, S> FromRequest<S> for ValidatedForm<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(anyhow!("{}", rejection.body_text())))?;

        let errors = match value.validate() {
            Ok(()) => FieldErrors::default(),
            Err(errors) => FieldErrors::from(&errors),
        };

        Ok(Self { value, errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{self, StatusCode, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(email(message = "bad email"))]
        email: String,
        #[validate(length(min = 3))]
        name: String,
    }

    fn form_request(body: &'static str) -> Request {
        http::Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_form_has_no_errors() {
        let form = ValidatedForm::<Signup>::from_request(form_request("email=a%40b.co&name=Ana"), &())
            .await
            .unwrap();
        assert!(form.errors.is_empty());
        assert_eq!(form.value.email, "a@b.co");
    }

    #[tokio::test]
    async fn test_invalid_fields_are_collected() {
        let form = ValidatedForm::<Signup>::from_request(form_request("email=nope&name=A"), &())
            .await
            .unwrap();
        assert_eq!(form.errors.get("email"), Some("bad email"));
        assert_eq!(form.errors.get("name"), Some("name is invalid"));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_rejected() {
        let err = ValidatedForm::<Signup>::from_request(form_request("email=a%40b.co"), &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
