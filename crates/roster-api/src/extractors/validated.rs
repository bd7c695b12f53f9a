//! Validated JSON extractor

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::response::ApiError;

/// JSON body checked with the `validator` crate before the handler runs
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| ApiError::InvalidBody(e.body_text()))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request as HttpRequest};
    use roster_service::dto::UpdateAutoRolesRequest;

    fn request(body: &str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_accepts_valid_body() {
        let ValidatedJson(body) =
            ValidatedJson::<UpdateAutoRolesRequest>::from_request(request(r#"{"role_ids":["123"]}"#), &())
                .await
                .unwrap();
        assert_eq!(body.role_ids, vec!["123".to_string()]);
    }

    #[tokio::test]
    async fn test_rejects_non_numeric_ids() {
        let err =
            ValidatedJson::<UpdateAutoRolesRequest>::from_request(request(r#"{"role_ids":["abc"]}"#), &())
                .await
                .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_rejects_malformed_json() {
        let err = ValidatedJson::<UpdateAutoRolesRequest>::from_request(request("{"), &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidBody(_)));
    }
}
