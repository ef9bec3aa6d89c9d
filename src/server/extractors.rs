use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::deserializers::deserialize_lenient_page;
use super::errors::ApiError;

/// JSON object body. A missing, malformed or non-object body is a bad request.
pub struct JsonObject(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(Value::Object(map))) => Ok(Self(map)),
            Ok(Json(other)) => Err(ApiError::BadRequest(format!(
                "expected a JSON object, got {other}"
            ))),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}

impl JsonObject {
    /// Fails with a bad request naming the first absent key.
    pub fn require(&self, keys: &[&str]) -> Result<(), ApiError> {
        match keys.iter().find(|key| !self.0.contains_key(**key)) {
            Some(missing) => Err(ApiError::BadRequest(format!("missing key `{missing}`"))),
            None => Ok(()),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Typed path parameters. Routes only match well-formed ids, so a segment
/// that does not parse is reported as a missing resource.
pub struct AppPath<T>(pub T);

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!("Path rejected: {}", rejection.body_text());
                Err(ApiError::NotFound)
            }
        }
    }
}

#[derive(Deserialize, Default)]
struct PageParams {
    #[serde(default, deserialize_with = "deserialize_lenient_page")]
    page: Option<i64>,
}

/// `?page=N`, 1 when absent or not a number.
pub struct PageQuery(pub i64);

impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = Query::<PageParams>::from_request_parts(parts, state)
            .await
            .map(|Query(params)| params)
            .unwrap_or_default();
        Ok(Self(params.page.unwrap_or(1)))
    }
}
