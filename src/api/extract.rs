use axum::extract::{FromRequest, FromRequestParts};
use serde::{de::DeserializeOwned, de::IntoDeserializer, Deserialize, Deserializer};

use crate::error::ApiError;

/// `Json` whose rejection is reported as a `validation_failed` error.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query filters arrive as `?status=` from the dashboard when nothing is
/// selected; an empty value means "no filter".
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let de: serde::de::value::StrDeserializer<'_, serde::de::value::Error> =
                value.into_deserializer();
            T::deserialize(de)
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}
