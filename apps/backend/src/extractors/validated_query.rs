use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;
use url::form_urlencoded;

use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Query-string extractor that reports parse failures as `ERR_VALIDATION`.
///
/// Unlike `web::Query`, a key that appears more than once is collected into
/// a list, so repeatable parameters (`fields=dcount&fields=ccount`) can be
/// deserialized with `serde_with::OneOrMany`. Every value arrives as a
/// string; numeric fields use `serde_with::DisplayFromStr`.
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<T> ValidatedQuery<T> {
    /// Extract the inner value from the ValidatedQuery wrapper
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedQuery<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> FromRequest for ValidatedQuery<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let query = req.query_string();
        let parsed = serde_json::from_value::<T>(query_to_value(query)).map_err(|e| {
            debug!(
                trace_id = %trace_ctx::trace_id(),
                path = %req.path(),
                query = %Redacted(query),
                error = %e,
                "query parsing failed"
            );
            AppError::invalid(format!("Invalid query parameters: {e}"))
        });

        ready(parsed.map(ValidatedQuery))
    }
}

/// Decode a query string into a JSON object of strings and string lists.
fn query_to_value(query: &str) -> Value {
    let mut map = Map::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value = Value::String(value.into_owned());
        match map.get_mut(key.as_ref()) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key.into_owned(), value);
            }
        }
    }
    Value::Object(map)
}
