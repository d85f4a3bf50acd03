//! JSON body extraction with declarative field checks.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::error::AppError;

/// Largest JSON body accepted.
const JSON_LIMIT: usize = 256 * 1024;

/// A JSON body that deserialized and passed its `#[validate]` rules.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let json = web::Json::<T>::from_request(req, payload);

        Box::pin(async move {
            let value = json.await?.into_inner();
            value.validate().map_err(AppError::from)?;
            Ok(ValidatedJson(value))
        })
    }
}

/// JSON extractor settings: malformed bodies become 400 problem responses.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}
