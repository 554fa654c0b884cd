use reqwest::{Client, RequestBuilder as ReqwestRequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::errors::RemoteError;

/// Hands out requests against the DigitalOcean v2 API with the bearer token attached.
#[derive(Clone, Debug)]
pub struct RequestBuilderDo {
    http_client: Client,
    /// These fields won't change after init, don't need to Arc them
    base_url: String,
    access_token: SecretString,
}

impl RequestBuilderDo {
    pub fn new(http_client: Client, base_url: String, access_token: SecretString) -> Self {
        RequestBuilderDo {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }
    pub fn get(&self, path: String) -> ReqwestRequestBuilder {
        self.http_client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(self.access_token.expose_secret())
    }
    pub fn delete(&self, path: String) -> ReqwestRequestBuilder {
        self.http_client
            .delete(format!("{}{path}", self.base_url))
            .bearer_auth(self.access_token.expose_secret())
    }
}

/// Turn a non-2xx response into a classified [`RemoteError`], reading the API's error body.
pub async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    Err(RemoteError::from_status(status, &body))
}

pub async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    let bytes = response.bytes().await?;
    let value: T =
        serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_slice(&bytes))?;
    Ok(value)
}

pub fn find_err(err: &(dyn std::error::Error + 'static), pattern: &str) -> bool {
    let mut err = Some(err);
    while let Some(e) = err {
        if e.to_string().contains(pattern) {
            return true;
        }
        err = e.source();
    }
    false
}

/// Dropped keep-alive connections are the only failure worth retrying on a read.
pub fn is_connection_closed(err: &reqwest::Error) -> bool {
    find_err(err, "connection closed before message completed")
}
