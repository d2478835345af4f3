//! Thin JSON client over the ticketing REST backend.

use std::borrow::Cow;
use std::sync::{Arc, RwLock};

use log::{debug, warn};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};

/// List endpoints answer with either a bare array or `{ "data": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Bare(Vec<T>),
    Envelope { data: Vec<T> },
}

impl<T> ListBody<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Bare(items) | ListBody::Envelope { data: items } => items,
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = token;
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_response(status, &body);
        if err.is_unauthorized() {
            warn!("Backend rejected the session token, signing out");
            self.set_token(None);
        }
        Err(err)
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.json(self.request(Method::GET, path)).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.json(self.request(Method::GET, path).query(query)).await
    }

    pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let body: ListBody<T> = self.get(path).await?;
        Ok(body.into_vec())
    }

    pub async fn get_list_query<T, Q>(&self, path: &str, query: &Q) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let body: ListBody<T> = self.get_query(path, query).await?;
        Ok(body.into_vec())
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.json(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.json(self.request(Method::PUT, path).json(body)).await
    }

    /// PUT whose response body is ignored.
    pub async fn put_empty<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::PUT, path).json(body)).await?;
        Ok(())
    }

    /// POST whose response body is ignored.
    pub async fn post_empty<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::POST, path).json(body)).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

/// Percent-encodes a record id for use as one path segment.
pub(crate) fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}

/// Runs each wire record through its convert function.
pub(crate) fn convert_all<D, T>(items: Vec<D>) -> Result<Vec<T>>
where
    T: TryFrom<D, Error = ApiError>,
{
    items.into_iter().map(T::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> ApiClient {
        ApiClient::new(&ClientConfig::default().with_api_url(url)).unwrap()
    }

    #[test]
    fn test_url_joining() {
        let api = client("http://localhost:8080/api/");
        assert_eq!(api.base_url(), "http://localhost:8080/api");
        assert_eq!(api.url("/routes/3"), "http://localhost:8080/api/routes/3");
        assert_eq!(api.url("BusBooking"), "http://localhost:8080/api/BusBooking");
    }

    #[test]
    fn test_token_is_shared_between_clones() {
        let api = client("http://localhost:8080");
        let service_copy = api.clone();
        api.set_token(Some("abc".to_string()));
        assert_eq!(service_copy.token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_ids_are_encoded_as_one_segment() {
        assert_eq!(segment("65f0ab"), "65f0ab");
        assert_eq!(segment("50%off#1"), "50%25off%231");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_list_body_shapes() {
        let bare: ListBody<u32> = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(bare.into_vec(), vec![1, 2]);
        let wrapped: ListBody<u32> = serde_json::from_str(r#"{"data": [3]}"#).unwrap();
        assert_eq!(wrapped.into_vec(), vec![3]);
    }
}
