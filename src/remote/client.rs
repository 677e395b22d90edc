use crate::config::Config;
use crate::remote::api_types::{ApiCreateUser, ApiUser};
use crate::remote::error::{NetworkFailure, Result};
use crate::remote::types::{User, UserDraft, UserId};
use color_eyre::{eyre::eyre, Result as EyreResult};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use url::Url;

/// Client for the remote users collection.
///
/// Each operation is exactly one HTTP round trip. No retries, no timeout
/// beyond the transport default.
#[derive(Clone)]
pub struct UserClient {
  client: reqwest::Client,
  collection_url: Url,
}

impl UserClient {
  pub fn new(config: &Config) -> EyreResult<Self> {
    Self::with_endpoint(&config.api.base_url, &config.api.collection)
  }

  /// Build a client for `<base_url>/<collection>`
  pub fn with_endpoint(base_url: &str, collection: &str) -> EyreResult<Self> {
    let mut collection_url =
      Url::parse(base_url).map_err(|e| eyre!("Invalid API base URL {}: {}", base_url, e))?;

    collection_url
      .path_segments_mut()
      .map_err(|_| eyre!("API base URL cannot be a base: {}", base_url))?
      .pop_if_empty()
      .extend(collection.split('/').filter(|s| !s.is_empty()));

    let client = reqwest::Client::builder()
      .user_agent(concat!("u9s/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      client,
      collection_url,
    })
  }

  /// The collection endpoint, e.g. `https://host/users`
  pub fn collection_url(&self) -> &Url {
    &self.collection_url
  }

  fn item_url(&self, id: &UserId) -> Url {
    let mut url = self.collection_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
      segments.push(id.as_str());
    }
    url
  }

  /// Fetch the full collection
  pub async fn list_all(&self) -> Result<Vec<User>> {
    let url = self.collection_url.clone();
    let response = self
      .send(Method::GET, &url, self.client.get(url.clone()))
      .await?;
    let users: Vec<ApiUser> = decode(Method::GET, &url, response).await?;

    tracing::debug!(count = users.len(), "listed users");

    users
      .into_iter()
      .map(|u| {
        u.into_user(None).ok_or_else(|| NetworkFailure::Decode {
          method: Method::GET,
          url: url.to_string(),
          message: "user without id".to_string(),
        })
      })
      .collect()
  }

  /// Submit a new record. The server response, including its id, is authoritative.
  pub async fn create(&self, draft: &UserDraft) -> Result<User> {
    let url = self.collection_url.clone();
    let request = self
      .client
      .post(url.clone())
      .json(&ApiCreateUser::from(draft));
    let response = self.send(Method::POST, &url, request).await?;
    let created: ApiUser = decode(Method::POST, &url, response).await?;

    let user = created
      .into_user(None)
      .ok_or_else(|| NetworkFailure::Decode {
        method: Method::POST,
        url: url.to_string(),
        message: "created user has no id".to_string(),
      })?;

    tracing::debug!(id = %user.id, "created user");
    Ok(user)
  }

  /// Submit a full replacement for record `id`
  pub async fn update(&self, id: &UserId, draft: &UserDraft) -> Result<User> {
    let url = self.item_url(id);
    let request = self.client.put(url.clone()).json(&draft.with_id(id.clone()));
    let response = self.send(Method::PUT, &url, request).await?;
    let updated: ApiUser = decode(Method::PUT, &url, response).await?;

    // into_user only fails without a fallback id
    let user = updated
      .into_user(Some(id))
      .ok_or_else(|| NetworkFailure::Decode {
        method: Method::PUT,
        url: url.to_string(),
        message: "updated user has no id".to_string(),
      })?;

    tracing::debug!(id = %user.id, "updated user");
    Ok(user)
  }

  /// Request removal of record `id`. The response body is ignored.
  pub async fn delete(&self, id: &UserId) -> Result<()> {
    let url = self.item_url(id);
    self
      .send(Method::DELETE, &url, self.client.delete(url.clone()))
      .await?;

    tracing::debug!(%id, "deleted user");
    Ok(())
  }

  /// Send a request, mapping transport errors and non-2xx statuses
  async fn send(
    &self,
    method: Method,
    url: &Url,
    request: reqwest::RequestBuilder,
  ) -> Result<Response> {
    let response = request
      .send()
      .await
      .map_err(|source| NetworkFailure::Transport {
        method: method.clone(),
        url: url.to_string(),
        source,
      })?;

    let status = response.status();
    if !status.is_success() {
      return Err(NetworkFailure::Status {
        method,
        url: url.to_string(),
        status,
      });
    }

    Ok(response)
  }
}

async fn decode<T: DeserializeOwned>(method: Method, url: &Url, response: Response) -> Result<T> {
  let body = response
    .bytes()
    .await
    .map_err(|source| NetworkFailure::Transport {
      method: method.clone(),
      url: url.to_string(),
      source,
    })?;

  serde_json::from_slice(&body).map_err(|e| NetworkFailure::Decode {
    method,
    url: url.to_string(),
    message: e.to_string(),
  })
}
