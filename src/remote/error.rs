use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Failure of a single remote round trip.
///
/// Every variant is a network failure from the caller's point of view: the
/// request did not produce a usable record, so local state must not change.
#[derive(Error, Debug)]
pub enum NetworkFailure {
  #[error("{method} {url} failed: {source}")]
  Transport {
    method: Method,
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{method} {url} returned {status}")]
  Status {
    method: Method,
    url: String,
    status: StatusCode,
  },

  #[error("{method} {url} returned an unusable body: {message}")]
  Decode {
    method: Method,
    url: String,
    message: String,
  },
}

pub type Result<T> = std::result::Result<T, NetworkFailure>;
