//! The cancellable-request collaborator.
//!
//! [`request`](crate::observable::request) issues a [`Request`] through a
//! [`Transport`] and turns the eventual [`Response`] into a one-shot stream.
//! The transport is handed a [`CancellationToken`]; once the subscription
//! ends the token is cancelled and the transport's result is ignored.

use std::{cell::Cell, rc::Rc};

use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;

use crate::error::RequestError;

/// What to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
  pub method: String,
  pub url: String,
  pub body: Option<String>,
}

impl Request {
  pub fn get(url: impl Into<String>) -> Self {
    Self { method: "GET".to_string(), url: url.into(), body: None }
  }

  pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
    Self { method: "POST".to_string(), url: url.into(), body: Some(body.into()) }
  }
}

/// What came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
  pub status: u16,
  pub body: Vec<u8>,
}

impl Response {
  /// `true` for 2xx statuses.
  pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }

  /// Decodes the body as JSON.
  pub fn json<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
    Ok(serde_json::from_slice(&self.body)?)
  }
}

/// Shared flag telling an in-flight request to give up.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
  pub fn new() -> Self { Self::default() }

  pub fn cancel(&self) { self.0.set(true) }

  pub fn is_cancelled(&self) -> bool { self.0.get() }
}

/// Issues requests.
///
/// Implementations should stop work once `token` is cancelled; whatever they
/// resolve with afterwards is discarded.
pub trait Transport {
  fn issue(
    &self, request: &Request, token: CancellationToken,
  ) -> LocalBoxFuture<'static, Result<Response, RequestError>>;
}
