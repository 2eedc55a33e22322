use std::{cell::Cell, rc::Rc};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
  error::RequestError,
  prelude::*,
  transport::{CancellationToken, Request, Response, Transport},
};

/// Issues `req` through `transport` once per subscription.
///
/// A 2xx response is emitted and the stream completes. A transport failure,
/// or any other status as [`RequestError::Status`], is delivered as an error.
/// Unsubscribing while the request is in flight cancels its token, and a
/// late result is discarded.
pub fn request<T, S>(transport: Rc<T>, req: Request, scheduler: S) -> Observable<Response, RequestError>
where
  T: Transport + ?Sized + 'static,
  S: Scheduler,
{
  Observable::new(move |subscriber| {
    let token = CancellationToken::new();
    let settled = Rc::new(Cell::new(false));
    debug!(method = %req.method, url = %req.url, "issuing request");
    let pending = transport.issue(&req, token.clone());

    let (cancelled, done, url) = (token.clone(), settled.clone(), req.url.clone());
    let handle = scheduler.spawn(Box::pin(async move {
      let result = pending.await;
      if cancelled.is_cancelled() {
        debug!(%url, "discarding result of cancelled request");
        return;
      }
      done.set(true);
      match result {
        Ok(response) if response.is_success() => {
          debug!(%url, status = response.status, "request settled");
          subscriber.next(response);
          subscriber.complete();
        }
        Ok(response) => {
          debug!(%url, status = response.status, "request failed");
          subscriber.error(RequestError::Status(response.status));
        }
        Err(err) => {
          debug!(%url, %err, "request failed");
          subscriber.error(err);
        }
      }
    }));

    let url = req.url.clone();
    Teardown::new(move || {
      if !settled.get() {
        debug!(%url, "cancelling request");
        token.cancel();
      }
      handle.cancel();
    })
  })
}

/// [`request`], with the response body decoded as JSON into `Item`.
pub fn request_json<Item, T, S>(
  transport: Rc<T>, req: Request, scheduler: S,
) -> Observable<Item, RequestError>
where
  Item: DeserializeOwned + 'static,
  T: Transport + ?Sized + 'static,
  S: Scheduler,
{
  let responses = request(transport, req, scheduler);
  Observable::new(move |subscriber| {
    let decoded = subscriber.clone();
    Teardown::from(responses.subscribe(subscriber.forward_with(move |response: Response| {
      match response.json() {
        Ok(item) => decoded.next(item),
        Err(err) => decoded.error(err),
      }
    })))
  })
}
