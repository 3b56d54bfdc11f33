//! `fetch` transport for the auth client.
//!
//! ERROR HANDLING
//! ==============
//! Each request races a `gloo-timers` sleep. When the timer wins, the
//! request's `AbortController` is fired and the call fails with
//! [`TransportError::Timeout`]. Reading the response body counts against the
//! same deadline.

use std::time::Duration;

use session::{HttpRequest, HttpResponse, HttpTransport, TransportError};

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

#[async_trait::async_trait(?Send)]
impl HttpTransport for BrowserTransport {
    async fn send(&self, request: HttpRequest, timeout: Duration) -> Result<HttpResponse, TransportError> {
        #[cfg(feature = "hydrate")]
        {
            send_with_fetch(request, timeout).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (request, timeout);
            Err(TransportError::Unavailable("not available on server".to_owned()))
        }
    }
}

#[cfg(feature = "hydrate")]
async fn send_with_fetch(request: HttpRequest, timeout: Duration) -> Result<HttpResponse, TransportError> {
    use futures::future::{Either, select};
    use gloo_net::http::Request;
    use session::Method;

    let controller =
        web_sys::AbortController::new().map_err(|e| TransportError::Network(format!("abort controller: {e:?}")))?;

    let mut builder = match request.method {
        Method::Get => Request::get(&request.url),
        Method::Post => Request::post(&request.url),
    };
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    let signal = controller.signal();
    builder = builder.abort_signal(Some(&signal));

    let prepared = match request.body {
        Some(body) => builder.body(body),
        None => builder.build(),
    }
    .map_err(|e| TransportError::Network(e.to_string()))?;

    let exchange = async move {
        let response = prepared
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok::<_, TransportError>(HttpResponse { status, body })
    };

    let exchange = std::pin::pin!(exchange);
    let deadline = std::pin::pin!(gloo_timers::future::sleep(timeout));
    match select(exchange, deadline).await {
        Either::Left((outcome, _)) => outcome,
        Either::Right(((), _)) => {
            controller.abort();
            Err(TransportError::Timeout(timeout))
        }
    }
}
