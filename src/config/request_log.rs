use axum::http::{HeaderValue, Method, Request, Response};
use std::{
    task::{Context, Poll},
    time::Instant,
};
use tower::{Layer, Service};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Logs one line per request and tags the response with an `x-request-id`,
/// reusing the caller's id when one was sent.
#[derive(Clone, Default)]
pub struct RequestLogLayer;

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogService { inner }
    }
}

#[derive(Clone)]
pub struct RequestLogService<S> {
    inner: S,
}

fn request_id_for<B>(request: &Request<B>) -> Option<HeaderValue> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .filter(|value| !value.is_empty())
        .cloned()
        .or_else(|| HeaderValue::from_str(&Uuid::new_v4().to_string()).ok())
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestLogService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = RequestLogFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        let request_id = request_id_for(&request);
        if let Some(id) = &request_id {
            request.headers_mut().insert(REQUEST_ID_HEADER, id.clone());
        }

        RequestLogFuture {
            method: request.method().clone(),
            path: request.uri().path().to_owned(),
            request_id,
            started: Instant::now(),
            future: self.inner.call(request),
        }
    }
}

#[pin_project::pin_project]
pub struct RequestLogFuture<F> {
    #[pin]
    future: F,
    method: Method,
    path: String,
    request_id: Option<HeaderValue>,
    started: Instant,
}

impl<F, ResBody, E> std::future::Future for RequestLogFuture<F>
where
    F: std::future::Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = Result<Response<ResBody>, E>;

    fn poll(self: std::pin::Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        match this.future.poll(cx) {
            Poll::Ready(Ok(mut response)) => {
                let request_id = this
                    .request_id
                    .as_ref()
                    .and_then(|id| id.to_str().ok())
                    .unwrap_or("-");

                tracing::info!(
                    method = %this.method,
                    path = %this.path,
                    status = response.status().as_u16(),
                    latency_ms = this.started.elapsed().as_millis() as u64,
                    request_id,
                    "Request completed"
                );

                if let Some(id) = this.request_id.take() {
                    response.headers_mut().insert(REQUEST_ID_HEADER, id);
                }

                Poll::Ready(Ok(response))
            }
            Poll::Ready(Err(e)) => {
                tracing::error!(method = %this.method, path = %this.path, "Request failed");
                Poll::Ready(Err(e))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

pub fn create_request_log_layer() -> RequestLogLayer {
    RequestLogLayer
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use tower::ServiceExt;

    async fn run(request: Request<()>) -> Response<()> {
        let service = RequestLogLayer.layer(tower::service_fn(|request: Request<()>| async move {
            let mut response = Response::new(());
            if let Some(id) = request.headers().get(REQUEST_ID_HEADER) {
                response.headers_mut().insert("x-seen-id", id.clone());
            }
            Ok::<_, Infallible>(response)
        }));
        service.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_generates_request_id() {
        let request = Request::builder().uri("/events").body(()).unwrap();
        let response = run(request).await;

        let id = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(Uuid::parse_str(id.to_str().unwrap()).is_ok());
        assert_eq!(response.headers().get("x-seen-id"), Some(id));
    }

    #[tokio::test]
    async fn test_reuses_incoming_request_id() {
        let request = Request::builder()
            .uri("/events/1")
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(())
            .unwrap();
        let response = run(request).await;

        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "abc-123");
    }
}
