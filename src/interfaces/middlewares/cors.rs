use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderValue},
    Error,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::task::{Context, Poll};

/// CORS headers attached to every response. The browser enforces them; the
/// server never rejects a request on origin grounds.
///
/// With no configured origin the caller's `Origin` is echoed back, falling
/// back to `*` when the request carries none.
#[derive(Clone)]
pub struct CorsHeaders {
    allowed_origin: Option<HeaderValue>,
}

impl CorsHeaders {
    pub fn new(allowed_origin: Option<&str>) -> Self {
        CorsHeaders {
            allowed_origin: allowed_origin.and_then(|origin| HeaderValue::from_str(origin).ok()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CorsHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CorsHeadersService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(CorsHeadersService {
            service,
            allowed_origin: self.allowed_origin.clone(),
        })
    }
}

pub struct CorsHeadersService<S> {
    service: S,
    allowed_origin: Option<HeaderValue>,
}

impl<S, B> Service<ServiceRequest> for CorsHeadersService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let allow_origin = self
            .allowed_origin
            .clone()
            .or_else(|| req.headers().get(header::ORIGIN).cloned())
            .unwrap_or_else(|| HeaderValue::from_static("*"));

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            let headers = res.headers_mut();
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("POST, OPTIONS"),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Content-Type"),
            );
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    async fn allow_origin_for(configured: Option<&str>, request_origin: Option<&str>) -> String {
        let app = test::init_service(
            App::new()
                .wrap(CorsHeaders::new(configured))
                .route("/", web::post().to(HttpResponse::Ok)),
        )
        .await;

        let mut req = test::TestRequest::post().uri("/");
        if let Some(origin) = request_origin {
            req = req.insert_header((header::ORIGIN, origin));
        }
        let res = test::call_service(&app, req.to_request()).await;

        res.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[actix_rt::test]
    async fn configured_origin_wins() {
        let origin = allow_origin_for(Some("https://portfolio.example"), Some("https://other.example")).await;
        assert_eq!(origin, "https://portfolio.example");
    }

    #[actix_rt::test]
    async fn request_origin_is_echoed_when_unconfigured() {
        let origin = allow_origin_for(None, Some("https://visitor.example")).await;
        assert_eq!(origin, "https://visitor.example");
    }

    #[actix_rt::test]
    async fn wildcard_without_any_origin() {
        assert_eq!(allow_origin_for(None, None).await, "*");
    }
}
