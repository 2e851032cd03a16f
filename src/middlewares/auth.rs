use crate::error::AppError;
use crate::utils::JwtService;
use actix_web::http::header::{self, HeaderMap};
use actix_web::http::Method;
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

/// Authenticated user id, stored in request extensions by [`AuthMiddleware`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUserId(pub i64);

// Routes reachable without a bearer token
struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
    // directory reads are public, writes under the same prefix are not
    read_only_prefixes: Vec<&'static str>,
    // still require auth even under a public prefix
    excluded_paths: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            exact_paths: vec!["/swagger-ui", "/swagger-ui/", "/api-docs/openapi.json"],
            prefix_paths: vec!["/swagger-ui/", "/api-docs/", "/api/auth/", "/uploads/"],
            read_only_prefixes: vec![
                "/api/artists",
                "/api/organisers",
                "/api/venue",
                "/api/events",
                "/api/paid-features",
            ],
            excluded_paths: vec!["/api/auth/me"],
        }
    }

    fn is_public(&self, method: &Method, path: &str) -> bool {
        if self
            .excluded_paths
            .iter()
            .any(|&excluded| path.starts_with(excluded))
        {
            return false;
        }

        if self.exact_paths.contains(&path) {
            return true;
        }

        if self
            .prefix_paths
            .iter()
            .any(|&prefix| path.starts_with(prefix))
        {
            return true;
        }

        (method == Method::GET || method == Method::HEAD)
            && self
                .read_only_prefixes
                .iter()
                .any(|&prefix| path.starts_with(prefix))
    }
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    public_paths: PublicPaths,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // CORS preflight
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        if self.public_paths.is_public(req.method(), req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let token = bearer_token(req.headers()).map(str::to_string);

        let Some(token) = token else {
            let error = AppError::AuthError("Missing access token".to_string());
            return Box::pin(async move { Err(error.into()) });
        };

        let user_id = self
            .jwt_service
            .verify_access_token(&token)
            .ok()
            .and_then(|claims| claims.user_id().ok());

        match user_id {
            Some(user_id) => {
                req.extensions_mut().insert(CurrentUserId(user_id));
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            None => {
                let error = AppError::AuthError("Invalid access token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}

impl FromRequest for CurrentUserId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(current_user_id(req).map(CurrentUserId))
    }
}

/// Token of an `Authorization: Bearer ...` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// User id set by the middleware, or an auth error when the route was public.
pub fn current_user_id(req: &HttpRequest) -> Result<i64, AppError> {
    req.extensions()
        .get::<CurrentUserId>()
        .map(|id| id.0)
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_reads_are_public() {
        let paths = PublicPaths::new();
        assert!(paths.is_public(&Method::GET, "/api/artists"));
        assert!(paths.is_public(&Method::GET, "/api/artists/search"));
        assert!(paths.is_public(&Method::GET, "/api/venue/3"));
        assert!(paths.is_public(&Method::GET, "/api/events/4/artists"));
        assert!(paths.is_public(&Method::GET, "/uploads/venues/a.png"));
    }

    #[test]
    fn test_directory_writes_need_auth() {
        let paths = PublicPaths::new();
        assert!(!paths.is_public(&Method::POST, "/api/venue/createVenue"));
        assert!(!paths.is_public(&Method::PUT, "/api/artists/1"));
        assert!(!paths.is_public(&Method::DELETE, "/api/events/1"));
    }

    #[test]
    fn test_personal_routes_need_auth() {
        let paths = PublicPaths::new();
        assert!(!paths.is_public(&Method::GET, "/api/favorites"));
        assert!(!paths.is_public(&Method::GET, "/api/notifications"));
        assert!(!paths.is_public(&Method::GET, "/api/purchased-features"));
    }

    #[test]
    fn test_auth_routes() {
        let paths = PublicPaths::new();
        assert!(paths.is_public(&Method::POST, "/api/auth/login"));
        assert!(paths.is_public(&Method::POST, "/api/auth/register"));
        // carries a refresh token, checked by the handler
        assert!(paths.is_public(&Method::POST, "/api/auth/refresh"));
        assert!(!paths.is_public(&Method::GET, "/api/auth/me"));
    }

    #[test]
    fn test_bearer_token() {
        let req = actix_web::test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def"))
            .to_http_request();
        assert_eq!(bearer_token(req.headers()), Some("abc.def"));

        let req = actix_web::test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic abc"))
            .to_http_request();
        assert_eq!(bearer_token(req.headers()), None);

        let req = actix_web::test::TestRequest::default().to_http_request();
        assert_eq!(bearer_token(req.headers()), None);
    }
}
