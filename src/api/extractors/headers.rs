//! Extractors for storefront request headers.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::config::{CART_SESSION_HEADER, IDEMPOTENCY_KEY_HEADER};
use crate::domain::CartKey;
use crate::errors::AppError;

/// Cart addressed by the `X-Cart-Session` header; the shared cart when
/// the header is absent.
#[derive(Debug, Clone)]
pub struct CartSession(pub CartKey);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CartSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match header_value(parts, CART_SESSION_HEADER)? {
            Some(raw) => Ok(Self(CartKey::parse(raw)?)),
            None => Ok(Self(CartKey::default())),
        }
    }
}

/// Optional `Idempotency-Key` header, passed through untrimmed; the
/// checkout service validates it.
#[derive(Debug, Clone, Default)]
pub struct IdempotencyKey(pub Option<String>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for IdempotencyKey {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(header_value(parts, IDEMPOTENCY_KEY_HEADER)?.map(str::to_string)))
    }
}

fn header_value<'p>(parts: &'p Parts, name: &str) -> Result<Option<&'p str>, AppError> {
    parts
        .headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| AppError::validation(format!("{} header must be ASCII", name)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn cart_session(header: Option<&str>) -> Result<CartSession, AppError> {
        let mut builder = Request::builder().uri("/api/cart");
        if let Some(value) = header {
            builder = builder.header("X-Cart-Session", value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        CartSession::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_missing_header_uses_shared_cart() {
        let CartSession(key) = cart_session(None).await.unwrap();
        assert_eq!(key, CartKey::default());
    }

    #[tokio::test]
    async fn test_header_selects_cart() {
        let CartSession(key) = cart_session(Some("tab-7")).await.unwrap();
        assert_eq!(key.as_str(), "tab-7");
    }

    #[tokio::test]
    async fn test_malformed_header_rejected() {
        let result = cart_session(Some("no spaces allowed")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
