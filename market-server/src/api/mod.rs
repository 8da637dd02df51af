//! HTTP API
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`checkout`] - the checkout operation
//! - [`orders`] - order reads and status transitions
//! - [`cart`] - customer cart lines
//! - [`wallets`] - vendor wallet reads
//! - [`points`] - loyalty point reads and spending
//! - [`catalog`] - thin create/list endpoints for users, vendors,
//!   products, coupons and offers
//! - [`notifications`] - per-user notification reads

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod health;
pub mod notifications;
pub mod orders;
pub mod points;
pub mod wallets;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(checkout::router())
        .merge(orders::router())
        .merge(cart::router())
        .merge(wallets::router())
        .merge(points::router())
        .merge(catalog::router())
        .merge(notifications::router())
}

/// Build the fully configured application with middleware
pub fn build_app() -> Router<ServerState> {
    build_router().layer(
        ServiceBuilder::new()
            // Request ID - generate and propagate a unique id per request
            .layer(SetRequestIdLayer::new(
                HeaderName::from_static("x-request-id"),
                XRequestId,
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            // Request tracing (logs at INFO level)
            .layer(TraceLayer::new_for_http())
            // CORS - handle cross-origin requests
            .layer(CorsLayer::permissive()),
    )
}
