//! Catalog API handlers
//!
//! Thin create/list endpoints for the entities the fulfillment engine
//! consumes. Full catalog management (media, categories, search) lives
//! outside this system; these endpoints exist to stand the marketplace
//! up and to exercise the engine end-to-end.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use shared::models::{
    Coupon, Offer, OfferScope, Product, Role, SizeStock, User, Vendor,
};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/users", post(create_user))
        .route("/api/vendors", post(create_vendor).get(list_vendors))
        .route("/api/products", post(create_product).get(list_products))
        .route("/api/coupons", post(create_coupon))
        .route("/api/vendors/{vendor_id}/coupons", get(list_coupons))
        .route("/api/offers", post(create_offer))
        .route("/api/vendors/{vendor_id}/offers", get(list_offers))
}

// ========== Users ==========

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub role: Role,
}

async fn create_user(
    State(state): State<ServerState>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<Json<User>> {
    let user = state
        .store
        .create_user(User {
            id: 0,
            name: payload.name,
            role: payload.role,
            created_at: 0,
        })
        .map_err(AppError::from)?;
    Ok(Json(user))
}

// ========== Vendors ==========

#[derive(Debug, Deserialize)]
pub struct CreateVendorRequest {
    pub user_id: u64,
    pub store_name_ar: String,
    pub store_name_en: String,
    #[serde(default)]
    pub shipping_cost: f64,
    #[serde(default)]
    pub commission_rate: f64,
}

async fn create_vendor(
    State(state): State<ServerState>,
    Json(payload): Json<CreateVendorRequest>,
) -> AppResult<Json<Vendor>> {
    let vendor = state
        .store
        .create_vendor(Vendor {
            id: 0,
            user_id: payload.user_id,
            store_name_ar: payload.store_name_ar,
            store_name_en: payload.store_name_en,
            shipping_cost: payload.shipping_cost,
            commission_rate: payload.commission_rate,
            is_active: true,
        })
        .map_err(AppError::from)?;
    Ok(Json(vendor))
}

async fn list_vendors(State(state): State<ServerState>) -> AppResult<Json<Vec<Vendor>>> {
    Ok(Json(state.store.list_vendors().map_err(AppError::from)?))
}

// ========== Products ==========

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub vendor_id: u64,
    pub name_ar: String,
    pub name_en: String,
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub sizes: Vec<SizeStock>,
}

async fn create_product(
    State(state): State<ServerState>,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<Product>> {
    if payload.price < 0.0 || !payload.price.is_finite() {
        return Err(AppError::validation("price must be a non-negative number"));
    }
    let product = state
        .store
        .create_product(Product {
            id: 0,
            vendor_id: payload.vendor_id,
            name_ar: payload.name_ar,
            name_en: payload.name_en,
            price: payload.price,
            stock: payload.stock,
            sizes: payload.sizes,
            is_active: true,
        })
        .map_err(AppError::from)?;
    Ok(Json(product))
}

async fn list_products(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.store.list_products().map_err(AppError::from)?))
}

// ========== Coupons ==========

#[derive(Debug, Deserialize)]
pub struct CreateCouponRequest {
    pub vendor_id: u64,
    pub code: String,
    pub discount_percent: f64,
    pub max_uses: Option<u32>,
}

async fn create_coupon(
    State(state): State<ServerState>,
    Json(payload): Json<CreateCouponRequest>,
) -> AppResult<Json<Coupon>> {
    if !(0.0..=100.0).contains(&payload.discount_percent) {
        return Err(AppError::validation(
            "discount_percent must be between 0 and 100",
        ));
    }
    let coupon = state
        .store
        .create_coupon(Coupon {
            id: 0,
            vendor_id: payload.vendor_id,
            code: payload.code,
            discount_percent: payload.discount_percent,
            max_uses: payload.max_uses,
            used_count: 0,
            is_active: true,
        })
        .map_err(AppError::from)?;
    Ok(Json(coupon))
}

async fn list_coupons(
    State(state): State<ServerState>,
    Path(vendor_id): Path<u64>,
) -> AppResult<Json<Vec<Coupon>>> {
    Ok(Json(
        state
            .store
            .list_coupons_for_vendor(vendor_id)
            .map_err(AppError::from)?,
    ))
}

// ========== Offers ==========

#[derive(Debug, Deserialize)]
pub struct CreateOfferRequest {
    pub vendor_id: u64,
    pub name_ar: String,
    pub name_en: String,
    pub discount_percent: f64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub usage_limit: Option<u32>,
    #[serde(default = "default_min_quantity")]
    pub min_quantity: u32,
    pub scope: OfferScope,
}

fn default_min_quantity() -> u32 {
    1
}

async fn create_offer(
    State(state): State<ServerState>,
    Json(payload): Json<CreateOfferRequest>,
) -> AppResult<Json<Offer>> {
    if !(0.0..=100.0).contains(&payload.discount_percent) {
        return Err(AppError::validation(
            "discount_percent must be between 0 and 100",
        ));
    }
    if payload.ends_at < payload.starts_at {
        return Err(AppError::validation("ends_at must not precede starts_at"));
    }
    let offer = state
        .store
        .create_offer(Offer {
            id: 0,
            vendor_id: payload.vendor_id,
            name_ar: payload.name_ar,
            name_en: payload.name_en,
            discount_percent: payload.discount_percent,
            starts_at: payload.starts_at,
            ends_at: payload.ends_at,
            usage_limit: payload.usage_limit,
            min_quantity: payload.min_quantity,
            used_count: 0,
            scope: payload.scope,
            is_active: true,
        })
        .map_err(AppError::from)?;
    Ok(Json(offer))
}

async fn list_offers(
    State(state): State<ServerState>,
    Path(vendor_id): Path<u64>,
) -> AppResult<Json<Vec<Offer>>> {
    Ok(Json(
        state
            .store
            .list_offers_for_vendor(vendor_id)
            .map_err(AppError::from)?,
    ))
}
