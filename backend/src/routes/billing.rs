//! Billing API routes
//!
//! Every route here is wrapped by [`require_auth`], so handlers only run
//! for requests carrying a valid bearer token.

use crate::auth::{require_auth, AuthUser};
use crate::error::ApiResult;
use crate::services::BillingService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use power_bills_shared::{
    BillInput, BillingListQuery, BillingListResponse, BillingRecord, DeleteResult, EmailQuery,
    InsertResult, NameQuery, PhoneQuery, SuccessResponse, UpdateBillingRequest, UpdateDocument,
};
use tracing::debug;

/// Create billing routes behind the auth gate
pub fn billing_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/add-billing", post(add_billing))
        .route("/billing-list", get(billing_list))
        .route("/update-billing/:id", put(update_billing))
        .route("/delete-billing/:id", delete(delete_billing))
        .route("/search-by-fullname", get(search_by_fullname))
        .route("/search-by-email", get(search_by_email))
        .route("/search-by-phone", get(search_by_phone))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// POST /api/add-billing
async fn add_billing(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<BillInput>,
) -> ApiResult<Json<SuccessResponse<InsertResult>>> {
    debug!(user_id = %auth.user_id, "Adding bill");
    let result = BillingService::add(state.db(), input).await?;
    Ok(Json(SuccessResponse::ok(result)))
}

/// GET /api/billing-list?page=&size=
async fn billing_list(
    State(state): State<AppState>,
    Query(query): Query<BillingListQuery>,
) -> ApiResult<Json<BillingListResponse>> {
    let response = BillingService::list(state.db(), &query).await?;
    Ok(Json(response))
}

/// PUT /api/update-billing/:id
async fn update_billing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateBillingRequest>,
) -> ApiResult<Json<UpdateDocument>> {
    debug!(user_id = %auth.user_id, bill_id = %id, "Updating bill");
    let doc = BillingService::update(state.db(), &id, req.data).await?;
    Ok(Json(doc))
}

/// DELETE /api/delete-billing/:id
async fn delete_billing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResult>> {
    debug!(user_id = %auth.user_id, bill_id = %id, "Deleting bill");
    let result = BillingService::delete(state.db(), &id).await?;
    Ok(Json(result))
}

/// GET /api/search-by-fullname?name=
async fn search_by_fullname(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> ApiResult<Json<Vec<BillingRecord>>> {
    let bills = BillingService::search_by_name(state.db(), query.name.as_deref()).await?;
    Ok(Json(bills))
}

/// GET /api/search-by-email?email=
async fn search_by_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<Vec<BillingRecord>>> {
    let bills = BillingService::search_by_email(state.db(), query.email.as_deref()).await?;
    Ok(Json(bills))
}

/// GET /api/search-by-phone?phone=
async fn search_by_phone(
    State(state): State<AppState>,
    Query(query): Query<PhoneQuery>,
) -> ApiResult<Json<Vec<BillingRecord>>> {
    let bills = BillingService::search_by_phone(state.db(), query.phone.as_deref()).await?;
    Ok(Json(bills))
}
