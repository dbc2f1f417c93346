use super::extract::AppPath;
use crate::catalog::{self, PricingPlan, ServiceOffering};
use crate::error::{AppError, AppResult};
use crate::AppState;
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse {
    #[serde(flatten)]
    plan: PricingPlan,
    per_visit_price: Decimal,
}

pub(super) fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/services", get(list_services))
        .route("/services/{slug}", get(get_service))
        .route("/pricing", get(list_pricing))
}

async fn list_services() -> Json<Vec<ServiceOffering>> {
    Json(catalog::services())
}

async fn get_service(AppPath(slug): AppPath<String>) -> AppResult<Json<ServiceOffering>> {
    catalog::find_service(&slug)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Service not found".into()))
}

async fn list_pricing() -> Json<Vec<PlanResponse>> {
    let plans = catalog::pricing_plans()
        .into_iter()
        .map(|plan| PlanResponse {
            per_visit_price: plan.per_visit_price(),
            plan,
        })
        .collect();
    Json(plans)
}
