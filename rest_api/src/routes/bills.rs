// rest_api/src/routes/bills.rs

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lib::services::{parse_status_filter, BillFilter, Page};
use models::medical::{Bill, NewBill, PaymentRequest};

use super::{created, ApiJson, ApiPath, ApiQuery, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct BillQuery {
    /// Payment status name, or `all`.
    pub status: Option<String>,
    pub patient_id: Option<Uuid>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// A bill as returned to clients, with its outstanding balance spelled out.
#[derive(Debug, Serialize)]
pub struct BillView {
    #[serde(flatten)]
    pub bill: Bill,
    pub balance_due: Decimal,
}

impl From<Bill> for BillView {
    fn from(bill: Bill) -> Self {
        let balance_due = bill.balance_due();
        BillView { bill, balance_due }
    }
}

pub async fn list_bills(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<BillQuery>,
) -> ApiResult<Json<Vec<BillView>>> {
    let filter = BillFilter {
        status: parse_status_filter(query.status.as_deref())?,
        patient_id: query.patient_id,
    };
    let bills = state
        .services
        .billing
        .list(&filter, Page::new(query.limit, query.offset))?;
    Ok(Json(bills.into_iter().map(BillView::from).collect()))
}

pub async fn create_bill(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewBill>,
) -> ApiResult<(StatusCode, Json<BillView>)> {
    let bill = state.services.billing.create_bill(new)?;
    Ok(created(bill.into()))
}

pub async fn get_bill(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<BillView>> {
    Ok(Json(state.services.billing.get(id)?.into()))
}

pub async fn record_payment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payment): ApiJson<PaymentRequest>,
) -> ApiResult<Json<BillView>> {
    Ok(Json(state.services.billing.record_payment(id, payment)?.into()))
}

pub async fn cancel_bill(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<BillView>> {
    Ok(Json(state.services.billing.cancel_bill(id)?.into()))
}

pub async fn delete_bill(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.billing.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
