use crate::{
    dtos::account_dto::{BalanceDto, HistoryQuery, LedgerEntryDto},
    services::Services,
};
use axum::{
    extract::{Path, Query},
    routing::get,
    Extension, Json, Router,
};
use utils::AppResult;

/// 查询账户余额
pub async fn get_balance(
    Extension(services): Extension<Services>,
    Path(telegram_id): Path<i64>,
) -> AppResult<Json<BalanceDto>> {
    let balance = services.ledger.balance_of(telegram_id).await?;

    Ok(Json(BalanceDto { telegram_id, balance }))
}

/// 查询账本历史(倒序)
pub async fn get_history(
    Extension(services): Extension<Services>,
    Path(telegram_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<LedgerEntryDto>>> {
    let entries = services.ledger.history(telegram_id, query.limit.unwrap_or(10)).await?;

    Ok(Json(entries.into_iter().map(LedgerEntryDto::from).collect()))
}

pub struct AccountController;
impl AccountController {
    pub fn app() -> Router {
        Router::new()
            .route("/:telegram_id/balance", get(get_balance))
            .route("/:telegram_id/history", get(get_history))
    }
}
