pub mod accounts;
pub mod admin;
pub mod deposits;
pub mod health;
pub mod trades;
pub mod unlock;
pub mod withdrawals;

use crate::config::Config;
use crate::db::Repository;
use crate::engine::{BatchRunner, OutcomeEngine};
use crate::workflow::UnlockWorkflow;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
    pub engine: Arc<OutcomeEngine>,
    pub workflow: Arc<UnlockWorkflow>,
    pub batch: Arc<BatchRunner>,
}

impl AppState {
    pub fn new(
        repo: Arc<Repository>,
        config: Config,
        engine: Arc<OutcomeEngine>,
        workflow: Arc<UnlockWorkflow>,
        batch: Arc<BatchRunner>,
    ) -> Self {
        Self {
            repo,
            config,
            engine,
            workflow,
            batch,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/v1/accounts", post(accounts::register))
        .route("/v1/accounts/:id", get(accounts::get_summary))
        .route("/v1/deposits/confirm", post(deposits::confirm_deposit))
        .route("/v1/unlock", post(unlock::redeem))
        .route("/v1/trade", post(trades::execute_trade))
        .route("/v1/auto-trade", post(trades::auto_trade))
        .route("/v1/withdrawals", post(withdrawals::request_withdrawal))
        .route("/v1/withdrawals/fee", post(withdrawals::pay_fee))
        .route("/v1/admin/codes", post(admin::issue_code))
        .route("/v1/admin/sweep", post(admin::fleet_sweep))
        .route("/v1/admin/stats", get(admin::stats))
        .route("/v1/admin/notifications", get(admin::notifications))
        .route("/v1/admin/notifications/:id/read", post(admin::mark_read))
        .route(
            "/v1/admin/accounts/:id/deactivate",
            post(admin::deactivate),
        )
        .layer(cors)
        .with_state(state)
}
