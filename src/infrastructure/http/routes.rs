//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping          GET   健康检查
//! - /api/command       POST  聊天网关投递消息，返回回复
//! - /api/cache/stats   GET   音频缓存统计

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/command", post(handlers::command))
        .nest("/cache", cache_routes())
}

/// Cache 路由
fn cache_routes() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(handlers::cache_stats))
}
