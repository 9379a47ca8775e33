//! HTTP Server
//!
//! 聊天网关 webhook 入口：路由 + 中间件栈 + 优雅关闭

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::{middleware, Router};
use http::{header::CONTENT_TYPE, Method};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::middleware::{request_context_middleware, REQUEST_ID_HEADER};
use super::routes::create_routes;
use super::state::AppState;

/// 聊天消息很短，请求体上限 64KB
const MAX_BODY_BYTES: usize = 64 * 1024;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", 8080)
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 路由 + 中间件；网关只会发 GET/POST JSON
    pub(crate) fn build_router(state: Arc<AppState>) -> Router {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE, REQUEST_ID_HEADER])
            .expose_headers([REQUEST_ID_HEADER])
            .max_age(Duration::from_secs(3600));

        create_routes()
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(middleware::from_fn(request_context_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(state)
    }

    /// 启动服务器，`shutdown_signal` 完成后停止接收新请求并等待处理中的命令结束
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = Self::build_router(self.state.clone());
        let listener = TcpListener::bind(self.config.addr()).await?;

        tracing::info!(
            addr = %listener.local_addr()?,
            chapters = self.state.chapter_count,
            "Chat gateway listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_addr() {
        assert_eq!(ServerConfig::default().addr(), "0.0.0.0:8080");
        assert_eq!(ServerConfig::new("127.0.0.1", 3000).addr(), "127.0.0.1:3000");
    }
}
