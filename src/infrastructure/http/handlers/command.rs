//! Command Handler - 聊天网关 webhook

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{CommandEvent, CommandReply, VoiceChannelRef};
use crate::infrastructure::http::dto::{ApiResponse, CommandRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 处理一条聊天消息；命令失败体现在回复里而不是 HTTP 错误
pub async fn command(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CommandRequest>,
) -> Result<Json<ApiResponse<CommandReply>>, ApiError> {
    if req.content.len() > 4096 {
        return Err(ApiError::BadRequest("content too long".to_string()));
    }

    let event = CommandEvent {
        content: req.content,
        author: req.author,
        voice_channel: req
            .voice_channel
            .filter(|c| !c.trim().is_empty())
            .map(VoiceChannelRef::new),
    };

    let reply = state.dispatcher.dispatch(event).await;
    Ok(Json(ApiResponse::success(reply)))
}
