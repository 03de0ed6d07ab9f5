use tokio::signal;
use tracing::{error, warn};

/// 等待 Ctrl+C；监听失败时同样返回，交由调用方结束服务
pub async fn listen_for_shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => warn!("Shutdown signal received, initiating graceful shutdown..."),
        Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
    }
}
