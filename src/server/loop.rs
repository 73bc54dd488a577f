// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::ServerState;

/// Accept loop
///
/// Accept errors (e.g. descriptor exhaustion) are logged and the loop keeps
/// going; only `shutdown` ends it. Connections already accepted keep running
/// on their own tasks.
pub async fn start_server_loop<F>(listener: TcpListener, state: Arc<ServerState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => log::error!("Failed to accept connection: {e}"),
                }
            }

            () = &mut shutdown => {
                log::info!("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }
}
