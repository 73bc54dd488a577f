// Server module entry point
// Binds the listener and runs the accept loop

mod connection;
mod listener;
pub mod signal;

// `loop` is a keyword, so the accept loop is mounted as server_loop
#[path = "loop.rs"]
mod server_loop;

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{Config, ServerState};
use crate::error::ServerError;

pub use listener::create_listener;
pub use signal::shutdown_signal;

/// A bound, not yet running, file server
///
/// Each instance owns its listener and state, so tests can run several side
/// by side on ephemeral ports.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    state: Arc<ServerState>,
}

impl Server {
    /// Validate the document root and bind the listener
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(config: &Config) -> Result<Self, ServerError> {
        let root = canonical_root(Path::new(&config.server.root))?;
        let addr = config.get_socket_addr()?;
        let listener =
            create_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Self {
            listener,
            state: Arc::new(ServerState::new(config, root)),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Canonical document root being served
    pub fn root(&self) -> &Path {
        &self.state.root
    }

    /// Serve until the process is terminated
    pub async fn run(self) {
        self.run_until(std::future::pending()).await;
    }

    /// Serve until `shutdown` resolves
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        server_loop::start_server_loop(self.listener, self.state, shutdown).await;
    }
}

fn canonical_root(path: &Path) -> Result<std::path::PathBuf, ServerError> {
    let root_error = |source| ServerError::Root {
        path: path.to_path_buf(),
        source,
    };
    let root = path.canonicalize().map_err(root_error)?;
    if root.is_dir() {
        Ok(root)
    } else {
        Err(root_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a directory",
        )))
    }
}
