//! Database connection owned by the application. Opened at startup and closed
//! on shutdown; request handlers do not touch it.

use anyhow::{Context, Result};
use futures::FutureExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use url::Url;

const DEFAULT_PORT: u16 = 27017;

pub struct Database {
    address: String,
    conn: Mutex<Option<TcpStream>>,
}

impl Database {
    pub async fn connect(uri: &str) -> Result<Self> {
        let address = address_of(uri)?;
        let stream = TcpStream::connect(&address)
            .await
            .with_context(|| format!("could not connect to database at {address}"))?;
        log::info!("connected to db at {address}");

        Ok(Self {
            address,
            conn: Mutex::new(Some(stream)),
        })
    }

    /// True while the connection is held and the peer has not closed it.
    pub async fn is_connected(&self) -> bool {
        let guard = self.conn.lock().await;
        let Some(stream) = guard.as_ref() else {
            return false;
        };
        let mut buf = [0u8; 1];
        // Pending means no data and no EOF, so the socket is still open.
        match stream.peek(&mut buf).now_or_never() {
            None => true,
            Some(Ok(n)) => n > 0,
            Some(Err(e)) => {
                log::warn!("database connection to {} failed: {e}", self.address);
                false
            }
        }
    }

    pub async fn disconnect(&self) {
        if let Some(mut stream) = self.conn.lock().await.take() {
            if let Err(e) = stream.shutdown().await {
                log::warn!("error closing database connection to {}: {e}", self.address);
            }
            log::info!("disconnected from db at {}", self.address);
        }
    }
}

/// `host:port` of a connection string such as `mongodb://user:pw@db:27017/app`.
fn address_of(uri: &str) -> Result<String> {
    let url = Url::parse(uri).context("invalid database connection string")?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .context("database connection string has no host")?;
    Ok(format!("{host}:{}", url.port().unwrap_or(DEFAULT_PORT)))
}
