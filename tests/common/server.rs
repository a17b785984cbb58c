//! Test server management.
//!
//! Spawns and manages presenced instances for integration testing.

use std::process::{Child, Command};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

/// A test server instance.
pub struct TestServer {
    child: Child,
    port: u16,
    // Held so the config outlives the process.
    _dir: TempDir,
}

impl TestServer {
    /// Spawn a test server listening on `port` with default settings.
    pub async fn spawn(port: u16) -> anyhow::Result<Self> {
        Self::spawn_with(&Self::config(port, ""), port, &[]).await
    }

    /// Minimal configuration listening on `port`, with extra `[listen]` lines.
    pub fn config(port: u16, extra_listen: &str) -> String {
        format!(
            r#"
[server]
name = "test.presenced"
metrics_port = 0

[listen]
address = "127.0.0.1:{port}"
{extra_listen}

[limits]
outbound_queue = 64
"#
        )
    }

    /// Spawn a test server from raw TOML and extra environment variables.
    ///
    /// `port` is where the server is expected to end up listening.
    pub async fn spawn_with(
        config: &str,
        port: u16,
        env: &[(&str, &str)],
    ) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, config)?;

        let mut command = Command::new(env!("CARGO_BIN_EXE_presenced"));
        command.arg(&config_path).env_remove("PORT");
        for (key, value) in env {
            command.env(key, value);
        }
        let child = command.spawn()?;

        let server = Self {
            child,
            port,
            _dir: dir,
        };

        // Wait for server to start listening
        server.wait_until_ready().await?;

        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 5 seconds")
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Connect a client with a complete handshake.
    pub async fn connect(&self, subject: &str, role: &str) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect_as(&self.address(), subject, role).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Kill the server process
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
