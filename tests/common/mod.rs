use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{redirect, StatusCode};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    _child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary; DATABASE_URL comes from the environment or .env
        let child = Command::new(env!("CARGO_BIN_EXE_notes-web"))
            .env("NOTES_PORT", port.to_string())
            .env("NOTES_HOST", "127.0.0.1")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { base_url, _child: child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            // The login form is the only page served without a session
            if let Ok(resp) = client.get(format!("{}/login", self.base_url)).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Client that leaves redirects for the test to inspect.
pub fn client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .redirect(redirect::Policy::none())
        .build()?)
}

/// Credentials of an ADMIN account provisioned with `notesctl user add`.
pub fn admin_credentials() -> (String, String) {
    (
        std::env::var("E2E_ADMIN_USER").unwrap_or_else(|_| "admin".to_string()),
        std::env::var("E2E_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string()),
    )
}

/// Log in and return the `Cookie` header value for the new session.
pub async fn login(server: &TestServer, username: &str, password: &str) -> Result<Option<String>> {
    let res = client()?
        .post(format!("{}/login", server.base_url))
        .form(&[("username", username), ("password", password)])
        .send()
        .await?;

    let cookie = res
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    Ok(cookie)
}
