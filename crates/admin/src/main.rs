//! Headless admin smoke binary.
//!
//! Wires the file-backed session store, the auth adapter, and the REST data
//! provider against the configured backend, then runs one authenticated
//! flow: check the session, log in if needed, and list the first page of
//! blog posts.

mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pressroom_auth::{DirectoryAuthProvider, MemoryUserDirectory, UserDirectory};
use pressroom_client::{HttpTransport, RestDataProvider};
use pressroom_core::provider::{AuthProvider, DataProvider, SessionStore};
use pressroom_core::query::{Pagination, SortOrder, Sorter};
use pressroom_session::FileSessionStore;

use config::AdminConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pressroom=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = AdminConfig::from_env();
    tracing::info!(api_url = %config.api_url, session_file = %config.session_file, "Loaded configuration");

    // --- Wiring ---
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(&config.session_file));
    let directory: Arc<dyn UserDirectory> = Arc::new(MemoryUserDirectory::with_mock_users());

    let transport = Arc::new(
        HttpTransport::new(
            &config.api_url,
            Arc::clone(&store),
            Duration::from_secs(config.http_timeout_secs),
        )
        .context("Failed to build HTTP transport")?,
    );

    let auth = DirectoryAuthProvider::new(directory, Arc::clone(&store));
    let data = RestDataProvider::new(transport);

    // --- Session ---
    let check = auth.check().await?;
    if check.authenticated {
        tracing::info!("Existing session found");
    } else {
        tracing::info!(email = %config.login_email, "No session, logging in");
        let outcome = auth.login(&config.login_email, None).await?;
        if !outcome.authenticated {
            bail!(
                "Login failed: {}",
                outcome
                    .error
                    .map(|e| e.message)
                    .unwrap_or_else(|| "unknown error".into())
            );
        }
    }

    if let Some(identity) = auth.identity().await? {
        tracing::info!(email = %identity.email, roles = ?identity.roles, "Signed in");
    }

    // --- Data ---
    let page = data
        .list(
            "blog_posts",
            &Pagination::default(),
            &[Sorter::new("title", SortOrder::Asc)],
            &[],
        )
        .await
        .context("Failed to list blog posts")?;

    tracing::info!(total = page.total, fetched = page.data.len(), "Listed blog posts");
    for record in &page.data {
        let id = record.get("id").cloned().unwrap_or_default();
        let title = record
            .get("title")
            .and_then(|t| t.as_str())
            .unwrap_or("<untitled>");
        tracing::info!(%id, title, "Post");
    }

    Ok(())
}
