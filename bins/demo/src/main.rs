//! Docvault demo
//!
//! Builds an in-process vault, seeds the demo tenant when enabled, and walks
//! the upload, listing, preview, and deletion flows with logging.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docvault_core::clock::system_clock;
use docvault_core::document::{DocumentOwner, ListFilter};
use docvault_core::mime::{file_extension, format_file_size};
use docvault_core::{UploadRequest, VaultService, VaultStore};
use docvault_shared::AppConfig;
use docvault_shared::types::{OrganizationId, UserId};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docvault_core=debug,docvault_demo=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    info!(
        quota = %format_file_size(config.storage.quota_bytes),
        max_file_size = %format_file_size(config.storage.max_file_size),
        url_ttl_secs = config.cache.url_ttl_secs,
        "Configuration loaded"
    );

    let store = Arc::new(VaultStore::from_config(&config, system_clock()));
    let vault = VaultService::new(store.clone());

    let user = UserId::new(config.demo.user_id.as_str());
    let org = OrganizationId::new(config.demo.org_id.as_str());

    if config.demo.enabled {
        let outcome = store.fixtures().ensure_seeded(&user, &org);
        info!(?outcome, "Demo tenant ready");
    } else {
        warn!("Demo seeding disabled, starting with an empty vault");
    }

    // Upload flow
    let uploaded = vault.upload(
        UploadRequest::new(
            "Quarterly_Summary.md",
            &b"# Q4\n\nRevenue up, costs down.\n"[..],
            DocumentOwner::Organization(org.clone()),
            user.clone(),
        )
        .in_folder("reports"),
    )?;
    let confirmed = vault.confirm_upload(uploaded.id)?;
    info!(document_id = %confirmed.id, mime_type = %confirmed.mime_type, "Upload confirmed");

    // Listing flow
    let root = vault.list(&ListFilter::new().organization(org.clone()).root_only(true));
    for doc in &root {
        info!(
            name = %doc.name,
            kind = %file_extension(&doc.name),
            size = %format_file_size(doc.size),
            created_at = %doc.created_at,
            "Root document"
        );
    }
    let reports = vault.list(&ListFilter::new().organization(org.clone()).folder("reports"));
    info!(root = root.len(), reports = reports.len(), "Listing complete");

    // Preview flow
    if let Some(first) = root.first() {
        match vault
            .preview_url(first.id, |_| std::future::ready(None))
            .await
        {
            Ok(url) => info!(name = %first.name, url_len = url.len(), "Preview resolved"),
            Err(err) => warn!(name = %first.name, error = %err, "Preview failed"),
        }
    }

    // Usage
    let usage = vault.usage(&user);
    info!(
        used = %format_file_size(usage.used),
        total = %format_file_size(usage.total),
        remaining = %format_file_size(usage.remaining()),
        "Storage usage"
    );

    // Deletion flow
    vault.delete(confirmed.id)?;
    info!(document_id = %confirmed.id, "Deleted demo upload");

    Ok(())
}
