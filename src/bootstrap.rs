//! Connecting the UI to a running conductor.
//!
//! Steps run strictly in order: admin connection, app connection, cell
//! listing, compository cell lookup, optional provider announcement. The
//! first failing required step aborts the whole bootstrap.

use tracing::{info, warn};

use crate::cell::find_cell;
use crate::conductor::{AdminApi, Connector};
use crate::config::UiConfig;
use crate::error::BootstrapError;
use crate::service::CompositoryService;

/// Outcome of the optional file storage provider announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Announcement {
    /// Announcing is disabled in the config.
    Skipped,
    Announced,
    /// The call failed; the UI keeps working without it.
    Failed(String),
}

/// Everything a connected UI needs.
#[derive(Debug)]
pub struct Session<C: Connector> {
    pub service: CompositoryService<C::Admin, C::App>,
    pub announcement: Announcement,
}

/// Connect to the conductor described by `config` and locate the
/// compository cell.
pub async fn connect_to_holochain<C: Connector>(
    connector: &C,
    config: &UiConfig,
) -> Result<Session<C>, BootstrapError> {
    let admin = connector
        .connect_admin(&config.admin_url)
        .await
        .map_err(|source| BootstrapError::AdminUnreachable {
            url: config.admin_url.clone(),
            source,
        })?;

    let app = connector
        .connect_app(&config.app_url, config.app_connect_timeout())
        .await
        .map_err(|source| BootstrapError::AppUnreachable {
            url: config.app_url.clone(),
            source,
        })?;

    let cells = admin
        .list_cell_ids()
        .await
        .map_err(BootstrapError::ListCells)?;

    let cell_id = find_cell(&cells, &config.compository_dna_hash)
        .cloned()
        .ok_or_else(|| BootstrapError::CompositoryDnaMissing {
            dna_hash: config.compository_dna_hash.clone(),
        })?;
    info!(cells = cells.len(), dna = %cell_id.dna_hash(), "found compository cell");

    let service = CompositoryService::new(admin, app, cell_id);

    let announcement = if config.file_storage_provider {
        match service.announce_as_provider().await {
            Ok(()) => Announcement::Announced,
            Err(e) => {
                warn!(error = %e, "file storage provider announcement failed");
                Announcement::Failed(e.to_string())
            }
        }
    } else {
        Announcement::Skipped
    };

    Ok(Session {
        service,
        announcement,
    })
}
