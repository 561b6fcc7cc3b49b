//! The service object handed to every child view.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::cell::CellId;
use crate::conductor::{AdminApi, AppApi, ZomeCall};
use crate::error::ConductorError;
use crate::router::{Navigation, Route};
use crate::view::AppAction;

pub const FILE_STORAGE_ZOME: &str = "file_storage";
pub const ANNOUNCE_AS_PROVIDER_FN: &str = "announce_as_provider";

/// Shared admin and app connections plus the compository cell.
///
/// Cloning is cheap; clones compare equal when they share the same
/// connections.
pub struct CompositoryService<A, P> {
    admin: Rc<A>,
    app: Rc<P>,
    cell_id: CellId,
}

impl<A: AdminApi, P: AppApi> CompositoryService<A, P> {
    pub fn new(admin: A, app: P, cell_id: CellId) -> Self {
        Self {
            admin: Rc::new(admin),
            app: Rc::new(app),
            cell_id,
        }
    }

    pub fn admin(&self) -> &A {
        &self.admin
    }

    pub fn app(&self) -> &P {
        &self.app
    }

    /// The compository cell this service calls into.
    pub fn cell_id(&self) -> &CellId {
        &self.cell_id
    }

    pub async fn list_cell_ids(&self) -> Result<Vec<CellId>, ConductorError> {
        self.admin.list_cell_ids().await
    }

    /// The listing that settles a detail navigation, or `None` when the
    /// route needs no lookup. Cells are listed afresh on every call.
    pub async fn lookup_detail(&self, navigation: &Navigation) -> Option<AppAction> {
        let Route::Dna { dna } = &navigation.route else {
            return None;
        };
        let cells = self.list_cell_ids().await.map_err(|e| {
            warn!(dna = %dna, error = %e, "listing cells failed");
            e.to_string()
        });
        debug!(seq = navigation.seq, dna = %dna, "detail lookup finished");
        Some(AppAction::CellsListed {
            seq: navigation.seq,
            dna: dna.clone(),
            cells,
        })
    }

    /// Announce this client as a file storage provider.
    pub async fn announce_as_provider(&self) -> Result<(), ConductorError> {
        let call = ZomeCall::new(
            self.cell_id.clone(),
            FILE_STORAGE_ZOME,
            ANNOUNCE_AS_PROVIDER_FN,
        );
        self.app.call_zome(call).await?;
        info!("announced as file storage provider");
        Ok(())
    }
}

impl<A, P> Clone for CompositoryService<A, P> {
    fn clone(&self) -> Self {
        Self {
            admin: self.admin.clone(),
            app: self.app.clone(),
            cell_id: self.cell_id.clone(),
        }
    }
}

impl<A, P> PartialEq for CompositoryService<A, P> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.admin, &other.admin)
            && Rc::ptr_eq(&self.app, &other.app)
            && self.cell_id == other.cell_id
    }
}

impl<A, P> fmt::Debug for CompositoryService<A, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositoryService")
            .field("cell_id", &self.cell_id)
            .finish_non_exhaustive()
    }
}
