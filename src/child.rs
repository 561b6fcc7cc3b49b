//! Child views supplied by the compository element library, and the events
//! they emit back to the root view.

use crate::cell::CellId;
use crate::router::Route;

/// A child element the UI mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildView {
    /// Detail view of one DNA.
    DnaGrapes,
    DiscoverDnas,
    InstallDnaDialog,
    ComposeZomes,
    InstalledCells,
    PublishZome,
}

impl ChildView {
    pub const ALL: [ChildView; 6] = [
        ChildView::DnaGrapes,
        ChildView::DiscoverDnas,
        ChildView::InstallDnaDialog,
        ChildView::ComposeZomes,
        ChildView::InstalledCells,
        ChildView::PublishZome,
    ];

    /// Custom element tag name.
    pub fn tag(self) -> &'static str {
        match self {
            ChildView::DnaGrapes => "dna-grapes",
            ChildView::DiscoverDnas => "discover-dnas",
            ChildView::InstallDnaDialog => "install-dna-dialog",
            ChildView::ComposeZomes => "compose-zomes",
            ChildView::InstalledCells => "installed-cells",
            ChildView::PublishZome => "publish-zome",
        }
    }

    /// Events the root view listens for on this child.
    pub fn events(self) -> &'static [ChildEvent] {
        match self {
            ChildView::DnaGrapes => &[ChildEvent::NavigateBack],
            ChildView::DiscoverDnas | ChildView::ComposeZomes => &[ChildEvent::DnaInstalled],
            ChildView::InstalledCells => &[ChildEvent::CellSelected],
            ChildView::PublishZome => &[ChildEvent::ZomePublished],
            ChildView::InstallDnaDialog => &[],
        }
    }

    /// Whether the element takes a `cellId` property.
    pub fn takes_cell_id(self) -> bool {
        matches!(self, ChildView::DnaGrapes)
    }
}

/// A completion or selection event emitted by a child view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildEvent {
    CellSelected,
    DnaInstalled,
    ZomePublished,
    NavigateBack,
}

impl ChildEvent {
    /// DOM event name.
    pub fn name(self) -> &'static str {
        match self {
            ChildEvent::CellSelected => "cell-selected",
            ChildEvent::DnaInstalled => "dna-installed",
            ChildEvent::ZomePublished => "zome-published",
            ChildEvent::NavigateBack => "navigate-back",
        }
    }

    /// Whether the event detail carries a `cellId`.
    pub fn carries_cell(self) -> bool {
        matches!(self, ChildEvent::CellSelected | ChildEvent::DnaInstalled)
    }

    /// Where the UI navigates in response. Cell events without a cell id
    /// lead nowhere.
    pub fn route(self, cell_id: Option<&CellId>) -> Option<Route> {
        if self.carries_cell() {
            cell_id.map(Route::dna)
        } else {
            Some(Route::Home)
        }
    }
}
