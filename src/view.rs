//! View state machine.
//!
//! [`AppState`] is driven by [`AppAction`]s coming from bootstrap, the
//! router, and fresh cell listings. [`AppState::screen`] picks the one
//! subtree the UI renders.

use std::fmt;

use tracing::{debug, warn};

use crate::bootstrap::Announcement;
use crate::cell::{CellId, find_cell};
use crate::router::{Navigation, Route};

/// Which main view is active once connected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Home,
    /// Detail view of an installed cell.
    Dna(CellId),
    /// The requested DNA is not installed; holds the hash as requested.
    NonexistingDna(String),
    PublishZome,
}

/// Why the UI cannot talk to Holochain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// No conductor answered on the configured endpoints.
    RuntimeUnreachable(String),
    /// A conductor answered but the compository DNA is not installed.
    CompositoryMissing(String),
    Misconfigured(String),
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RuntimeUnreachable(msg) => write!(f, "Holochain is not reachable: {msg}"),
            Self::CompositoryMissing(dna) => {
                write!(f, "Holochain is running but the compository DNA {dna} is not installed")
            }
            Self::Misconfigured(msg) => write!(f, "{msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Availability {
    #[default]
    Connecting,
    Present,
    Unavailable(UnavailableReason),
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    BootstrapSucceeded { announcement: Announcement },
    BootstrapFailed(UnavailableReason),
    Navigated(Navigation),
    /// Result of the fresh listing started for a detail navigation.
    CellsListed {
        seq: u64,
        dna: String,
        cells: Result<Vec<CellId>, String>,
    },
    DismissNotice,
}

/// Component-local state of the root view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub loading: bool,
    pub availability: Availability,
    pub active_view: ActiveView,
    /// Sequence number of the navigation the view should reflect.
    pub latest_seq: u64,
    /// Non-fatal warning shown above the active view.
    pub notice: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            loading: true,
            availability: Availability::Connecting,
            active_view: ActiveView::Home,
            latest_seq: 0,
            notice: None,
        }
    }
}

/// What the renderer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen<'a> {
    Loading,
    /// Instructions for running Holochain; `reason` is `None` for the
    /// static demo build.
    HolochainNotPresent { reason: Option<&'a UnavailableReason> },
    Dna(&'a CellId),
    NonexistingDna(&'a str),
    PublishZome,
    Home,
}

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Loading => write!(f, "loading"),
            Screen::HolochainNotPresent { reason: None } => write!(f, "holochain-not-present"),
            Screen::HolochainNotPresent {
                reason: Some(reason),
            } => write!(f, "holochain-not-present ({reason})"),
            Screen::Dna(cell_id) => write!(f, "dna {}", cell_id.dna_hash()),
            Screen::NonexistingDna(dna) => write!(f, "nonexisting-dna {dna}"),
            Screen::PublishZome => write!(f, "publish-zome"),
            Screen::Home => write!(f, "home"),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_present(&self) -> bool {
        self.availability == Availability::Present
    }

    /// Apply one action.
    pub fn apply(&mut self, action: AppAction) {
        match action {
            AppAction::BootstrapSucceeded { announcement } => {
                self.loading = false;
                self.availability = Availability::Present;
                if let Announcement::Failed(reason) = announcement {
                    self.notice = Some(format!(
                        "Could not announce this node as a file storage provider: {reason}"
                    ));
                }
            }
            AppAction::BootstrapFailed(reason) => {
                self.loading = false;
                self.availability = Availability::Unavailable(reason);
            }
            AppAction::Navigated(navigation) => self.navigated(navigation),
            AppAction::CellsListed { seq, dna, cells } => self.cells_listed(seq, &dna, cells),
            AppAction::DismissNotice => self.notice = None,
        }
    }

    fn navigated(&mut self, navigation: Navigation) {
        self.latest_seq = navigation.seq;
        match navigation.route {
            Route::Home => self.active_view = ActiveView::Home,
            Route::PublishZome => self.active_view = ActiveView::PublishZome,
            // Resolved once the fresh listing arrives.
            Route::Dna { .. } => {}
        }
    }

    fn cells_listed(&mut self, seq: u64, dna: &str, cells: Result<Vec<CellId>, String>) {
        if seq != self.latest_seq {
            debug!(seq, latest = self.latest_seq, "dropping stale cell listing");
            return;
        }
        match cells {
            Ok(cells) => {
                self.active_view = match find_cell(&cells, dna) {
                    Some(cell_id) => ActiveView::Dna(cell_id.clone()),
                    None => ActiveView::NonexistingDna(dna.to_string()),
                };
            }
            Err(e) => {
                warn!(dna, error = %e, "listing cells for navigation failed");
                self.notice = Some(format!("Could not look up DNA {dna}: {e}"));
            }
        }
    }

    /// The subtree to render. `static_demo` forces the instructions panel.
    pub fn screen(&self, static_demo: bool) -> Screen<'_> {
        if self.loading {
            return Screen::Loading;
        }
        if static_demo {
            return Screen::HolochainNotPresent { reason: None };
        }
        match &self.availability {
            Availability::Present => {}
            Availability::Unavailable(reason) => {
                return Screen::HolochainNotPresent {
                    reason: Some(reason),
                };
            }
            Availability::Connecting => return Screen::HolochainNotPresent { reason: None },
        }
        match &self.active_view {
            ActiveView::Home => Screen::Home,
            ActiveView::Dna(cell_id) => Screen::Dna(cell_id),
            ActiveView::NonexistingDna(dna) => Screen::NonexistingDna(dna),
            ActiveView::PublishZome => Screen::PublishZome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HoloHash;

    fn cell(n: u8) -> CellId {
        CellId::new(HoloHash::from_bytes(vec![n; 6]), HoloHash::from_bytes(vec![7; 6]))
    }

    fn nav(seq: u64, path: &str) -> Navigation {
        Navigation {
            seq,
            path: path.to_string(),
            route: Route::recognize(path),
        }
    }

    fn connected() -> AppState {
        let mut state = AppState::new();
        state.apply(AppAction::BootstrapSucceeded {
            announcement: Announcement::Skipped,
        });
        state
    }

    #[test]
    fn test_initial_state_is_loading() {
        let state = AppState::new();
        assert_eq!(state.screen(false), Screen::Loading);
        assert_eq!(state.screen(true), Screen::Loading);
    }

    #[test]
    fn test_found_dna_shows_detail() {
        let mut state = connected();
        let dna = cell(1).dna_hash().to_string();
        state.apply(AppAction::Navigated(nav(1, &format!("/dna/{dna}"))));
        state.apply(AppAction::CellsListed {
            seq: 1,
            dna,
            cells: Ok(vec![cell(1), cell(2)]),
        });
        assert_eq!(state.active_view, ActiveView::Dna(cell(1)));
        assert_eq!(state.screen(false), Screen::Dna(&cell(1)));
    }

    #[test]
    fn test_missing_dna_stays_not_found() {
        let mut state = connected();
        state.apply(AppAction::Navigated(nav(1, "/dna/zzz")));
        state.apply(AppAction::CellsListed {
            seq: 1,
            dna: "zzz".to_string(),
            cells: Ok(vec![cell(1)]),
        });
        assert_eq!(state.active_view, ActiveView::NonexistingDna("zzz".to_string()));
        assert_eq!(state.screen(false), Screen::NonexistingDna("zzz"));
    }

    #[test]
    fn test_home_clears_selection_and_missing_dna() {
        let mut state = connected();
        state.active_view = ActiveView::Dna(cell(1));
        state.apply(AppAction::Navigated(nav(1, "/")));
        assert_eq!(state.active_view, ActiveView::Home);

        state.active_view = ActiveView::NonexistingDna("zzz".to_string());
        state.apply(AppAction::Navigated(nav(2, "/nowhere")));
        assert_eq!(state.active_view, ActiveView::Home);
    }

    #[test]
    fn test_publish_from_any_view() {
        for prior in [
            ActiveView::Home,
            ActiveView::Dna(cell(1)),
            ActiveView::NonexistingDna("x".to_string()),
            ActiveView::PublishZome,
        ] {
            let mut state = connected();
            state.active_view = prior;
            state.apply(AppAction::Navigated(nav(5, "/publish-zome")));
            assert_eq!(state.screen(false), Screen::PublishZome);
        }
    }

    #[test]
    fn test_stale_listing_is_ignored() {
        let mut state = connected();
        let dna = cell(1).dna_hash().to_string();
        state.apply(AppAction::Navigated(nav(1, &format!("/dna/{dna}"))));
        state.apply(AppAction::Navigated(nav(2, "/publish-zome")));
        state.apply(AppAction::CellsListed {
            seq: 1,
            dna,
            cells: Ok(vec![cell(1)]),
        });
        assert_eq!(state.active_view, ActiveView::PublishZome);
    }

    #[test]
    fn test_listing_error_keeps_view_and_sets_notice() {
        let mut state = connected();
        state.apply(AppAction::Navigated(nav(1, "/dna/abc")));
        state.apply(AppAction::CellsListed {
            seq: 1,
            dna: "abc".to_string(),
            cells: Err("socket closed".to_string()),
        });
        assert_eq!(state.active_view, ActiveView::Home);
        assert!(state.notice.as_deref().unwrap().contains("socket closed"));

        state.apply(AppAction::DismissNotice);
        assert_eq!(state.notice, None);
    }

    #[test]
    fn test_unavailable_never_reaches_views() {
        let reason = UnavailableReason::CompositoryMissing("uhC0k".to_string());
        let mut state = AppState::new();
        state.apply(AppAction::BootstrapFailed(reason.clone()));

        for view in [
            ActiveView::Dna(cell(1)),
            ActiveView::NonexistingDna("x".to_string()),
            ActiveView::PublishZome,
            ActiveView::Home,
        ] {
            state.active_view = view;
            assert_eq!(
                state.screen(false),
                Screen::HolochainNotPresent {
                    reason: Some(&reason)
                }
            );
        }
    }

    #[test]
    fn test_static_demo_forces_instructions() {
        let state = connected();
        assert_eq!(
            state.screen(true),
            Screen::HolochainNotPresent { reason: None }
        );
        assert_eq!(state.screen(false), Screen::Home);
    }

    #[test]
    fn test_failed_announcement_sets_notice() {
        let mut state = AppState::new();
        state.apply(AppAction::BootstrapSucceeded {
            announcement: Announcement::Failed("rejected".to_string()),
        });
        assert!(state.is_present());
        assert!(state.notice.as_deref().unwrap().contains("rejected"));
    }

    #[test]
    fn test_screen_display() {
        assert_eq!(Screen::Home.to_string(), "home");
        assert_eq!(Screen::NonexistingDna("zzz").to_string(), "nonexisting-dna zzz");
        let reason = UnavailableReason::RuntimeUnreachable("refused".to_string());
        assert_eq!(
            Screen::HolochainNotPresent {
                reason: Some(&reason)
            }
            .to_string(),
            "holochain-not-present (Holochain is not reachable: refused)"
        );
    }
}
