//! # compository
//!
//! Bootstrap, routing and view state for the compository web UI.
//!
//! The UI talks to a local Holochain conductor over two connections: the
//! admin interface (listing installed cells) and the app interface (calling
//! zome functions). After locating the compository cell it routes between a
//! home view, a per-DNA detail view, a "DNA not found" view and the zome
//! publishing workflow.
//!
//! Everything here is independent of the browser, so the same state
//! machine drives the web front end and the `compository-route` tool.
//!
//! ## Example
//!
//! ```
//! use compository::{AppAction, AppState, MemoryLocation, Route, Router, Screen};
//!
//! let router = Router::new(MemoryLocation::new());
//! let mut state = AppState::new();
//! state.apply(AppAction::BootstrapSucceeded {
//!     announcement: compository::Announcement::Skipped,
//! });
//!
//! let navigation = router.navigate("/publish-zome");
//! assert_eq!(navigation.route, Route::PublishZome);
//!
//! state.apply(AppAction::Navigated(navigation));
//! assert_eq!(state.screen(false), Screen::PublishZome);
//! ```

pub mod bootstrap;
pub mod cell;
pub mod child;
pub mod conductor;
pub mod config;
pub mod error;
pub mod hash;
pub mod memory;
pub mod router;
pub mod service;
pub mod view;

pub use bootstrap::{Announcement, Session, connect_to_holochain};
pub use cell::{CellId, find_cell};
pub use child::{ChildEvent, ChildView};
pub use conductor::{AdminApi, AppApi, Connector, ZomeCall};
pub use config::UiConfig;
pub use error::{BootstrapError, ConductorError, ConfigError, HashError};
pub use hash::{AgentPubKey, DnaHash, HoloHash};
pub use memory::MemoryConductor;
pub use router::{Location, MemoryLocation, Navigation, Route, Router, Subscription};
pub use service::CompositoryService;
pub use view::{ActiveView, AppAction, AppState, Availability, Screen, UnavailableReason};
