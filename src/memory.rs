//! In-process conductor over a fixed list of installed cells.
//!
//! Backs the `compository-route` tool and the tests. Handles share state
//! with the conductor that created them, so cells installed after
//! connecting show up in later listings.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde_json::Value;

use crate::cell::CellId;
use crate::conductor::{AdminApi, AppApi, Connector, ZomeCall};
use crate::error::ConductorError;

#[derive(Debug, Default)]
struct Shared {
    cells: Vec<CellId>,
    admin_reachable: bool,
    app_reachable: bool,
    fail_zome_calls: bool,
    zome_calls: Vec<ZomeCall>,
    list_calls: usize,
    connected_app_timeout: Option<Duration>,
}

/// A conductor living entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryConductor {
    shared: Rc<RefCell<Shared>>,
}

impl MemoryConductor {
    pub fn new(cells: Vec<CellId>) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                cells,
                admin_reachable: true,
                app_reachable: true,
                ..Shared::default()
            })),
        }
    }

    /// Refuse every connection attempt.
    pub fn unreachable(self) -> Self {
        {
            let mut shared = self.shared.borrow_mut();
            shared.admin_reachable = false;
            shared.app_reachable = false;
        }
        self
    }

    /// Accept admin connections but time out app connections.
    pub fn without_app_interface(self) -> Self {
        self.shared.borrow_mut().app_reachable = false;
        self
    }

    /// Reject every zome call.
    pub fn failing_zome_calls(self) -> Self {
        self.shared.borrow_mut().fail_zome_calls = true;
        self
    }

    pub fn install(&self, cell: CellId) {
        self.shared.borrow_mut().cells.push(cell);
    }

    pub fn zome_calls(&self) -> Vec<ZomeCall> {
        self.shared.borrow().zome_calls.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.shared.borrow().list_calls
    }

    /// Timeout passed to the last successful app connection.
    pub fn connected_app_timeout(&self) -> Option<Duration> {
        self.shared.borrow().connected_app_timeout
    }
}

/// Admin handle onto a [`MemoryConductor`].
#[derive(Debug, Clone)]
pub struct MemoryAdmin {
    shared: Rc<RefCell<Shared>>,
}

/// App handle onto a [`MemoryConductor`].
#[derive(Debug, Clone)]
pub struct MemoryApp {
    shared: Rc<RefCell<Shared>>,
}

impl Connector for MemoryConductor {
    type Admin = MemoryAdmin;
    type App = MemoryApp;

    async fn connect_admin(&self, url: &str) -> Result<MemoryAdmin, ConductorError> {
        if !self.shared.borrow().admin_reachable {
            return Err(ConductorError::Connect {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(MemoryAdmin {
            shared: self.shared.clone(),
        })
    }

    async fn connect_app(&self, url: &str, timeout: Duration) -> Result<MemoryApp, ConductorError> {
        let mut shared = self.shared.borrow_mut();
        if !shared.app_reachable {
            if shared.admin_reachable {
                return Err(ConductorError::Timeout(timeout));
            }
            return Err(ConductorError::Connect {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        shared.connected_app_timeout = Some(timeout);
        Ok(MemoryApp {
            shared: self.shared.clone(),
        })
    }
}

impl AdminApi for MemoryAdmin {
    async fn list_cell_ids(&self) -> Result<Vec<CellId>, ConductorError> {
        let mut shared = self.shared.borrow_mut();
        shared.list_calls += 1;
        Ok(shared.cells.clone())
    }
}

impl AppApi for MemoryApp {
    async fn call_zome(&self, call: ZomeCall) -> Result<Value, ConductorError> {
        let mut shared = self.shared.borrow_mut();
        let fail = shared.fail_zome_calls;
        let target = format!("{}/{}", call.zome_name, call.fn_name);
        shared.zome_calls.push(call);
        if fail {
            return Err(ConductorError::Request(format!("{target} rejected")));
        }
        Ok(Value::Null)
    }
}
