//! Tracking page lifecycle events until the network goes idle.
//!
//! Chrome emits `networkIdle` once a frame has had no in-flight requests for
//! 500 ms. A fresh navigation restarts the sequence with `init`, so an idle
//! event only counts once the navigation we started has been seen.

/// Lifecycle event that opens a new navigation.
pub(crate) const INIT: &str = "init";
/// Lifecycle event emitted after 500 ms without network connections.
pub(crate) const NETWORK_IDLE: &str = "networkIdle";

#[derive(Debug, Default)]
pub(crate) struct IdleWatch {
    navigating: bool,
}

impl IdleWatch {
    /// Feed one main-frame lifecycle event; returns true once the network is idle.
    pub(crate) fn observe(&mut self, event: &str) -> bool {
        match event {
            INIT => {
                self.navigating = true;
                false
            },
            NETWORK_IDLE => self.navigating,
            _ => false,
        }
    }
}
