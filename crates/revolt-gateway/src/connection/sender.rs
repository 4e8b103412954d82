//! Outbound handle to the current session

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::{GatewayError, GatewayResult};
use crate::protocol::ClientMessage;

/// Cheap, cloneable handle for sending control messages
///
/// Each session installs a fresh queue when its socket opens and removes it
/// when the session ends, so messages never leak into a later session.
#[derive(Debug, Clone, Default)]
pub struct GatewaySender {
    slot: Arc<RwLock<Option<mpsc::Sender<ClientMessage>>>>,
}

impl GatewaySender {
    pub(crate) fn attach(&self, tx: mpsc::Sender<ClientMessage>) {
        *self.slot.write() = Some(tx);
    }

    pub(crate) fn detach(&self) {
        self.slot.write().take();
    }

    /// Whether a session queue is installed
    pub fn is_attached(&self) -> bool {
        self.slot.read().is_some()
    }

    fn current(&self) -> GatewayResult<mpsc::Sender<ClientMessage>> {
        self.slot.read().clone().ok_or(GatewayError::NotConnected)
    }

    /// Queue a message, waiting for room in the queue
    pub async fn send(&self, message: ClientMessage) -> GatewayResult<()> {
        let tx = self.current()?;
        tx.send(message)
            .await
            .map_err(|_| GatewayError::NotConnected)
    }

    /// Queue a message without waiting; usable from synchronous observers
    pub fn try_send(&self, message: ClientMessage) -> GatewayResult<()> {
        let tx = self.current()?;
        tx.try_send(message).map_err(|err| match err {
            TrySendError::Full(_) => GatewayError::Backpressure,
            TrySendError::Closed(_) => GatewayError::NotConnected,
        })
    }
}
