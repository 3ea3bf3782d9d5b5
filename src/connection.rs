//! Per-connection outbound handle.

use crate::protocol::ServerMessage;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Identifier of a client connection.
pub type ConnectionId = Uuid;

/// Handle for pushing messages to one client.
///
/// Messages are queued on an unbounded channel drained by the transport
/// task that owns the socket, so sending never blocks match processing.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<ServerMessage>,
}

impl Connection {
    /// Wraps an existing sender.
    pub fn new(tx: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tx,
        }
    }

    /// Creates a connection together with the receiving end of its queue.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Connection id.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queues a message for the client.
    ///
    /// Returns `false` if the client has already gone away; the message is
    /// dropped in that case.
    pub fn send(&self, message: ServerMessage) -> bool {
        match self.tx.send(message) {
            Ok(()) => true,
            Err(err) => {
                debug!(connection_id = %self.id, message = ?err.0, "Dropping message for closed connection");
                false
            }
        }
    }

    /// Whether the receiving side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
