//! Transmission and response classification

use super::transaction::UpdateTransaction;
use crate::error::{Error, Result};
use crate::traits::UpdateTransport;
use hickory_client::op::ResponseCode;
use std::net::SocketAddr;
use tracing::debug;

/// Result of a transmitted update, derived from the response code
///
/// NOERROR is the only success. Every other code is a failure; the raw code
/// is kept for callers that want finer diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    rcode: ResponseCode,
}

impl UpdateOutcome {
    pub fn from_rcode(rcode: ResponseCode) -> Self {
        Self { rcode }
    }

    pub fn is_success(&self) -> bool {
        self.rcode == ResponseCode::NoError
    }

    pub fn rcode(&self) -> ResponseCode {
        self.rcode
    }
}

/// Sends dirty transactions and classifies the answer
pub struct UpdateTransmitter {
    transport: Box<dyn UpdateTransport>,
}

impl UpdateTransmitter {
    pub fn new(transport: Box<dyn UpdateTransport>) -> Self {
        Self { transport }
    }

    /// Send `transaction` to `server`, consuming it
    ///
    /// Fails with [`Error::Precondition`] without any I/O when the
    /// transaction holds no changes; callers check
    /// [`UpdateTransaction::is_dirty`] first.
    pub async fn send(
        &self,
        transaction: UpdateTransaction<'_>,
        server: SocketAddr,
    ) -> Result<UpdateOutcome> {
        if !transaction.is_dirty() {
            return Err(Error::precondition("transaction has no changes to send"));
        }

        debug!(
            "Sending UPDATE for zone {} to {} ({} prerequisite(s), {} action(s))",
            transaction.zone(),
            server,
            transaction.prerequisites().len(),
            transaction.actions().len()
        );

        let rcode = self.transport.exchange(&transaction, server).await?;
        Ok(UpdateOutcome::from_rcode(rcode))
    }
}
