//! Domain update coordinator
//!
//! Drives one domain-update request from name to server answer:
//!
//! ```text
//!   fqdn ──► DomainTarget (zone / host)
//!               │
//!     ip4? ip6? │  for each requested family
//!               ▼
//!        ┌─────────────────┐   current    ┌───────────────┐
//!        │ AddressResolver │ ───────────► │ builder::apply│
//!        └─────────────────┘              └───────────────┘
//!                                               │ dirty?
//!                          no ◄─────────────────┼─────────────► yes
//!                          │                                     │
//!                     NothingToDo                   UpdateTransmitter::send
//!                                                                │
//!                                                 NOERROR ─► Updated
//!                                                 other   ─► UpdateFailed
//! ```
//!
//! One request is strictly sequential. The coordinator holds no per-request
//! state, so a single instance serves concurrent requests.

use crate::error::{Error, Result};
use crate::traits::AddressResolver;
use crate::update::{
    AddressRecordType, DomainTarget, PlannedChange, SigningKey, UpdateTransaction,
    UpdateTransmitter, builder,
};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use tracing::{debug, info, warn};

/// Final status of a successful coordinator run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    /// The server accepted a transaction with at least one change
    Updated,
    /// Every requested address was already published; nothing was sent
    NothingToDo,
}

/// Orchestrates resolve, build and transmit for one domain
pub struct DomainUpdateCoordinator {
    resolver: Box<dyn AddressResolver>,
    transmitter: UpdateTransmitter,
}

impl DomainUpdateCoordinator {
    /// Create a new coordinator
    ///
    /// # Parameters
    ///
    /// - `resolver`: reads the currently published addresses
    /// - `transmitter`: sends the transaction when it carries changes
    pub fn new(resolver: Box<dyn AddressResolver>, transmitter: UpdateTransmitter) -> Self {
        Self {
            resolver,
            transmitter,
        }
    }

    /// Publish `ip4` and/or `ip6` for `fqdn` on `server`
    ///
    /// Families that are `None` are left untouched. Both families travel in
    /// the same transaction, so the server applies them atomically.
    ///
    /// # Returns
    ///
    /// - `Ok(UpdateStatus::Updated)`: server answered NOERROR
    /// - `Ok(UpdateStatus::NothingToDo)`: no change needed, no message sent
    /// - `Err(Error::UpdateFailed)`: server answered with another code
    /// - `Err(_)`: invalid name, resolve, transport or timeout failure,
    ///   propagated unchanged
    pub async fn update(
        &self,
        fqdn: &str,
        key: &SigningKey,
        server: SocketAddr,
        ip4: Option<Ipv4Addr>,
        ip6: Option<Ipv6Addr>,
    ) -> Result<UpdateStatus> {
        let target = DomainTarget::parse(fqdn)?;
        let mut transaction = UpdateTransaction::new(target.zone().clone(), key);

        let requested = ip4
            .map(IpAddr::V4)
            .into_iter()
            .chain(ip6.map(IpAddr::V6));

        for desired in requested {
            self.plan(&mut transaction, &target, desired, server).await?;
        }

        if !transaction.is_dirty() {
            info!("{}: nothing to do", target);
            return Ok(UpdateStatus::NothingToDo);
        }

        let outcome = self.transmitter.send(transaction, server).await?;

        if outcome.is_success() {
            info!("{}: update accepted by {}", target, server);
            Ok(UpdateStatus::Updated)
        } else {
            warn!(
                "{}: update rejected by {} with {}",
                target,
                server,
                outcome.rcode()
            );
            Err(Error::UpdateFailed {
                rcode: outcome.rcode(),
            })
        }
    }

    async fn plan(
        &self,
        transaction: &mut UpdateTransaction<'_>,
        target: &DomainTarget,
        desired: IpAddr,
        server: SocketAddr,
    ) -> Result<()> {
        let record_type = AddressRecordType::for_address(&desired);
        let current = self
            .resolver
            .resolve(target.fqdn(), record_type, server)
            .await?;
        debug!("{} {} currently {:?}", target, record_type, current);

        match builder::apply(transaction, target.fqdn(), desired, &current)? {
            PlannedChange::Unchanged => {
                info!("{} {} already {}", target, record_type, desired);
            }
            PlannedChange::Add => {
                info!("{} {}: adding {}", target, record_type, desired);
            }
            PlannedChange::Replace { previous } => {
                info!(
                    "{} {}: replacing {} with {}",
                    target, record_type, previous, desired
                );
            }
        }

        Ok(())
    }
}
