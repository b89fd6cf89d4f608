//! Test doubles and common utilities for contract tests
//!
//! [`FakeZone`] stands in for the authoritative server: the resolver double
//! reads from it, and the transport double checks prerequisites against it
//! and applies accepted actions, the way RFC 2136 §3 processes an update.

#![allow(dead_code)]

use dyndns_core::error::{Error, Operation, Result};
use dyndns_core::traits::{AddressResolver, UpdateTransport};
use dyndns_core::update::{
    AddressRecordType, CurrentAddress, Prerequisite, UpdateAction, UpdateTransaction,
    UpdateTransmitter,
};
use dyndns_core::{DomainUpdateCoordinator, SigningKey, TsigAlgorithm};
use hickory_client::op::ResponseCode;
use hickory_client::rr::Name;
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Published address records, shared by the resolver and transport doubles
#[derive(Clone, Default)]
pub struct FakeZone {
    records: Arc<Mutex<HashMap<(Name, AddressRecordType), IpAddr>>>,
}

impl FakeZone {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `ip` for `owner`
    pub fn publish(&self, owner: &str, ip: &str) {
        let ip: IpAddr = ip.parse().unwrap();
        self.records
            .lock()
            .unwrap()
            .insert((name(owner), AddressRecordType::for_address(&ip)), ip);
    }

    /// Address published for `owner` and `record_type`
    pub fn lookup(&self, owner: &str, record_type: AddressRecordType) -> Option<IpAddr> {
        self.records
            .lock()
            .unwrap()
            .get(&(name(owner), record_type))
            .copied()
    }

    fn get(&self, owner: &Name, record_type: AddressRecordType) -> Option<IpAddr> {
        self.records
            .lock()
            .unwrap()
            .get(&(owner.clone(), record_type))
            .copied()
    }

    /// RFC 2136 §3.2 prerequisite check followed by §3.4 update processing
    fn process(&self, transaction: &UpdateTransaction<'_>) -> ResponseCode {
        let mut records = self.records.lock().unwrap();

        for prerequisite in transaction.prerequisites() {
            let key = (prerequisite.owner().clone(), prerequisite.record_type());
            match prerequisite {
                Prerequisite::Present { .. } if !records.contains_key(&key) => {
                    return ResponseCode::NXRRSet;
                }
                Prerequisite::Absent { .. } if records.contains_key(&key) => {
                    return ResponseCode::YXRRSet;
                }
                _ => {}
            }
        }

        for action in transaction.actions() {
            records.insert(
                (action.owner().clone(), action.record_type()),
                action.address(),
            );
        }

        ResponseCode::NoError
    }
}

/// Resolver double reading from a [`FakeZone`]
pub struct ZoneResolver {
    zone: FakeZone,
    call_count: Arc<AtomicUsize>,
}

impl ZoneResolver {
    pub fn new(zone: &FakeZone) -> Self {
        Self {
            zone: zone.clone(),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times resolve() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Create a new ZoneResolver that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            zone: other.zone.clone(),
            call_count: Arc::clone(&other.call_count),
        }
    }
}

#[async_trait::async_trait]
impl AddressResolver for ZoneResolver {
    async fn resolve(
        &self,
        name: &Name,
        record_type: AddressRecordType,
        _server: SocketAddr,
    ) -> Result<CurrentAddress> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .zone
            .get(name, record_type)
            .map_or(CurrentAddress::NotFound, CurrentAddress::Found))
    }
}

/// What a transport double saw of one transaction
#[derive(Debug, Clone, PartialEq)]
pub struct SentTransaction {
    pub zone: Name,
    pub key_name: Name,
    pub server: SocketAddr,
    pub prerequisites: Vec<Prerequisite>,
    pub actions: Vec<UpdateAction>,
}

/// How the transport double answers
#[derive(Debug, Clone, Copy)]
pub enum TransportBehavior {
    /// Process against the zone like a server would
    Apply,
    /// Answer with a fixed response code without touching the zone
    Answer(ResponseCode),
    /// Fail the exchange below the DNS layer
    ConnectionReset,
    /// Let the deadline elapse
    Hang,
}

/// Transport double that records every transaction it is given
pub struct RecordingTransport {
    zone: FakeZone,
    behavior: TransportBehavior,
    sent: Arc<Mutex<Vec<SentTransaction>>>,
}

impl RecordingTransport {
    pub fn new(zone: &FakeZone, behavior: TransportBehavior) -> Self {
        Self {
            zone: zone.clone(),
            behavior,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of exchanges
    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Get the recorded transactions
    pub fn sent(&self) -> Vec<SentTransaction> {
        self.sent.lock().unwrap().clone()
    }

    /// Create a new RecordingTransport that shares its log with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            zone: other.zone.clone(),
            behavior: other.behavior,
            sent: Arc::clone(&other.sent),
        }
    }
}

#[async_trait::async_trait]
impl UpdateTransport for RecordingTransport {
    async fn exchange(
        &self,
        transaction: &UpdateTransaction<'_>,
        server: SocketAddr,
    ) -> Result<ResponseCode> {
        self.sent.lock().unwrap().push(SentTransaction {
            zone: transaction.zone().clone(),
            key_name: transaction.signing_key().name().clone(),
            server,
            prerequisites: transaction.prerequisites().to_vec(),
            actions: transaction.actions().to_vec(),
        });

        match self.behavior {
            TransportBehavior::Apply => Ok(self.zone.process(transaction)),
            TransportBehavior::Answer(rcode) => Ok(rcode),
            TransportBehavior::ConnectionReset => {
                Err(Error::transport("connection reset by peer"))
            }
            TransportBehavior::Hang => Err(Error::timeout(Operation::Update, Duration::from_secs(10))),
        }
    }
}

/// Resolver double that always fails
pub struct FailingResolver {
    error: fn() -> Error,
}

impl FailingResolver {
    pub fn servfail() -> Self {
        Self {
            error: || Error::resolve("server answered SERVFAIL"),
        }
    }

    pub fn timing_out() -> Self {
        Self {
            error: || Error::timeout(Operation::Resolve, Duration::from_secs(5)),
        }
    }
}

#[async_trait::async_trait]
impl AddressResolver for FailingResolver {
    async fn resolve(
        &self,
        _name: &Name,
        _record_type: AddressRecordType,
        _server: SocketAddr,
    ) -> Result<CurrentAddress> {
        Err((self.error)())
    }
}

/// Absolute name from text
pub fn name(text: &str) -> Name {
    let mut name = Name::from_str(text).unwrap();
    name.set_fqdn(true);
    name
}

pub fn test_key() -> SigningKey {
    SigningKey::from_base64(
        "update-key.",
        TsigAlgorithm::HmacSha256,
        "c2VjcmV0LXNpZ25pbmcta2V5",
    )
    .unwrap()
}

pub fn test_server() -> SocketAddr {
    "192.0.2.53:53".parse().unwrap()
}

/// Coordinator over `zone`, returning the resolver and transport handles
pub fn coordinator(
    zone: &FakeZone,
    behavior: TransportBehavior,
) -> (DomainUpdateCoordinator, ZoneResolver, RecordingTransport) {
    let resolver = ZoneResolver::new(zone);
    let transport = RecordingTransport::new(zone, behavior);

    let coordinator = DomainUpdateCoordinator::new(
        Box::new(ZoneResolver::sharing_counters_with(&resolver)),
        UpdateTransmitter::new(Box::new(RecordingTransport::sharing_counters_with(
            &transport,
        ))),
    );

    (coordinator, resolver, transport)
}
