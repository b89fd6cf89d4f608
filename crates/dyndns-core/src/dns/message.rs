//! Wire encoding of update transactions and decoding of query answers
//!
//! RFC 2136 reuses the four sections of a DNS message:
//!
//! | Section    | UPDATE meaning | Content here                         |
//! |------------|----------------|--------------------------------------|
//! | question   | zone           | `<zone> IN SOA`                      |
//! | answer     | prerequisites  | RRset exists (ANY) / absent (NONE)   |
//! | authority  | updates        | delete RRset (ANY) + add (IN)        |
//! | additional | (unused)       | TSIG, appended when signing          |

use crate::error::{Error, Result};
use crate::update::{
    AddressRecordType, CurrentAddress, Prerequisite, UpdateAction, UpdateTransaction,
};
use hickory_client::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_client::rr::rdata::{A, AAAA};
use hickory_client::rr::{DNSClass, Name, RData, Record, RecordType};
use std::net::IpAddr;

/// Build the UPDATE message for `transaction` (unsigned)
pub fn update_message(transaction: &UpdateTransaction<'_>) -> Message {
    let mut message = Message::new();
    message
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Update)
        .set_recursion_desired(false);

    message.add_query(Query::query(transaction.zone().clone(), RecordType::SOA));

    for prerequisite in transaction.prerequisites() {
        message.add_answer(prerequisite_record(prerequisite));
    }

    for action in transaction.actions() {
        for record in action_records(action) {
            message.add_name_server(record);
        }
    }

    message
}

/// RFC 2136 §2.4.1 (exists, class ANY) and §2.4.3 (absent, class NONE)
fn prerequisite_record(prerequisite: &Prerequisite) -> Record {
    let class = match prerequisite {
        Prerequisite::Present { .. } => DNSClass::ANY,
        Prerequisite::Absent { .. } => DNSClass::NONE,
    };
    empty_rrset(prerequisite.owner(), prerequisite.record_type(), class)
}

/// RFC 2136 §2.5.1 (add) and §2.5.2 (delete RRset) records for an action
fn action_records(action: &UpdateAction) -> Vec<Record> {
    let add = Record::from_rdata(action.owner().clone(), action.ttl(), rdata(action.address()));

    match action {
        UpdateAction::Add { .. } => vec![add],
        UpdateAction::Replace { .. } => vec![
            empty_rrset(action.owner(), action.record_type(), DNSClass::ANY),
            add,
        ],
    }
}

/// A TTL 0 record without rdata, as used by RRset-level prerequisites and
/// deletions
fn empty_rrset(owner: &Name, record_type: AddressRecordType, class: DNSClass) -> Record {
    let mut record = Record::with(owner.clone(), record_type.record_type(), 0);
    record.set_dns_class(class);
    record
}

fn rdata(address: IpAddr) -> RData {
    match address {
        IpAddr::V4(ip) => RData::A(A::from(ip)),
        IpAddr::V6(ip) => RData::AAAA(AAAA::from(ip)),
    }
}

/// Interpret the answer to an address query
///
/// NXDOMAIN and an answer without a record of the type are both "not
/// found". Any other response code, or a truncated answer, is an error.
pub fn current_address(
    response: &Message,
    record_type: AddressRecordType,
) -> Result<CurrentAddress> {
    match response.response_code() {
        ResponseCode::NXDomain => Ok(CurrentAddress::NotFound),
        ResponseCode::NoError => {
            if response.truncated() {
                return Err(Error::resolve("answer was truncated"));
            }

            let found = response
                .answers()
                .iter()
                .filter(|record| record.record_type() == record_type.record_type())
                .find_map(|record| match record.data() {
                    Some(RData::A(a)) => Some(IpAddr::V4(a.0)),
                    Some(RData::AAAA(aaaa)) => Some(IpAddr::V6(aaaa.0)),
                    _ => None,
                });

            Ok(found.map_or(CurrentAddress::NotFound, CurrentAddress::Found))
        }
        rcode => Err(Error::resolve(format!("server answered {rcode}"))),
    }
}
