//! TSIG signer construction

use crate::error::{Error, Result};
use crate::update::{SigningKey, TsigAlgorithm};
use hickory_client::rr::rdata::tsig::TsigAlgorithm as WireAlgorithm;
use hickory_proto::rr::dnssec::tsig::TSigner;

/// Allowed clock skew between signer and server, in seconds
pub const TSIG_FUDGE_SECS: u16 = 300;

/// Build a hickory signer for `key`
///
/// Fails with [`Error::SigningKey`] when the crypto backend does not
/// implement the key's algorithm, so a daemon can reject such a key at
/// startup instead of on the first update.
pub fn tsigner(key: &SigningKey) -> Result<TSigner> {
    TSigner::new(
        key.secret().to_vec(),
        wire_algorithm(key.algorithm()),
        key.name().clone(),
        TSIG_FUDGE_SECS,
    )
    .map_err(|e| {
        Error::signing_key(format!(
            "cannot sign with {} ({}): {e}",
            key.name(),
            key.algorithm()
        ))
    })
}

fn wire_algorithm(algorithm: TsigAlgorithm) -> WireAlgorithm {
    match algorithm {
        TsigAlgorithm::HmacSha256 => WireAlgorithm::HmacSha256,
        TsigAlgorithm::HmacSha384 => WireAlgorithm::HmacSha384,
        TsigAlgorithm::HmacSha512 => WireAlgorithm::HmacSha512,
    }
}
