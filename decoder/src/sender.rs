//! Sender resolution: which address authored a transaction.

use crate::error::DecodeError;
use umbra_store::pack::InputOrigin;
use umbra_types::Address;

/// Resolve the transaction's author from its input origins.
///
/// Sums values per source address across all inputs and returns the address
/// with the single largest aggregate contribution; ties break toward the
/// address seen first in input order. This "largest input wins" rule is
/// consensus-critical and must not change.
///
/// Fails with [`DecodeError::SenderUnresolved`] when no input carries a
/// traceable origin.
pub fn find_sender(origins: &[InputOrigin]) -> Result<Address, DecodeError> {
    // (address, aggregate value, first-seen position)
    let mut totals: Vec<(&Address, u128, usize)> = Vec::new();

    for (position, origin) in origins.iter().enumerate() {
        let Some(address) = &origin.address else {
            continue;
        };
        match totals.iter_mut().find(|(a, _, _)| *a == address) {
            Some(entry) => entry.1 += origin.value.raw() as u128,
            None => totals.push((address, origin.value.raw() as u128, position)),
        }
    }

    totals
        .into_iter()
        // Highest total wins; Reverse(position) makes the earlier
        // first-seen entry strictly greater on equal totals, so the
        // maximum is always unique.
        .max_by_key(|&(_, total, position)| (total, std::cmp::Reverse(position)))
        .map(|(address, _, _)| address.clone())
        .ok_or(DecodeError::SenderUnresolved)
}
