//! Fundraiser application and the developer-allocation vesting curve.

use crate::error::LedgerError;
use umbra_decoder::FundraiserContribution;
use umbra_store::account::AccountStore;
use umbra_types::params::{DEV_ALLOCATION_MAX, DEV_VESTING_DECAY_SECS, DEV_VESTING_EPOCH};
use umbra_types::{CurrencyId, Timestamp, TokenAmount};

/// Apply a fundraiser contribution.
///
/// Converts the contributed host-chain amount into raw overlay units —
/// floor(v × 1e8), integers only — and credits that amount to BOTH founding
/// currencies for the contributor. Contributions only ever increase
/// balances, so there is no sufficiency check; the only failure mode is
/// persistence.
pub(crate) fn apply_fundraiser(
    accounts: &dyn AccountStore,
    contribution: &FundraiserContribution,
) -> Result<(), LedgerError> {
    let credit = TokenAmount::from_host_units(contribution.amount);

    let mut record = accounts.get_record(&contribution.contributor)?;
    record.credit(CurrencyId::UMBRA, credit);
    record.credit(CurrencyId::PENUMBRA, credit);
    accounts.put_record(&contribution.contributor, &record)?;

    tracing::info!(
        contributor = %contribution.contributor,
        contributed = %contribution.amount,
        credited = %credit,
        "fundraiser contribution applied to both founding currencies"
    );
    Ok(())
}

/// Cumulative developer-allocation ceiling at time `t`:
///
/// `allocation(t) = (1 − 0.5^((t − T0) / S)) × C_max`
///
/// Zero at or before the epoch, approaching `C_max` asymptotically; half of
/// the remaining allocation vests every `S` seconds. This is a point-in-time
/// computation only — periodic reconciliation against the ledger is not
/// performed here, and the value never feeds a balance mutation, which is
/// why floating point is acceptable.
pub fn dev_allocation(t: Timestamp) -> TokenAmount {
    let elapsed = t.seconds_since(Timestamp::new(DEV_VESTING_EPOCH));
    if elapsed == 0 {
        return TokenAmount::ZERO;
    }
    let exponent = elapsed as f64 / DEV_VESTING_DECAY_SECS as f64;
    let vested_fraction = 1.0 - 0.5_f64.powf(exponent);
    TokenAmount::new((vested_fraction * DEV_ALLOCATION_MAX as f64) as u128)
}
