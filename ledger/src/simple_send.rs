//! Simple-send application: atomic debit/credit with a sufficiency check.

use crate::error::LedgerError;
use crate::ledger::ApplyOutcome;
use umbra_decoder::SimpleSend;
use umbra_store::account::AccountStore;

/// Apply a simple send.
///
/// Checks `sender.balance[currency] >= amount` before touching anything; an
/// insufficient balance is an economically invalid transaction — reported,
/// with no state change. A self-send is validated the same way but is a net
/// no-op, so nothing is written.
pub(crate) fn apply_simple_send(
    accounts: &dyn AccountStore,
    send: &SimpleSend,
) -> Result<ApplyOutcome, LedgerError> {
    let mut sender_record = accounts.get_record(&send.sender)?;
    let available = sender_record.balance(send.currency);

    if available < send.amount {
        tracing::warn!(
            sender = %send.sender,
            currency = %send.currency,
            needed = %send.amount,
            %available,
            "simple send refused: insufficient balance"
        );
        return Ok(ApplyOutcome::InsufficientBalance {
            sender: send.sender.clone(),
            currency: send.currency,
            needed: send.amount,
            available,
        });
    }

    if send.sender == send.receiver {
        tracing::info!(sender = %send.sender, "self-send validated; balances unchanged");
        return Ok(ApplyOutcome::Applied);
    }

    // The sufficiency check above guarantees the debit succeeds.
    sender_record.debit(send.currency, send.amount);
    let mut receiver_record = accounts.get_record(&send.receiver)?;
    receiver_record.credit(send.currency, send.amount);

    accounts.put_record(&send.sender, &sender_record)?;
    accounts.put_record(&send.receiver, &receiver_record)?;

    tracing::info!(
        sender = %send.sender,
        receiver = %send.receiver,
        currency = %send.currency,
        amount = %send.amount,
        "simple send applied"
    );
    Ok(ApplyOutcome::Applied)
}
