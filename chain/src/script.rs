//! Output-script classification and payload recovery.
//!
//! Classifies output scripts, recovers paid addresses, and extracts the
//! pseudo-public-keys that carry hidden overlay payloads in
//! multi-signature-style outputs. [`StandardInspector`] implements the
//! standard patterns; the trait exists so embedders can substitute the
//! host chain's own script interpreter.

use crate::error::ChainError;
use umbra_types::Address;

const OP_DUP: u8 = 0x76;
const OP_HASH160: u8 = 0xa9;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_CHECKSIG: u8 = 0xac;
const OP_CHECKMULTISIG: u8 = 0xae;
const OP_1: u8 = 0x51;
const OP_16: u8 = 0x60;

/// Maximum direct-push length; addresses and keys always fit.
const MAX_DIRECT_PUSH: usize = 0x4b;

/// The three script shapes the overlay protocol distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptType {
    /// A plain pay-to-address output; the address and value are readable
    /// directly.
    Plain,
    /// A bare multi-signature-style output; overlay data may be hidden in
    /// the pseudo-public-keys.
    Multisig,
    /// Anything else. Carries no overlay data.
    Other,
}

/// Read-only script interpreter collaborator.
///
/// Implementations must be pure: the same script bytes always produce the
/// same answers, with no chain state consulted. Replay correctness depends
/// on this.
pub trait ScriptInspector: Send + Sync {
    /// Classify an output script.
    fn script_type(&self, script: &[u8]) -> ScriptType;

    /// Addresses paid by a script. Empty for multisig and unknown scripts.
    fn addresses(&self, script: &[u8]) -> Vec<Address>;

    /// The public-key slots of a bare multisig script, in script order.
    /// Empty when the script is not multisig.
    fn multisig_keys(&self, script: &[u8]) -> Vec<Vec<u8>>;
}

/// Standard-pattern implementation of [`ScriptInspector`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardInspector;

impl ScriptInspector for StandardInspector {
    fn script_type(&self, script: &[u8]) -> ScriptType {
        if parse_pay_to_address(script).is_some() {
            ScriptType::Plain
        } else if parse_multisig(script).is_some() {
            ScriptType::Multisig
        } else {
            ScriptType::Other
        }
    }

    fn addresses(&self, script: &[u8]) -> Vec<Address> {
        match parse_pay_to_address(script) {
            Some(addr) => vec![addr],
            None => Vec::new(),
        }
    }

    fn multisig_keys(&self, script: &[u8]) -> Vec<Vec<u8>> {
        parse_multisig(script).unwrap_or_default()
    }
}

/// Build a plain pay-to-address output script.
pub fn pay_to_address(address: &Address) -> Result<Vec<u8>, ChainError> {
    let payload = address.as_str().as_bytes();
    if payload.is_empty() || payload.len() > MAX_DIRECT_PUSH {
        return Err(ChainError::Backend(format!(
            "address payload of {} bytes cannot be pushed",
            payload.len()
        )));
    }
    let mut script = Vec::with_capacity(payload.len() + 5);
    script.push(OP_DUP);
    script.push(OP_HASH160);
    script.push(payload.len() as u8);
    script.extend_from_slice(payload);
    script.push(OP_EQUALVERIFY);
    script.push(OP_CHECKSIG);
    Ok(script)
}

/// Build a bare `required`-of-`keys.len()` multisig output script.
pub fn multisig(required: u8, keys: &[Vec<u8>]) -> Result<Vec<u8>, ChainError> {
    if required == 0 || required as usize > keys.len() || keys.len() > 16 {
        return Err(ChainError::Backend(format!(
            "invalid multisig shape: {required} of {}",
            keys.len()
        )));
    }
    let mut script = Vec::new();
    script.push(OP_1 + required - 1);
    for key in keys {
        if key.len() != 33 && key.len() != 65 {
            return Err(ChainError::Backend(format!(
                "multisig key must be 33 or 65 bytes, got {}",
                key.len()
            )));
        }
        script.push(key.len() as u8);
        script.extend_from_slice(key);
    }
    script.push(OP_1 + keys.len() as u8 - 1);
    script.push(OP_CHECKMULTISIG);
    Ok(script)
}

fn parse_pay_to_address(script: &[u8]) -> Option<Address> {
    if script.len() < 5 || script[0] != OP_DUP || script[1] != OP_HASH160 {
        return None;
    }
    let len = script[2] as usize;
    if len == 0 || len > MAX_DIRECT_PUSH || script.len() != len + 5 {
        return None;
    }
    if script[len + 3] != OP_EQUALVERIFY || script[len + 4] != OP_CHECKSIG {
        return None;
    }
    let payload = std::str::from_utf8(&script[3..3 + len]).ok()?;
    Some(Address::new(payload))
}

fn parse_multisig(script: &[u8]) -> Option<Vec<Vec<u8>>> {
    let (&first, mut rest) = script.split_first()?;
    if !(OP_1..=OP_16).contains(&first) {
        return None;
    }
    let mut keys = Vec::new();
    loop {
        let (&op, tail) = rest.split_first()?;
        if (OP_1..=OP_16).contains(&op) {
            // OP_N terminator: must announce the key count and be followed
            // by exactly OP_CHECKMULTISIG.
            if (op - OP_1 + 1) as usize != keys.len()
                || tail.len() != 1
                || tail[0] != OP_CHECKMULTISIG
            {
                return None;
            }
            if keys.is_empty() {
                return None;
            }
            return Some(keys);
        }
        let len = op as usize;
        if (len != 33 && len != 65) || tail.len() < len {
            return None;
        }
        keys.push(tail[..len].to_vec());
        rest = &tail[len..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(s)
    }

    #[test]
    fn pay_to_address_round_trips() {
        let a = addr("1Nw7dGLL5kfZ4aqv3kDA2avYktVGcMXjUx");
        let script = pay_to_address(&a).unwrap();
        let inspector = StandardInspector;
        assert_eq!(inspector.script_type(&script), ScriptType::Plain);
        assert_eq!(inspector.addresses(&script), vec![a]);
        assert!(inspector.multisig_keys(&script).is_empty());
    }

    #[test]
    fn multisig_round_trips() {
        let keys = vec![vec![0x02; 33], vec![0x03; 33]];
        let script = multisig(1, &keys).unwrap();
        let inspector = StandardInspector;
        assert_eq!(inspector.script_type(&script), ScriptType::Multisig);
        assert!(inspector.addresses(&script).is_empty());
        assert_eq!(inspector.multisig_keys(&script), keys);
    }

    #[test]
    fn uncompressed_keys_accepted() {
        let keys = vec![vec![0x04; 65], vec![0x02; 33]];
        let script = multisig(2, &keys).unwrap();
        assert_eq!(StandardInspector.multisig_keys(&script), keys);
    }

    #[test]
    fn garbage_is_other() {
        let inspector = StandardInspector;
        assert_eq!(inspector.script_type(&[]), ScriptType::Other);
        assert_eq!(inspector.script_type(&[0x6a, 0x01, 0xff]), ScriptType::Other);
        assert!(inspector.addresses(&[0x6a]).is_empty());
    }

    #[test]
    fn truncated_multisig_rejected() {
        let keys = vec![vec![0x02; 33]];
        let mut script = multisig(1, &keys).unwrap();
        script.truncate(script.len() - 1);
        assert_eq!(StandardInspector.script_type(&script), ScriptType::Other);
    }

    #[test]
    fn multisig_with_wrong_count_terminator_rejected() {
        let keys = vec![vec![0x02; 33], vec![0x03; 33]];
        let mut script = multisig(1, &keys).unwrap();
        // Claim three keys in the OP_N slot while only two are present.
        let n_index = script.len() - 2;
        script[n_index] = OP_1 + 2;
        assert_eq!(StandardInspector.script_type(&script), ScriptType::Other);
    }

    #[test]
    fn invalid_build_shapes_error() {
        assert!(multisig(0, &[vec![0x02; 33]]).is_err());
        assert!(multisig(2, &[vec![0x02; 33]]).is_err());
        assert!(multisig(1, &[vec![0x02; 32]]).is_err());
        assert!(pay_to_address(&addr("")).is_err());
    }
}
