//! Signable payload codec.
//!
//! The agreed transaction travels between rounds and into settlement as
//! one hex string with a fixed field order:
//!
//! ```text
//! operation(1) ‖ to(20) ‖ value(32) ‖ data_len(32) ‖ data ‖ safe_tx_gas(32) ‖ safe_tx_hash(32)
//! ```
//!
//! Integers are big-endian and zero-padded to 32 bytes. `decode_signable`
//! is the exact inverse of `encode_signable` and rejects anything it
//! could not have produced: bad lengths, unknown operations, integers
//! outside the `u64` range, trailing bytes.

use accord_types::{Address, ContentError, SafeOperation, SignableBundle};

/// Fixed bytes around the variable-length `data` section.
const FIXED_LEN: usize = 1 + 20 + 32 + 32 + 32 + 32;

/// Zero-padded 32-byte big-endian form of a `u64`.
pub(crate) fn u256_be(value: u64) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[24..].copy_from_slice(&value.to_be_bytes());
    out
}

/// Read a 32-byte big-endian integer that must fit in a `u64`.
fn read_u256_as_u64(bytes: &[u8], field: &str) -> Result<u64, ContentError> {
    if bytes[..24].iter().any(|b| *b != 0) {
        return Err(ContentError::PayloadDecode(format!(
            "{field} exceeds the supported integer range"
        )));
    }
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[24..32]);
    Ok(u64::from_be_bytes(raw))
}

/// Encode a bundle into the hex payload participants vote on.
pub fn encode_signable(bundle: &SignableBundle) -> Result<String, ContentError> {
    let mut out = Vec::with_capacity(FIXED_LEN + bundle.data.len());
    out.push(bundle.operation.as_u8());
    out.extend_from_slice(&bundle.to.to_bytes()?);
    out.extend_from_slice(&u256_be(bundle.value));
    out.extend_from_slice(&u256_be(bundle.data.len() as u64));
    out.extend_from_slice(&bundle.data);
    out.extend_from_slice(&u256_be(bundle.safe_tx_gas));
    out.extend_from_slice(&bundle.safe_tx_hash);
    Ok(hex::encode(out))
}

/// Decode a payload back into the bundle it encodes.
pub fn decode_signable(payload: &str) -> Result<SignableBundle, ContentError> {
    let bytes = hex::decode(payload).map_err(|e| ContentError::InvalidHex {
        field: "signable_payload".to_string(),
        reason: e.to_string(),
    })?;
    if bytes.len() < FIXED_LEN {
        return Err(ContentError::PayloadDecode(format!(
            "payload is {} bytes, shorter than the {} byte minimum",
            bytes.len(),
            FIXED_LEN
        )));
    }

    let operation = SafeOperation::from_u8(bytes[0])?;
    let mut to = [0u8; 20];
    to.copy_from_slice(&bytes[1..21]);
    let value = read_u256_as_u64(&bytes[21..53], "value")?;
    let data_len = read_u256_as_u64(&bytes[53..85], "data_len")? as usize;

    let data_end = 85usize
        .checked_add(data_len)
        .ok_or_else(|| ContentError::PayloadDecode("data_len overflows".to_string()))?;
    if bytes.len() != data_end + 64 {
        return Err(ContentError::PayloadDecode(format!(
            "data_len {} does not match the {} bytes present",
            data_len,
            bytes.len()
        )));
    }
    let data = bytes[85..data_end].to_vec();
    let safe_tx_gas = read_u256_as_u64(&bytes[data_end..data_end + 32], "safe_tx_gas")?;
    let mut safe_tx_hash = [0u8; 32];
    safe_tx_hash.copy_from_slice(&bytes[data_end + 32..]);

    Ok(SignableBundle {
        to: Address::from_bytes(to),
        value,
        data,
        operation,
        safe_tx_gas,
        safe_tx_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bundle(data: Vec<u8>) -> SignableBundle {
        SignableBundle {
            to: Address::new("0xa238cbeb142c10ef7ad8442c6d1f9e89e07e7761"),
            value: 0,
            data,
            operation: SafeOperation::DelegateCall,
            safe_tx_gas: 0,
            safe_tx_hash: [0x11; 32],
        }
    }

    #[test]
    fn encode_layout_is_fixed() {
        let encoded = encode_signable(&bundle(vec![0xde, 0xad])).unwrap();
        // operation
        assert!(encoded.starts_with("01"));
        // to
        assert_eq!(&encoded[2..42], "a238cbeb142c10ef7ad8442c6d1f9e89e07e7761");
        // value: 32 zero bytes
        assert_eq!(&encoded[42..106], "0".repeat(64));
        // data_len = 2
        assert_eq!(
            &encoded[106..170],
            format!("{}02", "0".repeat(62)).as_str()
        );
        // data
        assert_eq!(&encoded[170..174], "dead");
        // hex length: (149 + 2) bytes * 2
        assert_eq!(encoded.len(), 302);
        assert!(encoded.ends_with(&"11".repeat(32)));
    }

    #[test]
    fn roundtrip_explicit() {
        let original = bundle(vec![1, 2, 3, 4, 5]);
        let decoded = decode_signable(&encode_signable(&original).unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn empty_data_roundtrip() {
        let original = bundle(Vec::new());
        let decoded = decode_signable(&encode_signable(&original).unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn rejects_non_hex() {
        assert!(matches!(
            decode_signable("zz"),
            Err(ContentError::InvalidHex { .. })
        ));
    }

    #[test]
    fn rejects_truncated_payload() {
        let encoded = encode_signable(&bundle(vec![0xde, 0xad])).unwrap();
        let truncated = &encoded[..encoded.len() - 2];
        assert!(decode_signable(truncated).is_err());
    }

    #[test]
    fn rejects_unknown_operation() {
        let mut encoded = encode_signable(&bundle(vec![])).unwrap();
        encoded.replace_range(0..2, "07");
        assert!(matches!(
            decode_signable(&encoded),
            Err(ContentError::UnknownOperation(7))
        ));
    }

    #[test]
    fn rejects_mismatched_data_len() {
        let mut encoded = encode_signable(&bundle(vec![0xde, 0xad])).unwrap();
        // Claim 3 bytes of data while carrying 2.
        encoded.replace_range(168..170, "03");
        assert!(decode_signable(&encoded).is_err());
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut encoded = encode_signable(&bundle(vec![])).unwrap();
        encoded.push_str("ab");
        assert!(decode_signable(&encoded).is_err());
    }

    #[test]
    fn rejects_value_beyond_u64() {
        let mut encoded = encode_signable(&bundle(vec![])).unwrap();
        // Set the highest byte of the value field.
        encoded.replace_range(42..44, "01");
        assert!(decode_signable(&encoded).is_err());
    }

    proptest! {
        /// Decoding inverts encoding for any bundle this system can build.
        #[test]
        fn roundtrip(
            data in proptest::collection::vec(any::<u8>(), 0..200),
            value in any::<u64>(),
            gas in any::<u64>(),
            hash in any::<[u8; 32]>(),
            op in prop_oneof![Just(SafeOperation::Call), Just(SafeOperation::DelegateCall)],
        ) {
            let original = SignableBundle {
                to: Address::new("0x5564550a54ecd43ba8f7c666fff1c4762889a572"),
                value,
                data,
                operation: op,
                safe_tx_gas: gas,
                safe_tx_hash: hash,
            };
            let decoded = decode_signable(&encode_signable(&original).unwrap()).unwrap();
            prop_assert_eq!(decoded, original);
        }
    }
}
