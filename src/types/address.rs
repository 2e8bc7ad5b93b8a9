//! Bech32 account and contract addresses.
//!
//! Addresses travel through forms and wire messages as plain strings. The
//! helpers here are used by action validation to check that a string is a
//! well-formed bech32 address for the configured chain prefix.

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const GENERATOR: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];
const CHECKSUM_LEN: usize = 6;
const MAX_LEN: usize = 90;

/// Check that `address` is a bech32 address with the given human-readable
/// prefix and a 20-byte (account) or 32-byte (contract) payload.
///
/// # Errors
/// Returns the first problem found
pub fn validate_address(address: &str, prefix: &str) -> Result<(), AddressError> {
    let (hrp, bytes) = decode_address(address)?;
    if hrp != prefix.to_ascii_lowercase() {
        return Err(AddressError::WrongPrefix {
            expected: prefix.to_string(),
            found: hrp,
        });
    }
    if !matches!(bytes.len(), 20 | 32) {
        return Err(AddressError::InvalidLength(bytes.len()));
    }
    Ok(())
}

/// Encode raw bytes as a bech32 address
#[must_use]
pub fn encode_address(prefix: &str, bytes: &[u8]) -> String {
    let hrp = prefix.to_ascii_lowercase();
    let data = convert_bits(bytes, 8, 5, true).unwrap_or_default();

    let mut values = hrp_expand(&hrp);
    values.extend_from_slice(&data);
    values.extend_from_slice(&[0u8; CHECKSUM_LEN]);
    let modulus = polymod(&values) ^ 1;

    let mut out = hrp;
    out.push('1');
    for value in &data {
        out.push(CHARSET[*value as usize] as char);
    }
    for i in 0..CHECKSUM_LEN {
        let value = (modulus >> (5 * (5 - i))) & 31;
        out.push(CHARSET[value as usize] as char);
    }
    out
}

/// Decode a bech32 address into its lowercase prefix and payload bytes
///
/// # Errors
/// Returns error on malformed encoding or a bad checksum
pub fn decode_address(address: &str) -> Result<(String, Vec<u8>), AddressError> {
    if address.is_empty() {
        return Err(AddressError::Empty);
    }
    if address.len() > MAX_LEN {
        return Err(AddressError::TooLong(address.len()));
    }
    let has_lower = address.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = address.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(AddressError::MixedCase);
    }
    let address = address.to_ascii_lowercase();

    let separator = address.rfind('1').ok_or(AddressError::MissingSeparator)?;
    let (hrp, data_part) = (&address[..separator], &address[separator + 1..]);
    if hrp.is_empty() || data_part.len() < CHECKSUM_LEN {
        return Err(AddressError::MissingSeparator);
    }

    let mut data = Vec::with_capacity(data_part.len());
    for c in data_part.chars() {
        let value = CHARSET
            .iter()
            .position(|&b| b as char == c)
            .ok_or(AddressError::InvalidCharacter(c))?;
        data.push(value as u8);
    }

    let mut values = hrp_expand(hrp);
    values.extend_from_slice(&data);
    if polymod(&values) != 1 {
        return Err(AddressError::InvalidChecksum);
    }

    data.truncate(data.len() - CHECKSUM_LEN);
    let bytes = convert_bits(&data, 5, 8, false).ok_or(AddressError::InvalidPadding)?;
    Ok((hrp.to_string(), bytes))
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let mut out: Vec<u8> = hrp.bytes().map(|b| b >> 5).collect();
    out.push(0);
    out.extend(hrp.bytes().map(|b| b & 31));
    out
}

fn polymod(values: &[u8]) -> u32 {
    let mut chk: u32 = 1;
    for value in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(*value);
        for (i, generator) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= generator;
            }
        }
    }
    chk
}

fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Option<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max = (1u32 << to) - 1;
    let max_acc = (1u32 << (from + to - 1)) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);

    for value in data {
        let value = u32::from(*value);
        if value >> from != 0 {
            return None;
        }
        acc = ((acc << from) | value) & max_acc;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max) as u8);
        }
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max) != 0 {
        return None;
    }
    Some(out)
}

/// Address parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// Empty string
    #[error("address is empty")]
    Empty,
    /// Longer than bech32 allows
    #[error("address too long: {0} characters")]
    TooLong(usize),
    /// Mixed upper and lower case
    #[error("address mixes upper and lower case")]
    MixedCase,
    /// No `1` separator between prefix and data
    #[error("address has no prefix separator")]
    MissingSeparator,
    /// Character outside the bech32 alphabet
    #[error("invalid address character: {0:?}")]
    InvalidCharacter(char),
    /// Checksum does not verify
    #[error("invalid address checksum")]
    InvalidChecksum,
    /// Non-zero padding bits
    #[error("invalid address padding")]
    InvalidPadding,
    /// Prefix belongs to another chain
    #[error("wrong address prefix: expected {expected}, got {found}")]
    WrongPrefix {
        /// Configured prefix
        expected: String,
        /// Prefix found in the address
        found: String,
    },
    /// Payload is neither an account nor a contract address
    #[error("invalid address length: expected 20 or 32 bytes, got {0}")]
    InvalidLength(usize),
}
