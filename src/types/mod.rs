//! Primitive value types shared by the codec and the actions.

pub mod address;
pub mod amount;
pub mod coin;

pub use address::{decode_address, encode_address, validate_address, AddressError};
pub use amount::{Amount, AmountError, MAX_DECIMALS};
pub use coin::{Coin, Uint128};
