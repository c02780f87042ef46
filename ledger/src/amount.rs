//! Amounts and the fee schedule.
//!
//! Amounts are integer base units with two fixed decimal places
//! (`UNITS_PER_COIN = 100`), so canonical encodings never contain floats.

/// Token amount in base units.
pub type Amount = u64;

pub const UNITS_PER_COIN: Amount = 100;

/// Percentage charged on top of every coin transfer.
pub const COIN_FEE_PERCENT: u128 = 3;

/// Cost of one character of a message transaction.
pub const MESSAGE_CHAR_COST: Amount = UNITS_PER_COIN;

/// `n` whole coins in base units.
pub const fn coins(n: u64) -> Amount {
    n.saturating_mul(UNITS_PER_COIN)
}

/// Fee charged for transferring `amount`, rounded up to the next base unit.
pub fn coin_fee(amount: Amount) -> u128 {
    (amount as u128 * COIN_FEE_PERCENT).div_ceil(100)
}

/// Total debit of a coin transfer: `amount` plus its fee.
pub fn coin_transfer_cost(amount: Amount) -> u128 {
    amount as u128 + coin_fee(amount)
}

/// Debit of a message transaction: one coin per character.
pub fn message_cost(message: &str) -> u128 {
    message.chars().count() as u128 * MESSAGE_CHAR_COST as u128
}

/// Renders base units as a decimal coin amount, e.g. `1030` as `"10.30"`.
pub fn format_amount(amount: Amount) -> String {
    format!("{}.{:02}", amount / UNITS_PER_COIN, amount % UNITS_PER_COIN)
}
