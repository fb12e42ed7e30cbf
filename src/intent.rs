//! Transaction intent: the validated, immutable input of one airdrop

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, U256};
use serde::Serialize;
use std::str::FromStr;

use crate::amounts::{parse_units, split_entries};
use crate::error::{AirdropError, Result};

/// Everything an `airdropERC20` call needs, built once per submission.
///
/// `total_amount` is always the exact sum of `amounts`, and is the value used
/// for both the approval and the airdrop call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionIntent {
    token_address: Address,
    recipients: Vec<Address>,
    amounts: Vec<U256>,
    total_amount: U256,
}

impl TransactionIntent {
    /// Build from the raw form fields.
    ///
    /// Recipients and amounts use the same delimiter rule as the amount
    /// parser. Amounts are converted with the token's `decimals`.
    pub fn build(token_address: &str, recipients: &str, amounts: &str, decimals: u8) -> Result<Self> {
        let token_address = parse_address(token_address, "token")?;

        let recipients = split_entries(recipients)
            .into_iter()
            .map(|entry| parse_address(entry, "recipient"))
            .collect::<Result<Vec<_>>>()?;

        let amounts = split_entries(amounts)
            .into_iter()
            .map(|entry| parse_units(entry, decimals))
            .collect::<Result<Vec<_>>>()?;

        Self::new(token_address, recipients, amounts)
    }

    /// Build from already converted values
    pub fn new(token_address: Address, recipients: Vec<Address>, amounts: Vec<U256>) -> Result<Self> {
        if recipients.is_empty() {
            return Err(AirdropError::InvalidInput("No recipients given".to_string()));
        }
        if recipients.len() != amounts.len() {
            return Err(AirdropError::InvalidInput(format!(
                "{} recipients but {} amounts",
                recipients.len(),
                amounts.len()
            )));
        }

        let total_amount = amounts
            .iter()
            .try_fold(U256::ZERO, |sum, amount| sum.checked_add(*amount))
            .ok_or_else(|| AirdropError::InvalidInput("Total amount overflows uint256".to_string()))?;

        Ok(Self {
            token_address,
            recipients,
            amounts,
            total_amount,
        })
    }

    pub fn token_address(&self) -> Address {
        self.token_address
    }

    pub fn recipients(&self) -> &[Address] {
        &self.recipients
    }

    pub fn amounts(&self) -> &[U256] {
        &self.amounts
    }

    pub fn total_amount(&self) -> U256 {
        self.total_amount
    }

    /// Positional `airdropERC20(token, recipients, amounts, total)` arguments
    pub fn airdrop_args(&self) -> Vec<DynSolValue> {
        vec![
            DynSolValue::Address(self.token_address),
            DynSolValue::Array(self.recipients.iter().copied().map(DynSolValue::Address).collect()),
            DynSolValue::Array(self.amounts.iter().map(|amount| DynSolValue::Uint(*amount, 256)).collect()),
            DynSolValue::Uint(self.total_amount, 256),
        ]
    }
}

pub(crate) fn parse_address(value: &str, what: &str) -> Result<Address> {
    let value = value.trim();
    Address::from_str(value)
        .map_err(|e| AirdropError::InvalidInput(format!("Invalid {} address '{}': {}", what, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "0x1111111111111111111111111111111111111111";

    #[test]
    fn test_build_sums_exact_units() {
        let intent = TransactionIntent::build(
            TOKEN,
            "0x2222222222222222222222222222222222222222,\n0x3333333333333333333333333333333333333333",
            "1.5\n0.25",
            18,
        )
        .unwrap();

        assert_eq!(intent.token_address(), Address::repeat_byte(0x11));
        assert_eq!(
            intent.recipients(),
            &[Address::repeat_byte(0x22), Address::repeat_byte(0x33)]
        );
        assert_eq!(
            intent.amounts(),
            &[
                U256::from(1_500_000_000_000_000_000u128),
                U256::from(250_000_000_000_000_000u128)
            ]
        );
        assert_eq!(intent.total_amount(), U256::from(1_750_000_000_000_000_000u128));
    }

    #[test]
    fn test_total_matches_sum_after_flooring() {
        let intent = TransactionIntent::build(
            TOKEN,
            "0x2222222222222222222222222222222222222222, 0x3333333333333333333333333333333333333333, 0x4444444444444444444444444444444444444444",
            "0.3333333, 0.3333333, 0.3333333",
            6,
        )
        .unwrap();

        let sum = intent.amounts().iter().fold(U256::ZERO, |acc, a| acc + *a);
        assert_eq!(intent.total_amount(), sum);
        assert_eq!(intent.total_amount(), U256::from(999_999u64));
    }

    #[test]
    fn test_count_mismatch_is_rejected() {
        let result = TransactionIntent::build(
            TOKEN,
            "0x2222222222222222222222222222222222222222",
            "1, 2",
            18,
        );
        assert!(matches!(result, Err(AirdropError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_entries_are_rejected() {
        let bad_recipient = TransactionIntent::build(TOKEN, "0x1234", "1", 18);
        assert!(matches!(bad_recipient, Err(AirdropError::InvalidInput(_))));

        let bad_amount = TransactionIntent::build(
            TOKEN,
            "0x2222222222222222222222222222222222222222",
            "100abc",
            18,
        );
        assert!(matches!(bad_amount, Err(AirdropError::InvalidInput(_))));

        let bad_token = TransactionIntent::build("", "0x2222222222222222222222222222222222222222", "1", 18);
        assert!(matches!(bad_token, Err(AirdropError::InvalidInput(_))));

        let empty = TransactionIntent::build(TOKEN, ",\n", "", 18);
        assert!(matches!(empty, Err(AirdropError::InvalidInput(_))));
    }

    #[test]
    fn test_airdrop_args_are_positional() {
        let intent = TransactionIntent::new(
            Address::repeat_byte(0x11),
            vec![Address::repeat_byte(0x22)],
            vec![U256::from(5u8)],
        )
        .unwrap();

        let args = intent.airdrop_args();
        assert_eq!(args.len(), 4);
        assert_eq!(args[0], DynSolValue::Address(Address::repeat_byte(0x11)));
        assert_eq!(args[1], DynSolValue::Array(vec![DynSolValue::Address(Address::repeat_byte(0x22))]));
        assert_eq!(args[2], DynSolValue::Array(vec![DynSolValue::Uint(U256::from(5u8), 256)]));
        assert_eq!(args[3], DynSolValue::Uint(U256::from(5u8), 256));
    }
}
