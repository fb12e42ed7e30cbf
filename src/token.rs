//! ERC-20 metadata reads

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, U256};
use serde::Serialize;

use crate::abi::{Abis, FN_ALLOWANCE, FN_BALANCE_OF, FN_DECIMALS, FN_SYMBOL};
use crate::amounts::format_units;
use crate::chain::value_helpers::{as_string, as_u8, as_uint, first};
use crate::chain::ContractReader;
use crate::error::Result;

/// Token metadata shown next to the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub decimals: u8,
    pub balance: U256,
}

impl TokenInfo {
    pub fn formatted_balance(&self) -> String {
        format_units(self.balance, self.decimals)
    }
}

/// Read symbol, decimals and the account's balance
pub async fn fetch_token_info(
    reader: &dyn ContractReader,
    abis: &Abis,
    token: Address,
    account: Address,
) -> Result<TokenInfo> {
    let symbol = reader.read(&abis.erc20, token, FN_SYMBOL, &[]).await?;
    let decimals = read_decimals(reader, abis, token).await?;
    let balance = reader
        .read(&abis.erc20, token, FN_BALANCE_OF, &[DynSolValue::Address(account)])
        .await?;

    Ok(TokenInfo {
        symbol: as_string(first(&symbol)?)?,
        decimals,
        balance: as_uint(first(&balance)?)?,
    })
}

pub async fn read_decimals(reader: &dyn ContractReader, abis: &Abis, token: Address) -> Result<u8> {
    let values = reader.read(&abis.erc20, token, FN_DECIMALS, &[]).await?;
    as_u8(first(&values)?)
}

/// Current allowance of `owner` toward `spender`
pub async fn read_allowance(
    reader: &dyn ContractReader,
    abis: &Abis,
    token: Address,
    owner: Address,
    spender: Address,
) -> Result<U256> {
    let values = reader
        .read(
            &abis.erc20,
            token,
            FN_ALLOWANCE,
            &[DynSolValue::Address(owner), DynSolValue::Address(spender)],
        )
        .await?;
    as_uint(first(&values)?)
}
