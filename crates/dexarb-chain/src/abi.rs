//! Call encoding and return decoding for the handful of view calls the
//! reader makes.

use alloy_sol_types::{sol, SolCall};

use crate::error::ChainError;

sol! {
    interface IUniswapV2Pair {
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
        function token0() external view returns (address);
        function token1() external view returns (address);
    }

    interface IERC20Metadata {
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }

    // Legacy tokens (MKR, SAI) return the symbol as a fixed word.
    interface IERC20Bytes32Symbol {
        function symbol() external view returns (bytes32);
    }
}

const WORD: usize = 32;

/// `0x`-prefixed calldata for `call`.
pub fn calldata<C: SolCall>(call: &C) -> String {
    format!("0x{}", hex::encode(call.abi_encode()))
}

/// Decode a `0x`-prefixed hex result into bytes.
pub fn decode_hex(result: &str) -> Result<Vec<u8>, ChainError> {
    let digits = result.trim().trim_start_matches("0x");
    Ok(hex::decode(digits)?)
}

/// `getReserves()` output as `(reserve0, reserve1)`.
pub fn decode_reserves(data: &[u8]) -> Result<(u128, u128), ChainError> {
    let reserves = IUniswapV2Pair::getReservesCall::abi_decode_returns(data)?;
    let narrow = |value| {
        u128::try_from(value)
            .map_err(|_| ChainError::Decode("reserve exceeds 128 bits".to_string()))
    };
    Ok((narrow(reserves.reserve0)?, narrow(reserves.reserve1)?))
}

/// `token0()` / `token1()` output, lower-case hex with `0x` prefix.
pub fn decode_address(data: &[u8]) -> Result<String, ChainError> {
    let address = IUniswapV2Pair::token0Call::abi_decode_returns(data)?;
    Ok(format!("0x{}", hex::encode(address.as_slice())))
}

pub fn decode_decimals(data: &[u8]) -> Result<u32, ChainError> {
    let decimals = IERC20Metadata::decimalsCall::abi_decode_returns(data)?;
    Ok(u32::from(decimals))
}

/// A `symbol()` return value. A result that is exactly one word is read as a
/// NUL-padded `bytes32` instead of a dynamic `string`.
pub fn decode_symbol(data: &[u8]) -> Result<String, ChainError> {
    if data.len() == WORD {
        let word = IERC20Bytes32Symbol::symbolCall::abi_decode_returns(data)?;
        let bytes = word.as_slice();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        return String::from_utf8(bytes[..end].to_vec())
            .map_err(|e| ChainError::Decode(e.to_string()));
    }
    Ok(IERC20Metadata::symbolCall::abi_decode_returns(data)?)
}
