//! Linear fee model for legacy transactions

use crate::constants::*;
use crate::error::{Result, SwapError};
use crate::types::*;

/// EstimateSize: ℕ × ℕ → ℕ
///
/// size = n_in × 148 + n_out × 34 + 10
pub fn estimate_size(num_inputs: usize, num_outputs: usize) -> Result<Natural> {
    let inputs = (num_inputs as Natural).checked_mul(INPUT_SIZE);
    let outputs = (num_outputs as Natural).checked_mul(OUTPUT_SIZE);
    inputs
        .zip(outputs)
        .and_then(|(i, o)| i.checked_add(o))
        .and_then(|s| s.checked_add(TX_OVERHEAD_SIZE))
        .ok_or_else(|| {
            SwapError::InvalidFeeRate(format!(
                "size of {} inputs and {} outputs overflows",
                num_inputs, num_outputs
            ))
        })
}

/// Round a fee rate up to whole satoshis per byte
///
/// Rejects negative, NaN and infinite rates.
pub fn ceil_fee_rate(fee_rate: f64) -> Result<Natural> {
    if !fee_rate.is_finite() || fee_rate < 0.0 {
        return Err(SwapError::InvalidFeeRate(format!("{}", fee_rate)));
    }
    let rate = fee_rate.ceil();
    if rate > Natural::MAX as f64 {
        return Err(SwapError::InvalidFeeRate(format!("{} out of range", fee_rate)));
    }
    Ok(rate as Natural)
}

/// EstimateFee: ℕ × ℕ × ℝ≥0 → ℕ
///
/// fee = (n_in × 148 + n_out × 34 + 10) × ⌈rate⌉
///
/// The rate is rounded up so the transaction never pays below it.
pub fn estimate_fee(num_inputs: usize, num_outputs: usize, fee_rate: f64) -> Result<Integer> {
    let rate = ceil_fee_rate(fee_rate)?;
    let size = estimate_size(num_inputs, num_outputs)?;
    size.checked_mul(rate)
        .and_then(|fee| Integer::try_from(fee).ok())
        .ok_or_else(|| {
            SwapError::InvalidFeeRate(format!(
                "fee for {} bytes at {} sat/byte overflows",
                size, rate
            ))
        })
}

/// Fee for one additional input at the given rate
///
/// An output worth less than this costs more to spend than it carries.
pub fn input_cost(fee_rate: f64) -> Result<Integer> {
    let rate = ceil_fee_rate(fee_rate)?;
    INPUT_SIZE
        .checked_mul(rate)
        .and_then(|cost| Integer::try_from(cost).ok())
        .ok_or_else(|| SwapError::InvalidFeeRate(format!("{} out of range", fee_rate)))
}
