//! Coin selection for funding and spending swap outputs

use crate::constants::*;
use crate::error::{Result, SwapError};
use crate::fee::{estimate_fee, input_cost};
use crate::types::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Selector configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Change below this value is left to the fee instead of creating an output.
    /// The effective threshold is never below the cost of spending one input.
    pub dust_limit: Integer,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self { dust_limit: DUST_LIMIT }
    }
}

/// Stateless coin selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoinSelector {
    config: SelectorConfig,
}

/// Parameters shared by every strategy of one selection call
struct Request<'a> {
    targets: &'a [Target],
    target_value: Integer,
    fee_rate: f64,
    input_cost: Integer,
    dust_threshold: Integer,
}

impl Request<'_> {
    /// Targets plus `fee`
    fn needed(&self, fee: Integer) -> Integer {
        self.target_value.saturating_add(fee)
    }
}

impl CoinSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SelectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Select inputs covering `targets` plus fee at `fee_rate` sat/byte
    ///
    /// When `pinned` is non-empty every pinned input is spent and the pool is
    /// drawn from in order until the need is covered. Otherwise the pool is
    /// searched for a change-free combination first, falling back to
    /// accumulating the largest inputs.
    pub fn select(
        &self,
        utxos: &[Utxo],
        targets: &[Target],
        fee_rate: f64,
        pinned: &[Utxo],
    ) -> Result<SelectionResult> {
        let target_value = validate_targets(targets)?;
        validate_utxos(utxos)?;
        validate_utxos(pinned)?;

        let input_cost = input_cost(fee_rate)?;
        let request = Request {
            targets,
            target_value,
            fee_rate,
            input_cost,
            dust_threshold: self.config.dust_limit.max(input_cost),
        };

        if !pinned.is_empty() {
            let mut candidates = dedup_outpoints(pinned.iter());
            let pinned_count = candidates.len();
            let pool = dedup_outpoints(
                utxos
                    .iter()
                    .filter(|u| !candidates.iter().any(|p| p.same_outpoint(u))),
            );
            candidates.extend(pool);
            debug!(
                pinned = pinned_count,
                pool = candidates.len() - pinned_count,
                target_value,
                "accumulative selection with pinned inputs"
            );
            return accumulate(&candidates, pinned_count, &request);
        }

        // Input cost is the same for every candidate, so ordering by value
        // is ordering by effective value. The sort is stable for ties.
        let mut candidates = dedup_outpoints(utxos.iter());
        candidates.sort_by(|a, b| b.value.cmp(&a.value));

        if let Some(result) = blackjack(&candidates, &request)? {
            debug!(inputs = result.inputs.len(), fee = result.fee, "change-free selection");
            return Ok(result);
        }
        debug!(candidates = candidates.len(), "falling back to accumulative selection");
        accumulate(&candidates, 0, &request)
    }
}

/// Select with the default configuration
pub fn select_coins(
    utxos: &[Utxo],
    targets: &[Target],
    fee_rate: f64,
    pinned: &[Utxo],
) -> Result<SelectionResult> {
    CoinSelector::new().select(utxos, targets, fee_rate, pinned)
}

fn validate_targets(targets: &[Target]) -> Result<Integer> {
    let mut total: Integer = 0;
    for (i, target) in targets.iter().enumerate() {
        if target.value <= 0 {
            return Err(SwapError::InvalidTarget(format!(
                "target {} has non-positive value {}",
                i, target.value
            )));
        }
        total = total
            .checked_add(target.value)
            .ok_or_else(|| SwapError::InvalidTarget("target total overflows".to_string()))?;
    }
    Ok(total)
}

fn validate_utxos(utxos: &[Utxo]) -> Result<()> {
    let mut total: Integer = 0;
    for utxo in utxos {
        if utxo.value < 0 {
            return Err(SwapError::InvalidUtxo(format!(
                "{}:{} has negative value {}",
                hex::encode(utxo.txid),
                utxo.vout,
                utxo.value
            )));
        }
        total = total
            .checked_add(utxo.value)
            .ok_or_else(|| SwapError::InvalidUtxo("UTXO total overflows".to_string()))?;
    }
    Ok(())
}

/// Keep the first occurrence of each (txid, vout)
fn dedup_outpoints<'a>(utxos: impl Iterator<Item = &'a Utxo>) -> Vec<Utxo> {
    let mut unique: Vec<Utxo> = Vec::new();
    for utxo in utxos {
        if !unique.iter().any(|u| u.same_outpoint(utxo)) {
            unique.push(utxo.clone());
        }
    }
    unique
}

/// Accumulative strategy
///
/// The first `pinned_count` candidates are always taken. Remaining candidates
/// are added in order, skipping any that cannot pay for their own input,
/// until Σ inputs ≥ targets + fee(inputs, outputs).
fn accumulate(candidates: &[Utxo], pinned_count: usize, request: &Request) -> Result<SelectionResult> {
    let num_outputs = request.targets.len();
    let mut selected: Vec<Utxo> = Vec::new();
    let mut total: Integer = 0;

    for (i, utxo) in candidates.iter().enumerate() {
        let is_pinned = i < pinned_count;
        if !is_pinned && utxo.value < request.input_cost {
            continue;
        }
        selected.push(utxo.clone());
        total = total.saturating_add(utxo.value);

        if i + 1 < pinned_count {
            continue;
        }
        let fee = estimate_fee(selected.len(), num_outputs, request.fee_rate)?;
        if total >= request.needed(fee) {
            return finalize(selected, request);
        }
    }

    let fee = estimate_fee(selected.len(), num_outputs, request.fee_rate)?;
    Err(SwapError::InsufficientFunds {
        needed: request.needed(fee),
        available: total,
    })
}

/// Change-avoiding strategy
///
/// Adds candidates only while the running total stays within the dust
/// threshold of targets + fee, so a hit leaves no change worth creating.
fn blackjack(candidates: &[Utxo], request: &Request) -> Result<Option<SelectionResult>> {
    let num_outputs = request.targets.len();
    let mut selected: Vec<Utxo> = Vec::new();
    let mut total: Integer = 0;

    for utxo in candidates {
        if utxo.value < request.input_cost {
            continue;
        }
        // Ceiling is priced with this candidate counted as an input
        let fee = estimate_fee(selected.len() + 1, num_outputs, request.fee_rate)?;
        let ceiling = request.needed(fee).saturating_add(request.dust_threshold);
        if total.saturating_add(utxo.value) > ceiling {
            continue;
        }
        selected.push(utxo.clone());
        total = total.saturating_add(utxo.value);

        let fee = estimate_fee(selected.len(), num_outputs, request.fee_rate)?;
        if total >= request.needed(fee) {
            return finalize(selected, request).map(Some);
        }
    }
    Ok(None)
}

/// Build the result from the realized input and output counts
///
/// A change output is added when what is left after paying for it exceeds
/// the dust threshold; otherwise the leftover goes to the fee.
fn finalize(inputs: Vec<Utxo>, request: &Request) -> Result<SelectionResult> {
    let num_outputs = request.targets.len();
    let input_value = inputs.iter().fold(0 as Integer, |acc, u| acc.saturating_add(u.value));
    let fee = estimate_fee(inputs.len(), num_outputs, request.fee_rate)?;
    if input_value < request.needed(fee) {
        return Err(SwapError::InsufficientFunds {
            needed: request.needed(fee),
            available: input_value,
        });
    }

    let mut outputs: Vec<Output> = request.targets.iter().map(Output::from).collect();
    let fee_with_change = estimate_fee(inputs.len(), num_outputs + 1, request.fee_rate)?;
    let remainder = input_value - request.target_value - fee_with_change;

    let fee = if remainder > request.dust_threshold {
        outputs.push(Output::change(remainder));
        fee_with_change
    } else {
        input_value - request.target_value
    };

    debug!(
        inputs = inputs.len(),
        outputs = outputs.len(),
        input_value,
        fee,
        change = remainder > request.dust_threshold,
        "selection finalized"
    );

    Ok(SelectionResult { inputs, outputs, fee })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utxo(id: u8, value: Integer) -> Utxo {
        Utxo { txid: [id; 32], vout: 0, value }
    }

    fn target(value: Integer) -> Target {
        Target { script_pubkey: vec![0x76, 0xa9], value }
    }

    #[test]
    fn test_select_exact_match_without_change() {
        // 1 in, 1 out at 1 sat/byte costs 192
        let utxos = vec![utxo(1, 10_192)];
        let result = select_coins(&utxos, &[target(10_000)], 1.0, &[]).unwrap();
        assert_eq!(result.inputs.len(), 1);
        assert_eq!(result.outputs.len(), 1);
        assert_eq!(result.fee, 192);
        assert!(result.change().is_none());
    }

    #[test]
    fn test_blackjack_ceiling_counts_candidate_input() {
        // rate 4: fee(1,1) = 768, dust threshold = input cost = 592.
        // 11000 is within 10000 + 768 + 592 and leaves no change.
        let utxos = vec![utxo(1, 50_000), utxo(2, 11_000)];
        let result = select_coins(&utxos, &[target(10_000)], 4.0, &[]).unwrap();
        assert_eq!(result.inputs, vec![utxos[1].clone()]);
        assert!(result.change().is_none());
        assert_eq!(result.fee, 1_000);
    }

    #[test]
    fn test_select_adds_change_above_dust() {
        let utxos = vec![utxo(1, 100_000)];
        let result = select_coins(&utxos, &[target(10_000)], 1.0, &[]).unwrap();
        // 1 in, 2 out = 226 bytes
        assert_eq!(result.fee, 226);
        let change = result.change().unwrap();
        assert_eq!(change.value, 100_000 - 10_000 - 226);
        assert_eq!(result.input_value(), result.output_value() + result.fee);
    }

    #[test]
    fn test_select_absorbs_dust_into_fee() {
        // Leftover after change output would be 300 < 546
        let utxos = vec![utxo(1, 10_000 + 226 + 300)];
        let result = select_coins(&utxos, &[target(10_000)], 1.0, &[]).unwrap();
        assert!(result.change().is_none());
        assert_eq!(result.fee, 226 + 300);
        assert_eq!(result.input_value(), result.output_value() + result.fee);
    }

    #[test]
    fn test_select_insufficient_funds() {
        let utxos = vec![utxo(1, 5_000), utxo(2, 4_000)];
        let err = select_coins(&utxos, &[target(10_000)], 1.0, &[]).unwrap_err();
        assert!(matches!(err, SwapError::InsufficientFunds { available: 9_000, .. }));
    }

    #[test]
    fn test_select_rejects_non_positive_targets() {
        let utxos = vec![utxo(1, 100_000)];
        assert!(matches!(
            select_coins(&utxos, &[target(0)], 1.0, &[]),
            Err(SwapError::InvalidTarget(_))
        ));
        assert!(matches!(
            select_coins(&utxos, &[target(-5)], 1.0, &[]),
            Err(SwapError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_select_rejects_negative_utxo() {
        let utxos = vec![utxo(1, -1)];
        assert!(matches!(
            select_coins(&utxos, &[target(1_000)], 1.0, &[]),
            Err(SwapError::InvalidUtxo(_))
        ));
    }

    #[test]
    fn test_pinned_inputs_always_included() {
        let pinned = vec![utxo(9, 1_000)];
        let pool = vec![utxo(1, 1_000_000)];
        let result = select_coins(&pool, &[target(50_000)], 1.0, &pinned).unwrap();
        assert_eq!(result.inputs[0], pinned[0]);
        assert_eq!(result.inputs.len(), 2);
    }

    #[test]
    fn test_pinned_inputs_deduplicated_against_pool() {
        let pinned = vec![utxo(1, 60_000)];
        let pool = vec![utxo(1, 60_000), utxo(2, 60_000)];
        let result = select_coins(&pool, &[target(50_000)], 1.0, &pinned).unwrap();
        assert_eq!(result.inputs, vec![utxo(1, 60_000)]);
    }

    #[test]
    fn test_all_pinned_taken_even_when_first_covers() {
        let pinned = vec![utxo(1, 100_000), utxo(2, 100_000)];
        let result = select_coins(&[], &[target(10_000)], 1.0, &pinned).unwrap();
        assert_eq!(result.inputs.len(), 2);
    }

    #[test]
    fn test_dust_limit_from_config() {
        // Leftover after change output is 1000
        let utxos = vec![utxo(1, 10_000 + 226 + 1_000)];
        let strict = CoinSelector::with_config(SelectorConfig { dust_limit: 2_000 });
        let result = strict.select(&utxos, &[target(10_000)], 1.0, &[]).unwrap();
        assert!(result.change().is_none());

        let lenient = CoinSelector::new();
        let result = lenient.select(&utxos, &[target(10_000)], 1.0, &[]).unwrap();
        assert_eq!(result.change().map(|o| o.value), Some(1_000));
    }

    #[test]
    fn test_selector_config_deserialize_defaults() {
        let config: SelectorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SelectorConfig::default());
        let config: SelectorConfig = serde_json::from_str(r#"{"dust_limit": 1000}"#).unwrap();
        assert_eq!(config.dust_limit, 1000);
    }
}
