//! Masking-equality circuits.
//!
//! The masking relation is modular addition over the scalar field:
//! `masked_value = value + mask (mod r)`. Only the masked value is public;
//! the raw value and the mask stay witnesses.

use crate::error::ProofError;
use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

/// One masking instance: proves knowledge of `value` and `mask` with
/// `value + mask == masked_value`.
#[derive(Clone, Debug)]
pub struct MaskCircuit {
    /// Witness.
    pub value: Fr,
    /// Witness.
    pub mask: Fr,
    /// Public input.
    pub masked_value: Fr,
}

impl MaskCircuit {
    pub fn new(value: u64, mask: u64, masked_value: u64) -> Self {
        Self {
            value: Fr::from(value),
            mask: Fr::from(mask),
            masked_value: Fr::from(masked_value),
        }
    }

    /// Shape-only instance used for key generation. The circuit template is
    /// independent of the assignment, so any satisfying values do.
    pub(crate) fn blank() -> Self {
        Self::new(0, 0, 0)
    }
}

impl ConstraintSynthesizer<Fr> for MaskCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let masked = FpVar::<Fr>::new_input(cs.clone(), || Ok(self.masked_value))?;
        let value = FpVar::<Fr>::new_witness(cs.clone(), || Ok(self.value))?;
        let mask = FpVar::<Fr>::new_witness(cs, || Ok(self.mask))?;

        (&value + &mask).enforce_equal(&masked)?;
        Ok(())
    }
}

/// `count` masking instances folded into one constraint system, proved and
/// verified in a single pass.
///
/// Element order is index-for-index across the three arrays. Reordering one
/// array independently silently changes the statement being proved; field
/// elements alone cannot reveal the intended pairing, so this is a caller
/// obligation, not something the circuit can detect.
#[derive(Clone, Debug)]
pub struct BatchMaskCircuit {
    values: Vec<Fr>,
    masks: Vec<Fr>,
    masked_values: Vec<Fr>,
}

impl BatchMaskCircuit {
    /// Builds the folded circuit, rejecting empty batches and length
    /// disagreements before any field arithmetic happens.
    pub fn new(values: &[u64], masks: &[u64], masked_values: &[u64]) -> Result<Self, ProofError> {
        let count = values.len();
        if count == 0 {
            return Err(ProofError::ArityMismatch { expected: 1, got: 0 });
        }
        for got in [masks.len(), masked_values.len()] {
            if got != count {
                return Err(ProofError::ArityMismatch { expected: count, got });
            }
        }
        Ok(Self {
            values: values.iter().copied().map(Fr::from).collect(),
            masks: masks.iter().copied().map(Fr::from).collect(),
            masked_values: masked_values.iter().copied().map(Fr::from).collect(),
        })
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn blank(count: usize) -> Self {
        Self {
            values: vec![Fr::from(0u64); count],
            masks: vec![Fr::from(0u64); count],
            masked_values: vec![Fr::from(0u64); count],
        }
    }
}

impl ConstraintSynthesizer<Fr> for BatchMaskCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // Public inputs first, in index order.
        let mut masked = Vec::with_capacity(self.masked_values.len());
        for mv in &self.masked_values {
            masked.push(FpVar::<Fr>::new_input(cs.clone(), || Ok(*mv))?);
        }

        for ((v, m), mv) in self.values.iter().zip(&self.masks).zip(&masked) {
            let value = FpVar::<Fr>::new_witness(cs.clone(), || Ok(*v))?;
            let mask = FpVar::<Fr>::new_witness(cs.clone(), || Ok(*m))?;
            (&value + &mask).enforce_equal(mv)?;
        }
        Ok(())
    }
}
