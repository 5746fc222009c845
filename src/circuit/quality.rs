//! Three-sigma data-quality circuit (the echain statement family).
//!
//! A prior observation state supplies `mu` and `sigma`; the prover knows a
//! quality score `value` and publishes the two observation points
//! `out_one = (value - mu) - 3*sigma` and `out_two = (value - mu) + 3*sigma`.
//! The proof attests both outputs were derived from the same hidden score
//! without revealing it.

use crate::constants::SIGMA_MULTIPLIER;
use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

#[derive(Clone, Debug)]
pub struct QualityCircuit {
    /// Witness: the raw quality score.
    pub value: Fr,
    /// Witness: distribution mean.
    pub mu: Fr,
    /// Witness: distribution deviation.
    pub sigma: Fr,
    /// Public: `(value - mu) - 3*sigma`.
    pub out_one: Fr,
    /// Public: `(value - mu) + 3*sigma`.
    pub out_two: Fr,
}

impl QualityCircuit {
    pub fn new(mu: u64, sigma: u64, value: u64) -> Self {
        let (mu, sigma, value) = (Fr::from(mu), Fr::from(sigma), Fr::from(value));
        let spread = Fr::from(SIGMA_MULTIPLIER) * sigma;
        let centered = value - mu;
        Self {
            value,
            mu,
            sigma,
            out_one: centered - spread,
            out_two: centered + spread,
        }
    }

    pub(crate) fn blank() -> Self {
        Self::new(0, 0, 0)
    }
}

impl ConstraintSynthesizer<Fr> for QualityCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let out_one = FpVar::<Fr>::new_input(cs.clone(), || Ok(self.out_one))?;
        let out_two = FpVar::<Fr>::new_input(cs.clone(), || Ok(self.out_two))?;

        let value = FpVar::<Fr>::new_witness(cs.clone(), || Ok(self.value))?;
        let mu = FpVar::<Fr>::new_witness(cs.clone(), || Ok(self.mu))?;
        let sigma = FpVar::<Fr>::new_witness(cs, || Ok(self.sigma))?;

        let spread = &sigma * &FpVar::constant(Fr::from(SIGMA_MULTIPLIER));
        let centered = &value - &mu;

        (&centered - &spread).enforce_equal(&out_one)?;
        (&centered + &spread).enforce_equal(&out_two)?;
        Ok(())
    }
}
