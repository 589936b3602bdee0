//! Core types shared by the string and tree kernel engines.

use std::fmt::Debug;
use std::hash::Hash;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};

/// A symbol a sequence kernel can compare: characters, tokens, ids.
pub trait Symbol: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

impl<T> Symbol for T where T: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

/// Default bound on recursion depth for the recursive kernel forms.
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 512;

/// Default bound on the number of enumerated candidates in brute-force forms.
pub const DEFAULT_MAX_ENUMERATION: usize = 1_000_000;

/// Resource bounds for recursive and enumerating kernel forms.
///
/// Exceeding a bound yields [`KernelError::ResourceExhausted`], after which
/// the caller can switch to a dynamic-programming formulation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelLimits {
    /// Deepest recursion a recursive kernel form may reach
    pub max_recursion_depth: usize,
    /// Largest number of candidates a brute-force form may enumerate
    pub max_enumeration: usize,
}

impl KernelLimits {
    /// Create default limits
    pub fn new() -> Self {
        Self {
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            max_enumeration: DEFAULT_MAX_ENUMERATION,
        }
    }

    /// Set maximum recursion depth
    pub fn with_max_recursion_depth(mut self, depth: usize) -> Result<Self> {
        if depth == 0 {
            return Err(KernelError::invalid_parameter(
                "max_recursion_depth",
                depth,
                "recursion depth bound must be positive",
            ));
        }
        self.max_recursion_depth = depth;
        Ok(self)
    }

    /// Set maximum enumeration size
    pub fn with_max_enumeration(mut self, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(KernelError::invalid_parameter(
                "max_enumeration",
                count,
                "enumeration bound must be positive",
            ));
        }
        self.max_enumeration = count;
        Ok(self)
    }

    pub(crate) fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_recursion_depth {
            tracing::warn!(
                depth,
                limit = self.max_recursion_depth,
                "recursion depth limit reached"
            );
            return Err(KernelError::ResourceExhausted {
                resource: "recursion depth".to_string(),
                limit: self.max_recursion_depth,
            });
        }
        Ok(())
    }

    pub(crate) fn check_enumeration(&self, count: usize) -> Result<()> {
        if count > self.max_enumeration {
            tracing::warn!(
                count,
                limit = self.max_enumeration,
                "enumeration limit reached"
            );
            return Err(KernelError::ResourceExhausted {
                resource: "enumeration size".to_string(),
                limit: self.max_enumeration,
            });
        }
        Ok(())
    }
}

impl Default for KernelLimits {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject negative or non-finite decay weights.
pub(crate) fn validate_decay(decay: f64) -> Result<()> {
    if !decay.is_finite() || decay < 0.0 {
        return Err(KernelError::invalid_parameter(
            "decay",
            decay,
            "decay must be a finite non-negative number",
        ));
    }
    Ok(())
}

/// Cosine normalisation `k(x,y) / sqrt(k(x,x) k(y,y))`, 0 when undefined.
pub fn cosine_normalize(kxy: f64, kxx: f64, kyy: f64) -> f64 {
    let norm = (kxx * kyy).sqrt();
    if norm > 0.0 {
        kxy / norm
    } else {
        0.0
    }
}

/// Trait for kernels over structured inputs (sequences, trees).
///
/// Kernels map pairs of inputs to non-negative scalar similarity values
/// usable as Gram matrix entries.
pub trait StructuredKernel: Send + Sync {
    /// The structure this kernel compares
    type Input: Sync;

    /// Compute kernel value between two inputs.
    fn compute(&self, x: &Self::Input, y: &Self::Input) -> Result<f64>;

    /// Compute the symmetric kernel matrix for a set of inputs.
    ///
    /// Only the upper triangle is evaluated; rows run in parallel and every
    /// entry lands in its own slot, so the result does not depend on
    /// scheduling.
    fn compute_matrix(&self, inputs: &[Self::Input]) -> Result<Vec<Vec<f64>>> {
        let n = inputs.len();
        let upper = (0..n)
            .into_par_iter()
            .map(|i| {
                (i..n)
                    .map(|j| self.compute(&inputs[i], &inputs[j]))
                    .collect::<Result<Vec<f64>>>()
            })
            .collect::<Result<Vec<Vec<f64>>>>()?;

        let mut matrix = vec![vec![0.0; n]; n];
        for (i, row) in upper.into_iter().enumerate() {
            for (offset, value) in row.into_iter().enumerate() {
                let j = i + offset;
                matrix[i][j] = value;
                matrix[j][i] = value;
            }
        }
        Ok(matrix)
    }

    /// Get kernel name for identification.
    fn name(&self) -> &str;

    /// Check if kernel is positive semi-definite.
    fn is_psd(&self) -> bool {
        true
    }
}
