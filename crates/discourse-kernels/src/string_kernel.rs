//! Memoizing engine behind the recursive string kernels.
//!
//! The recursive kernel forms (p-suffix, all-subsequences, fixed-length and
//! gap-weighted subsequences) revisit the same argument tuples many times.
//! [`StringKernelEngine`] routes every recursive step through a pair of
//! [`MemoCache`]s keyed by the exact arguments, and enforces the recursion
//! depth bound from [`KernelLimits`].
//!
//! The kernels themselves live in [`crate::spectrum_kernel`] and
//! [`crate::subsequence_kernel`].

use std::sync::Arc;

use crate::cache::MemoCache;
use crate::error::Result;
use crate::types::{KernelLimits, Symbol};

/// Which recursive kernel a memo entry belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemoKind {
    /// `p_suffix_kernel(s, t, p, decay)`
    PSuffix,
    /// `all_subsequences_kernel(s, t)`
    AllSubsequences,
    /// `fixed_length_subsequences_kernel(s, t, p)`
    FixedLength,
    /// Suffix term of the gap-weighted recursion
    GapWeightedSuffix,
}

/// Canonical encoding of a recursive kernel call.
///
/// Holds the full argument tuple, numeric parameters included, so two keys
/// are equal exactly when the calls are.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemoKey<T> {
    kind: MemoKind,
    s: Box<[T]>,
    t: Box<[T]>,
    p: usize,
    decay_bits: Option<u64>,
}

impl<T: Symbol> MemoKey<T> {
    /// Encode a call of `kind` on `(s, t, p, decay)`
    pub fn new(kind: MemoKind, s: &[T], t: &[T], p: usize, decay: Option<f64>) -> Self {
        Self {
            kind,
            s: s.into(),
            t: t.into(),
            p,
            decay_bits: decay.map(f64::to_bits),
        }
    }

    /// The kernel this key belongs to
    pub fn kind(&self) -> MemoKind {
        self.kind
    }
}

/// Memo cache for integer-valued kernels
pub type CountCache<T> = MemoCache<MemoKey<T>, u64>;

/// Memo cache for decay-weighted kernels
pub type WeightCache<T> = MemoCache<MemoKey<T>, f64>;

/// Memoizing evaluator for the recursive string kernels.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use discourse_kernels::{CountCache, StringKernelEngine, WeightCache};
///
/// let engine = StringKernelEngine::<char>::with_caches(
///     Arc::new(CountCache::with_capacity(1024).unwrap()),
///     Arc::new(WeightCache::with_capacity(1024).unwrap()),
/// );
///
/// let s: Vec<char> = "gatta".chars().collect();
/// let t: Vec<char> = "cata".chars().collect();
/// assert_eq!(engine.all_subsequences_kernel(&s, &t).unwrap(), 14);
/// assert!(engine.count_cache().len() > 0);
/// ```
#[derive(Debug)]
pub struct StringKernelEngine<T: Symbol> {
    counts: Arc<CountCache<T>>,
    weights: Arc<WeightCache<T>>,
    limits: KernelLimits,
}

impl<T: Symbol> StringKernelEngine<T> {
    /// Engine backed by the process-wide caches for `T`
    pub fn new() -> Self {
        Self::with_caches(CountCache::global(), WeightCache::global())
    }

    /// Engine backed by caller-supplied caches
    pub fn with_caches(counts: Arc<CountCache<T>>, weights: Arc<WeightCache<T>>) -> Self {
        Self {
            counts,
            weights,
            limits: KernelLimits::default(),
        }
    }

    /// Engine with private caches of the given capacity
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self::with_caches(
            Arc::new(CountCache::with_capacity(capacity)?),
            Arc::new(WeightCache::with_capacity(capacity)?),
        ))
    }

    /// Set resource limits
    pub fn with_limits(mut self, limits: KernelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Resource limits in effect
    pub fn limits(&self) -> &KernelLimits {
        &self.limits
    }

    /// Cache for integer-valued kernels
    pub fn count_cache(&self) -> &Arc<CountCache<T>> {
        &self.counts
    }

    /// Cache for decay-weighted kernels
    pub fn weight_cache(&self) -> &Arc<WeightCache<T>> {
        &self.weights
    }

    /// Drop every memoized value held by this engine's caches
    pub fn clear_caches(&self) {
        self.counts.clear();
        self.weights.clear();
    }

    pub(crate) fn memo_count<F>(&self, key: MemoKey<T>, depth: usize, compute: F) -> Result<u64>
    where
        F: FnOnce() -> Result<u64>,
    {
        self.limits.check_depth(depth)?;
        self.counts.get_or_try_insert_with(key, compute)
    }

    pub(crate) fn memo_weight<F>(&self, key: MemoKey<T>, depth: usize, compute: F) -> Result<f64>
    where
        F: FnOnce() -> Result<f64>,
    {
        self.limits.check_depth(depth)?;
        self.weights.get_or_try_insert_with(key, compute)
    }
}

impl<T: Symbol> Default for StringKernelEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Symbol> Clone for StringKernelEngine<T> {
    fn clone(&self) -> Self {
        Self {
            counts: Arc::clone(&self.counts),
            weights: Arc::clone(&self.weights),
            limits: self.limits.clone(),
        }
    }
}
