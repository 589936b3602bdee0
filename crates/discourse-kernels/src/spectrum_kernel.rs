//! Spectrum and suffix kernels for contiguous substrings.
//!
//! - [`suffix_match`]: do two sequences end in the same k symbols
//! - [`spectrum_kernel`]: inner product of p-gram frequency histograms
//! - [`blended_spectrum_naive`]: all substring lengths 1..=p, no decay
//! - [`StringKernelEngine::p_suffix_kernel`]: decayed common-suffix kernel
//! - [`StringKernelEngine::blended_spectrum_kernel`]: decayed blended spectrum
//!
//! ## References
//!
//! - Shawe-Taylor & Cristianini (2004): "Kernel Methods for Pattern Analysis", ch. 11

use std::collections::HashMap;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sequence::Sequence;
use crate::string_kernel::{MemoKey, MemoKind, StringKernelEngine};
use crate::types::{cosine_normalize, validate_decay, StructuredKernel, Symbol};

/// k-suffix indicator.
///
/// Returns 1 iff both inputs are at least `k` long and their trailing `k`
/// symbols are identical, 0 otherwise. `k = 0` always matches.
pub fn suffix_match<T: PartialEq>(s: &[T], t: &[T], k: usize) -> u64 {
    if s.len() < k || t.len() < k {
        return 0;
    }
    u64::from(s[s.len() - k..] == t[t.len() - k..])
}

/// p-spectrum kernel by direct iteration over every pair of length-p
/// substrings.
///
/// ```rust
/// use discourse_kernels::spectrum_kernel;
///
/// let bar: Vec<char> = "bar".chars().collect();
/// let cat: Vec<char> = "cat".chars().collect();
/// assert_eq!(spectrum_kernel(&bar, &bar, 2), 2);
/// assert_eq!(spectrum_kernel(&bar, &cat, 2), 0);
/// ```
pub fn spectrum_kernel<T: PartialEq>(s: &[T], t: &[T], p: usize) -> u64 {
    if s.len() < p || t.len() < p {
        return 0;
    }

    let mut result = 0;
    for i in 0..=(s.len() - p) {
        for j in 0..=(t.len() - p) {
            result += suffix_match(&s[i..i + p], &t[j..j + p], p);
        }
    }
    result
}

/// Frequency histogram of the length-p substrings of `s`
pub fn p_spectrum<T: Symbol>(s: &[T], p: usize) -> HashMap<&[T], u64> {
    let mut spectrum = HashMap::new();

    if s.len() < p {
        return spectrum;
    }

    for window in 0..=(s.len() - p) {
        *spectrum.entry(&s[window..window + p]).or_insert(0) += 1;
    }

    spectrum
}

/// p-spectrum kernel as a histogram inner product.
///
/// Returns exactly what [`spectrum_kernel`] returns, in time linear in the
/// number of windows.
pub fn spectrum_kernel_histogram<T: Symbol>(s: &[T], t: &[T], p: usize) -> u64 {
    let spectrum_s = p_spectrum(s, p);
    let spectrum_t = p_spectrum(t, p);

    let (small, large) = if spectrum_s.len() <= spectrum_t.len() {
        (&spectrum_s, &spectrum_t)
    } else {
        (&spectrum_t, &spectrum_s)
    };

    small
        .iter()
        .filter_map(|(gram, count)| large.get(gram).map(|other| count * other))
        .sum()
}

/// Number of identical substring pairs over every length 1..=p.
///
/// Brute-force reference for the decayed blended spectrum kernel.
///
/// ```rust
/// use discourse_kernels::blended_spectrum_naive;
///
/// let s: Vec<char> = "abccc".chars().collect();
/// let t: Vec<char> = "abc".chars().collect();
/// assert_eq!(blended_spectrum_naive(&s, &t, 2), 7);
/// ```
pub fn blended_spectrum_naive<T: PartialEq>(s: &[T], t: &[T], p: usize) -> u64 {
    (1..=p).map(|length| spectrum_kernel(s, t, length)).sum()
}

impl<T: Symbol> StringKernelEngine<T> {
    /// Decayed common-suffix kernel.
    ///
    /// 0 when `p = 0`, `decay = 0`, either input is empty or the final
    /// symbols differ; otherwise
    /// `decay² · (1 + p_suffix_kernel(s[..-1], t[..-1], p - 1, decay))`.
    pub fn p_suffix_kernel(&self, s: &[T], t: &[T], p: usize, decay: f64) -> Result<f64> {
        validate_decay(decay)?;
        self.p_suffix_at_depth(s, t, p, decay, 0)
    }

    fn p_suffix_at_depth(
        &self,
        s: &[T],
        t: &[T],
        p: usize,
        decay: f64,
        depth: usize,
    ) -> Result<f64> {
        if p == 0 || decay == 0.0 {
            return Ok(0.0);
        }
        let (Some((last_s, head_s)), Some((last_t, head_t))) = (s.split_last(), t.split_last())
        else {
            return Ok(0.0);
        };
        if last_s != last_t {
            return Ok(0.0);
        }

        let key = MemoKey::new(MemoKind::PSuffix, s, t, p, Some(decay));
        self.memo_weight(key, depth, || {
            let tail = self.p_suffix_at_depth(head_s, head_t, p - 1, decay, depth + 1)?;
            Ok(decay * decay * (1.0 + tail))
        })
    }

    /// Decayed blended spectrum kernel.
    ///
    /// Sums [`p_suffix_kernel`](Self::p_suffix_kernel) over every pair of
    /// end offsets `(i, j)`, i.e. over all aligned substring pairs of length
    /// up to `p`, each weighted by `decay^(2·length)`. With `decay = 1` this
    /// equals [`blended_spectrum_naive`].
    pub fn blended_spectrum_kernel(&self, s: &[T], t: &[T], p: usize, decay: f64) -> Result<f64> {
        validate_decay(decay)?;
        tracing::debug!(
            kernel = "blended_spectrum",
            s_len = s.len(),
            t_len = t.len(),
            p,
            decay,
            "computing kernel"
        );

        let mut result = 0.0;
        for i in 1..=s.len() {
            for j in 1..=t.len() {
                result += self.p_suffix_at_depth(&s[..i], &t[..j], p, decay, 0)?;
            }
        }
        Ok(result)
    }
}

/// [`StringKernelEngine::p_suffix_kernel`] on the process-wide caches
pub fn p_suffix_kernel<T: Symbol>(s: &[T], t: &[T], p: usize, decay: f64) -> Result<f64> {
    StringKernelEngine::new().p_suffix_kernel(s, t, p, decay)
}

/// [`StringKernelEngine::blended_spectrum_kernel`] on the process-wide caches
pub fn blended_spectrum_kernel<T: Symbol>(s: &[T], t: &[T], p: usize, decay: f64) -> Result<f64> {
    StringKernelEngine::new().blended_spectrum_kernel(s, t, p, decay)
}

/// Spectrum kernel configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpectrumKernelConfig {
    /// Substring length
    pub p: usize,
    /// Whether to cosine-normalise the kernel value
    pub normalize: bool,
}

impl SpectrumKernelConfig {
    /// Create configuration with substring length
    pub fn new(p: usize) -> Self {
        Self {
            p,
            normalize: false,
        }
    }

    /// Set normalization flag
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

/// p-spectrum kernel over sequences
///
/// # Example
///
/// ```rust
/// use discourse_kernels::{Sequence, SpectrumKernel, SpectrumKernelConfig, StructuredKernel};
///
/// let kernel = SpectrumKernel::new(SpectrumKernelConfig::new(3));
/// let s = Sequence::from_chars("statistics");
/// let t = Sequence::from_chars("computation");
/// assert_eq!(kernel.compute(&s, &t).unwrap(), 2.0);
/// ```
pub struct SpectrumKernel<T: Symbol> {
    config: SpectrumKernelConfig,
    _symbol: PhantomData<fn() -> T>,
}

impl<T: Symbol> SpectrumKernel<T> {
    /// Create a new spectrum kernel
    pub fn new(config: SpectrumKernelConfig) -> Self {
        Self {
            config,
            _symbol: PhantomData,
        }
    }

    fn raw(&self, x: &[T], y: &[T]) -> f64 {
        spectrum_kernel_histogram(x, y, self.config.p) as f64
    }
}

impl<T: Symbol> StructuredKernel for SpectrumKernel<T> {
    type Input = Sequence<T>;

    fn compute(&self, x: &Sequence<T>, y: &Sequence<T>) -> Result<f64> {
        let kxy = self.raw(x, y);
        if !self.config.normalize {
            return Ok(kxy);
        }
        Ok(cosine_normalize(kxy, self.raw(x, x), self.raw(y, y)))
    }

    fn name(&self) -> &str {
        "Spectrum"
    }
}

/// Blended spectrum kernel configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlendedSpectrumKernelConfig {
    /// Longest substring length considered
    pub p: usize,
    /// Per-symbol decay weight
    pub decay: f64,
    /// Whether to cosine-normalise the kernel value
    pub normalize: bool,
}

impl BlendedSpectrumKernelConfig {
    /// Create configuration with maximum length and decay
    pub fn new(p: usize, decay: f64) -> Result<Self> {
        validate_decay(decay)?;
        Ok(Self {
            p,
            decay,
            normalize: false,
        })
    }

    /// Set normalization flag
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

/// Decayed blended spectrum kernel over sequences
pub struct BlendedSpectrumKernel<T: Symbol> {
    config: BlendedSpectrumKernelConfig,
    engine: StringKernelEngine<T>,
}

impl<T: Symbol> BlendedSpectrumKernel<T> {
    /// Create a kernel backed by the process-wide caches
    pub fn new(config: BlendedSpectrumKernelConfig) -> Self {
        Self::with_engine(config, StringKernelEngine::new())
    }

    /// Create a kernel backed by a caller-supplied engine
    pub fn with_engine(config: BlendedSpectrumKernelConfig, engine: StringKernelEngine<T>) -> Self {
        Self { config, engine }
    }

    fn raw(&self, x: &[T], y: &[T]) -> Result<f64> {
        self.engine
            .blended_spectrum_kernel(x, y, self.config.p, self.config.decay)
    }
}

impl<T: Symbol> StructuredKernel for BlendedSpectrumKernel<T> {
    type Input = Sequence<T>;

    fn compute(&self, x: &Sequence<T>, y: &Sequence<T>) -> Result<f64> {
        let kxy = self.raw(x, y)?;
        if !self.config.normalize {
            return Ok(kxy);
        }
        Ok(cosine_normalize(kxy, self.raw(x, x)?, self.raw(y, y)?))
    }

    fn name(&self) -> &str {
        "BlendedSpectrum"
    }
}
