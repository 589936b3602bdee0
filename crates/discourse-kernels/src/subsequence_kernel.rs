//! Subsequence kernels for contiguous and non-contiguous matches.
//!
//! Every kernel here comes in two flavours that must agree exactly:
//! a memoized recursion on [`StringKernelEngine`] that mirrors the textbook
//! definition, and a polynomial-time dynamic program.
//!
//! | Kernel | Recursive | DP |
//! |---|---|---|
//! | all subsequences | [`StringKernelEngine::all_subsequences_kernel`] | [`all_subsequences_kernel_dp`] |
//! | fixed length | [`StringKernelEngine::fixed_length_subsequences_kernel`] | [`fixed_length_subsequences_kernel_dp`] |
//! | gap weighted | [`StringKernelEngine::gap_weighted_subsequences_kernel`] | [`gap_weighted_subsequences_kernel_dp`] |
//!
//! [`gap_weighted_subsequences_kernel_naive`] additionally enumerates every
//! index tuple and serves as the ground truth for small inputs.
//!
//! ## References
//!
//! - Shawe-Taylor & Cristianini (2004): "Kernel Methods for Pattern Analysis", §11.3–11.5
//! - Lodhi et al. (2002): "Text Classification using String Kernels"

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};
use crate::sequence::Sequence;
use crate::string_kernel::{MemoKey, MemoKind, StringKernelEngine};
use crate::types::{cosine_normalize, validate_decay, KernelLimits, StructuredKernel, Symbol};

fn add_counts(a: u64, b: u64, kernel: &str) -> Result<u64> {
    a.checked_add(b).ok_or_else(|| KernelError::overflow(kernel))
}

impl<T: Symbol> StringKernelEngine<T> {
    /// Number of common subsequences, contiguous or not, including the
    /// empty one.
    ///
    /// 1 if either input is empty; otherwise
    /// `K(s', t) + Σ_{k : t[k] = last(s)} K(s', t[..k])` where `s'` is `s`
    /// without its last symbol.
    pub fn all_subsequences_kernel(&self, s: &[T], t: &[T]) -> Result<u64> {
        tracing::debug!(
            kernel = "all_subsequences",
            s_len = s.len(),
            t_len = t.len(),
            "computing kernel"
        );
        self.all_subsequences_at_depth(s, t, 0)
    }

    fn all_subsequences_at_depth(&self, s: &[T], t: &[T], depth: usize) -> Result<u64> {
        let Some((last, head)) = s.split_last() else {
            return Ok(1);
        };
        if t.is_empty() {
            return Ok(1);
        }

        let key = MemoKey::new(MemoKind::AllSubsequences, s, t, 0, None);
        self.memo_count(key, depth, || {
            let mut total = self.all_subsequences_at_depth(head, t, depth + 1)?;
            for (k, symbol) in t.iter().enumerate() {
                if symbol == last {
                    let matched = self.all_subsequences_at_depth(head, &t[..k], depth + 1)?;
                    total = add_counts(total, matched, "all_subsequences")?;
                }
            }
            Ok(total)
        })
    }

    /// Number of common subsequences of exactly length `p`.
    ///
    /// 1 for `p = 0`; 0 if either input is shorter than `p`.
    pub fn fixed_length_subsequences_kernel(&self, s: &[T], t: &[T], p: usize) -> Result<u64> {
        tracing::debug!(
            kernel = "fixed_length_subsequences",
            s_len = s.len(),
            t_len = t.len(),
            p,
            "computing kernel"
        );
        self.fixed_length_at_depth(s, t, p, 0)
    }

    fn fixed_length_at_depth(&self, s: &[T], t: &[T], p: usize, depth: usize) -> Result<u64> {
        if p == 0 {
            return Ok(1);
        }
        if s.len() < p || t.len() < p {
            return Ok(0);
        }
        let Some((last, head)) = s.split_last() else {
            return Ok(0);
        };

        let key = MemoKey::new(MemoKind::FixedLength, s, t, p, None);
        self.memo_count(key, depth, || {
            let mut total = self.fixed_length_at_depth(head, t, p, depth + 1)?;
            for (k, symbol) in t.iter().enumerate() {
                if symbol == last {
                    let matched = self.fixed_length_at_depth(head, &t[..k], p - 1, depth + 1)?;
                    total = add_counts(total, matched, "fixed_length_subsequences")?;
                }
            }
            Ok(total)
        })
    }

    /// Gap-weighted subsequence kernel by memoized recursion.
    ///
    /// Every pair of occurrences of a common length-`p` subsequence scores
    /// `decay^(span_s + span_t)`, where a span counts the symbols from the
    /// first to the last matched position inclusive. `p = 0` scores 1.
    pub fn gap_weighted_subsequences_kernel(
        &self,
        s: &[T],
        t: &[T],
        p: usize,
        decay: f64,
    ) -> Result<f64> {
        validate_decay(decay)?;
        tracing::debug!(
            kernel = "gap_weighted_subsequences",
            s_len = s.len(),
            t_len = t.len(),
            p,
            decay,
            "computing kernel"
        );
        if p == 0 {
            return Ok(1.0);
        }

        let mut result = 0.0;
        for i in 1..=s.len() {
            for j in 1..=t.len() {
                result += self.gap_weighted_suffix(&s[..i], &t[..j], p, decay, 0)?;
            }
        }
        Ok(result)
    }

    /// Weight of length-`p` matches that end exactly at the last symbol of
    /// both `s` and `t`.
    fn gap_weighted_suffix(
        &self,
        s: &[T],
        t: &[T],
        p: usize,
        decay: f64,
        depth: usize,
    ) -> Result<f64> {
        let (Some((last_s, head_s)), Some((last_t, head_t))) = (s.split_last(), t.split_last())
        else {
            return Ok(0.0);
        };
        if last_s != last_t || s.len() < p || t.len() < p {
            return Ok(0.0);
        }
        if p == 1 {
            return Ok(decay * decay);
        }

        let key = MemoKey::new(MemoKind::GapWeightedSuffix, s, t, p, Some(decay));
        self.memo_weight(key, depth, || {
            let mut total = 0.0;
            for i in 1..=head_s.len() {
                for j in 1..=head_t.len() {
                    let inner = self.gap_weighted_suffix(
                        &head_s[..i],
                        &head_t[..j],
                        p - 1,
                        decay,
                        depth + 1,
                    )?;
                    if inner != 0.0 {
                        let gap = (s.len() - i) + (t.len() - j);
                        total += decay.powi(gap as i32) * inner;
                    }
                }
            }
            Ok(total)
        })
    }
}

/// [`StringKernelEngine::all_subsequences_kernel`] on the process-wide caches
pub fn all_subsequences_kernel<T: Symbol>(s: &[T], t: &[T]) -> Result<u64> {
    StringKernelEngine::new().all_subsequences_kernel(s, t)
}

/// [`StringKernelEngine::fixed_length_subsequences_kernel`] on the process-wide caches
pub fn fixed_length_subsequences_kernel<T: Symbol>(s: &[T], t: &[T], p: usize) -> Result<u64> {
    StringKernelEngine::new().fixed_length_subsequences_kernel(s, t, p)
}

/// [`StringKernelEngine::gap_weighted_subsequences_kernel`] on the process-wide caches
pub fn gap_weighted_subsequences_kernel<T: Symbol>(
    s: &[T],
    t: &[T],
    p: usize,
    decay: f64,
) -> Result<f64> {
    StringKernelEngine::new().gap_weighted_subsequences_kernel(s, t, p, decay)
}

/// All-subsequences kernel by dynamic programming.
///
/// Keeps one rolling row of the main table plus a running prefix sum `pre`
/// over the matches of the current symbol, so each cell costs O(1).
///
/// ```rust
/// use discourse_kernels::all_subsequences_kernel_dp;
///
/// let s: Vec<char> = "gatta".chars().collect();
/// let t: Vec<char> = "cata".chars().collect();
/// assert_eq!(all_subsequences_kernel_dp(&s, &t).unwrap(), 14);
/// ```
pub fn all_subsequences_kernel_dp<T: PartialEq>(s: &[T], t: &[T]) -> Result<u64> {
    let m = t.len();
    let mut previous = vec![1u64; m + 1];
    let mut pre = vec![0u64; m + 1];

    for symbol in s {
        let mut row = vec![0u64; m + 1];
        row[0] = 1;
        let mut last = 0;
        pre[0] = 0;

        for j in 1..=m {
            pre[j] = pre[last];
            if t[j - 1] == *symbol {
                pre[j] = add_counts(pre[last], previous[j - 1], "all_subsequences")?;
                last = j;
            }
            row[j] = add_counts(previous[j], pre[j], "all_subsequences")?;
        }
        previous = row;
    }

    Ok(previous[m])
}

/// Fixed-length subsequence kernel by dynamic programming.
///
/// Iterates the length from 1 to `p`, each pass reading the table of the
/// previous length.
pub fn fixed_length_subsequences_kernel_dp<T: PartialEq>(
    s: &[T],
    t: &[T],
    p: usize,
) -> Result<u64> {
    const KERNEL: &str = "fixed_length_subsequences";
    let (n, m) = (s.len(), t.len());
    let mut previous = vec![vec![1u64; m + 1]; n + 1];

    for _length in 1..=p {
        let mut current = vec![vec![0u64; m + 1]; n + 1];
        let mut pre = vec![0u64; m + 1];

        for i in 1..=n {
            let mut last = 0;
            pre[0] = 0;
            for j in 1..=m {
                pre[j] = pre[last];
                if t[j - 1] == s[i - 1] {
                    pre[j] = add_counts(pre[last], previous[i - 1][j - 1], KERNEL)?;
                    last = j;
                }
                current[i][j] = add_counts(current[i - 1][j], pre[j], KERNEL)?;
            }
        }
        previous = current;
    }

    Ok(previous[n][m])
}

/// Per-length totals of the gap-weighted kernel for lengths `0..=p`.
///
/// Runs the two-table recurrence
/// `dp[i][j] = dps[i][j] + λ·dp[i-1][j] + λ·dp[i][j-1] − λ²·dp[i-1][j-1]`,
/// with `dps[i][j] = λ²·dp[i-1][j-1]` wherever `s[i] = t[j]`.
pub fn gap_weighted_length_totals<T: PartialEq>(
    s: &[T],
    t: &[T],
    p: usize,
    decay: f64,
) -> Result<Vec<f64>> {
    validate_decay(decay)?;
    let (n, m) = (s.len(), t.len());
    let lambda2 = decay * decay;

    let mut totals = vec![0.0; p + 1];
    totals[0] = 1.0;
    if p == 0 {
        return Ok(totals);
    }

    let mut dps = vec![vec![0.0; m + 1]; n + 1];
    for i in 1..=n {
        for j in 1..=m {
            if s[i - 1] == t[j - 1] {
                dps[i][j] = lambda2;
                totals[1] += lambda2;
            }
        }
    }

    let mut dp = vec![vec![0.0; m + 1]; n + 1];
    for length in 2..=p {
        for i in 1..=n {
            for j in 1..=m {
                dp[i][j] = dps[i][j] + decay * dp[i - 1][j] + decay * dp[i][j - 1]
                    - lambda2 * dp[i - 1][j - 1];
                if s[i - 1] == t[j - 1] {
                    dps[i][j] = lambda2 * dp[i - 1][j - 1];
                    totals[length] += dps[i][j];
                }
            }
        }
    }

    Ok(totals)
}

/// Gap-weighted subsequence kernel by dynamic programming
pub fn gap_weighted_subsequences_kernel_dp<T: PartialEq>(
    s: &[T],
    t: &[T],
    p: usize,
    decay: f64,
) -> Result<f64> {
    let totals = gap_weighted_length_totals(s, t, p, decay)?;
    Ok(totals[p])
}

/// Gap-weighted kernel by enumerating every length-`p` index tuple.
///
/// Exponential; bounded by [`KernelLimits::max_enumeration`].
pub fn gap_weighted_subsequences_kernel_naive<T: Symbol>(
    s: &[T],
    t: &[T],
    p: usize,
    decay: f64,
    limits: &KernelLimits,
) -> Result<f64> {
    validate_decay(decay)?;
    let weights_s = weighted_subsequences(s, p, decay, limits)?;
    let weights_t = weighted_subsequences(t, p, decay, limits)?;

    Ok(weights_s
        .iter()
        .filter_map(|(subsequence, weight)| weights_t.get(subsequence).map(|other| weight * other))
        .sum())
}

/// Every length-`p` subsequence of `s` with its summed `decay^span` weight.
fn weighted_subsequences<T: Symbol>(
    s: &[T],
    p: usize,
    decay: f64,
    limits: &KernelLimits,
) -> Result<HashMap<Vec<T>, f64>> {
    let mut weights = HashMap::new();
    let n = s.len();

    if p == 0 {
        weights.insert(Vec::new(), 1.0);
        return Ok(weights);
    }
    if p > n {
        return Ok(weights);
    }

    let mut indices: Vec<usize> = (0..p).collect();
    let mut enumerated = 0;
    loop {
        enumerated += 1;
        limits.check_enumeration(enumerated)?;

        let span = indices[p - 1] - indices[0] + 1;
        let subsequence: Vec<T> = indices.iter().map(|&i| s[i].clone()).collect();
        *weights.entry(subsequence).or_insert(0.0) += decay.powi(span as i32);

        // advance to the next combination in lexicographic order
        let Some(position) = (0..p).rev().find(|&k| indices[k] < n - p + k) else {
            break;
        };
        indices[position] += 1;
        for k in position + 1..p {
            indices[k] = indices[k - 1] + 1;
        }
    }

    Ok(weights)
}

/// Which subsequence kernel a [`SubsequenceKernel`] evaluates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubsequenceMode {
    /// All common subsequences of any length
    All,
    /// Common subsequences of exactly the configured length
    FixedLength,
    /// Common subsequences of the configured length, decayed by span
    GapWeighted,
}

/// Subsequence string kernel configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubsequenceKernelConfig {
    /// Kernel variant
    pub mode: SubsequenceMode,
    /// Subsequence length (ignored by [`SubsequenceMode::All`])
    pub length: usize,
    /// Decay factor (only used by [`SubsequenceMode::GapWeighted`])
    pub decay: f64,
    /// Whether to cosine-normalise the kernel value
    pub normalize: bool,
}

impl SubsequenceKernelConfig {
    /// All-subsequences configuration
    pub fn new() -> Self {
        Self {
            mode: SubsequenceMode::All,
            length: 0,
            decay: 1.0,
            normalize: false,
        }
    }

    /// Count common subsequences of exactly `length`
    pub fn fixed_length(length: usize) -> Self {
        Self {
            mode: SubsequenceMode::FixedLength,
            length,
            ..Self::new()
        }
    }

    /// Gap-weighted subsequences of `length` with `decay`
    pub fn gap_weighted(length: usize, decay: f64) -> Result<Self> {
        Self {
            mode: SubsequenceMode::GapWeighted,
            length,
            ..Self::new()
        }
        .with_decay(decay)
    }

    /// Set decay factor
    pub fn with_decay(mut self, decay: f64) -> Result<Self> {
        validate_decay(decay)?;
        self.decay = decay;
        Ok(self)
    }

    /// Set normalization flag
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

impl Default for SubsequenceKernelConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Subsequence string kernel over sequences
///
/// Evaluates the dynamic-programming form of the configured variant.
///
/// # Example
///
/// ```rust
/// use discourse_kernels::{Sequence, StructuredKernel, SubsequenceKernel, SubsequenceKernelConfig};
///
/// let kernel = SubsequenceKernel::new(SubsequenceKernelConfig::fixed_length(2));
/// let s = Sequence::from_chars("gatta");
/// let t = Sequence::from_chars("cata");
/// assert_eq!(kernel.compute(&s, &t).unwrap(), 5.0);
/// ```
pub struct SubsequenceKernel<T: Symbol> {
    config: SubsequenceKernelConfig,
    _symbol: std::marker::PhantomData<fn() -> T>,
}

impl<T: Symbol> SubsequenceKernel<T> {
    /// Create a new subsequence kernel
    pub fn new(config: SubsequenceKernelConfig) -> Self {
        Self {
            config,
            _symbol: std::marker::PhantomData,
        }
    }

    fn raw(&self, x: &[T], y: &[T]) -> Result<f64> {
        match self.config.mode {
            SubsequenceMode::All => Ok(all_subsequences_kernel_dp(x, y)? as f64),
            SubsequenceMode::FixedLength => {
                Ok(fixed_length_subsequences_kernel_dp(x, y, self.config.length)? as f64)
            }
            SubsequenceMode::GapWeighted => {
                gap_weighted_subsequences_kernel_dp(x, y, self.config.length, self.config.decay)
            }
        }
    }
}

impl<T: Symbol> StructuredKernel for SubsequenceKernel<T> {
    type Input = Sequence<T>;

    fn compute(&self, x: &Sequence<T>, y: &Sequence<T>) -> Result<f64> {
        let kxy = self.raw(x, y)?;
        if !self.config.normalize {
            return Ok(kxy);
        }
        Ok(cosine_normalize(kxy, self.raw(x, x)?, self.raw(y, y)?))
    }

    fn name(&self) -> &str {
        match self.config.mode {
            SubsequenceMode::All => "AllSubsequences",
            SubsequenceMode::FixedLength => "FixedLengthSubsequences",
            SubsequenceMode::GapWeighted => "GapWeightedSubsequences",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    fn engine() -> StringKernelEngine<char> {
        StringKernelEngine::with_capacity(8192).unwrap()
    }

    const ALL_SUBSEQUENCES: [(&str, &str, u64); 9] = [
        ("", "", 1),
        ("a", "", 1),
        ("", "a", 1),
        ("bar", "bar", 8),
        ("bar", "car", 4),
        ("bar", "cat", 2),
        ("gat", "cata", 5),
        ("gatt", "cata", 7),
        ("gatta", "cata", 14),
    ];

    const FIXED_LENGTH: [(&str, &str, usize, u64); 12] = [
        ("", "", 0, 1),
        ("a", "", 0, 1),
        ("", "a", 0, 1),
        ("ga", "ca", 1, 1),
        ("ga", "cata", 1, 2),
        ("gat", "cat", 1, 2),
        ("gat", "cata", 1, 3),
        ("gatt", "cat", 1, 3),
        ("gatta", "cata", 0, 1),
        ("gatta", "cata", 1, 6),
        ("gatta", "cata", 2, 5),
        ("gatta", "cata", 3, 2),
    ];

    #[test]
    fn test_all_subsequences_recursive() {
        let engine = engine();
        for (s, t, expected) in ALL_SUBSEQUENCES {
            assert_eq!(
                engine.all_subsequences_kernel(&chars(s), &chars(t)).unwrap(),
                expected,
                "all_subsequences({:?}, {:?})",
                s,
                t
            );
        }
    }

    #[test]
    fn test_all_subsequences_dp() {
        for (s, t, expected) in ALL_SUBSEQUENCES {
            assert_eq!(
                all_subsequences_kernel_dp(&chars(s), &chars(t)).unwrap(),
                expected
            );
        }
    }

    #[test]
    fn test_fixed_length_recursive() {
        let engine = engine();
        for (s, t, p, expected) in FIXED_LENGTH {
            assert_eq!(
                engine
                    .fixed_length_subsequences_kernel(&chars(s), &chars(t), p)
                    .unwrap(),
                expected,
                "fixed_length({:?}, {:?}, {})",
                s,
                t,
                p
            );
        }
    }

    #[test]
    fn test_fixed_length_dp() {
        for (s, t, p, expected) in FIXED_LENGTH {
            assert_eq!(
                fixed_length_subsequences_kernel_dp(&chars(s), &chars(t), p).unwrap(),
                expected
            );
        }
    }

    #[test]
    fn test_fixed_lengths_sum_to_all_subsequences() {
        let (s, t) = (chars("gatta"), chars("cata"));
        let total: u64 = (0..=4)
            .map(|p| fixed_length_subsequences_kernel_dp(&s, &t, p).unwrap())
            .sum();
        assert_eq!(total, all_subsequences_kernel_dp(&s, &t).unwrap());
    }

    #[test]
    fn test_all_subsequences_works_on_tokens() {
        let engine = StringKernelEngine::<&'static str>::with_capacity(256).unwrap();
        let s = ["the", "dog", "barks"];
        let t = ["the", "cat", "barks"];
        // {}, the, barks, the barks
        assert_eq!(engine.all_subsequences_kernel(&s, &t).unwrap(), 4);
    }

    #[test]
    fn test_all_subsequences_depth_guard() {
        let limits = KernelLimits::new().with_max_recursion_depth(8).unwrap();
        let engine = engine().with_limits(limits);
        let s = chars("abcdefghijklmnop");

        let err = engine.all_subsequences_kernel(&s, &s).unwrap_err();
        assert!(err.is_resource_exhausted());
        // the DP form has no such bound
        assert_eq!(all_subsequences_kernel_dp(&s, &s).unwrap(), 1 << 16);
    }

    #[test]
    fn test_all_subsequences_dp_overflow() {
        let s = vec!['a'; 80];
        let err = all_subsequences_kernel_dp(&s, &s).unwrap_err();
        assert!(matches!(err, KernelError::Overflow { .. }));
    }

    #[test]
    fn test_gap_weighted_three_forms_agree() {
        let engine = engine();
        let limits = KernelLimits::default();
        let cases = [
            ("gatta", "cata", 2, 0.5),
            ("gatta", "cata", 3, 0.8),
            ("science", "silence", 3, 0.6),
            ("abab", "baba", 2, 0.9),
            ("cat", "car", 1, 0.3),
        ];
        for (s, t, p, decay) in cases {
            let (s, t) = (chars(s), chars(t));
            let naive = gap_weighted_subsequences_kernel_naive(&s, &t, p, decay, &limits).unwrap();
            let recursive = engine
                .gap_weighted_subsequences_kernel(&s, &t, p, decay)
                .unwrap();
            let dp = gap_weighted_subsequences_kernel_dp(&s, &t, p, decay).unwrap();

            assert_relative_eq!(naive, recursive, max_relative = 1e-9);
            assert_relative_eq!(naive, dp, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_gap_weighted_hand_computed() {
        // "cat" vs "cart", p = 2: ca (1+1 spans 2,2), ct (spans 3,4), at (spans 2,3)
        let decay: f64 = 0.5;
        let expected = decay.powi(4) + decay.powi(7) + decay.powi(5);
        let value =
            gap_weighted_subsequences_kernel_dp(&chars("cat"), &chars("cart"), 2, decay).unwrap();
        assert_relative_eq!(value, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_gap_weighted_unit_decay_counts_subsequences() {
        let (s, t) = (chars("gatta"), chars("cata"));
        for p in 0..=4 {
            let count = fixed_length_subsequences_kernel_dp(&s, &t, p).unwrap() as f64;
            let weighted = gap_weighted_subsequences_kernel_dp(&s, &t, p, 1.0).unwrap();
            assert_relative_eq!(weighted, count, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_gap_weighted_length_totals() {
        let (s, t) = (chars("gatta"), chars("cata"));
        let totals = gap_weighted_length_totals(&s, &t, 3, 1.0).unwrap();
        assert_eq!(totals.len(), 4);
        assert_relative_eq!(totals[0], 1.0);
        assert_relative_eq!(totals[1], 6.0);
        assert_relative_eq!(totals[2], 5.0, max_relative = 1e-12);
        assert_relative_eq!(totals[3], 2.0, max_relative = 1e-12);
    }

    #[test]
    fn test_gap_weighted_degenerate_parameters() {
        let engine = engine();
        let (s, t) = (chars("abc"), chars("abc"));
        assert_eq!(gap_weighted_subsequences_kernel_dp(&s, &t, 0, 0.5).unwrap(), 1.0);
        assert_eq!(engine.gap_weighted_subsequences_kernel(&s, &t, 0, 0.5).unwrap(), 1.0);
        assert_eq!(gap_weighted_subsequences_kernel_dp(&s, &t, 2, 0.0).unwrap(), 0.0);
        assert_eq!(gap_weighted_subsequences_kernel_dp(&s, &[], 2, 0.5).unwrap(), 0.0);
        assert!(gap_weighted_subsequences_kernel_dp(&s, &t, 2, -1.0).is_err());
        assert!(engine
            .gap_weighted_subsequences_kernel(&s, &t, 2, -1.0)
            .is_err());
    }

    #[test]
    fn test_gap_weighted_naive_enumeration_guard() {
        let limits = KernelLimits::new().with_max_enumeration(10).unwrap();
        let s = chars("abcdefgh");
        let err = gap_weighted_subsequences_kernel_naive(&s, &s, 3, 0.5, &limits).unwrap_err();
        assert!(err.is_resource_exhausted());
    }

    #[test]
    fn test_subsequence_kernel_wrapper_modes() {
        let s = Sequence::from_chars("gatta");
        let t = Sequence::from_chars("cata");

        let all = SubsequenceKernel::new(SubsequenceKernelConfig::new());
        assert_eq!(all.compute(&s, &t).unwrap(), 14.0);
        assert_eq!(all.name(), "AllSubsequences");

        let fixed = SubsequenceKernel::new(SubsequenceKernelConfig::fixed_length(3));
        assert_eq!(fixed.compute(&s, &t).unwrap(), 2.0);

        let weighted =
            SubsequenceKernel::new(SubsequenceKernelConfig::gap_weighted(2, 1.0).unwrap());
        assert_relative_eq!(weighted.compute(&s, &t).unwrap(), 5.0, max_relative = 1e-12);

        let normalized = SubsequenceKernel::new(
            SubsequenceKernelConfig::gap_weighted(2, 0.5)
                .unwrap()
                .with_normalize(true),
        );
        assert_relative_eq!(normalized.compute(&s, &s).unwrap(), 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_subsequence_config_rejects_bad_decay() {
        assert!(SubsequenceKernelConfig::gap_weighted(2, -0.1).is_err());
        assert!(SubsequenceKernelConfig::new().with_decay(f64::INFINITY).is_err());
    }
}
