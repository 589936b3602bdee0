//! String Kernels Demonstration
//!
//! Compares spectrum and subsequence kernels on a handful of words and
//! token sequences, and shows the memo cache at work.
//!
//! Run with: cargo run --example string_kernels_demo

use discourse_kernels::{
    all_subsequences_kernel_dp, blended_spectrum_naive, gap_weighted_subsequences_kernel_dp,
    spectrum_kernel, Sequence, StringKernelEngine, StructuredKernel, SubsequenceKernel,
    SubsequenceKernelConfig,
};

fn main() -> anyhow::Result<()> {
    println!("=== String Kernels Demonstration ===\n");

    let words = ["gatta", "cata", "science", "silence"];
    let seqs: Vec<Sequence<char>> = words.iter().map(|w| Sequence::from_chars(w)).collect();

    println!("1. Spectrum kernels (p = 2)");
    for (i, a) in seqs.iter().enumerate() {
        for b in seqs.iter().skip(i + 1) {
            println!(
                "   {:>8} / {:<8} spectrum = {:>2}  blended = {:>2}",
                a.iter().collect::<String>(),
                b.iter().collect::<String>(),
                spectrum_kernel(a, b, 2),
                blended_spectrum_naive(a, b, 2)
            );
        }
    }
    println!();

    println!("2. Subsequence kernels");
    let (s, t) = (&seqs[0], &seqs[1]);
    println!("   all subsequences(gatta, cata)   = {}", all_subsequences_kernel_dp(s, t)?);
    println!(
        "   gap weighted(gatta, cata, 2, 0.5) = {:.5}",
        gap_weighted_subsequences_kernel_dp(s, t, 2, 0.5)?
    );
    println!();

    println!("3. Memoized recursion");
    let engine = StringKernelEngine::<char>::with_capacity(4096)?;
    let (u, v) = (&seqs[2], &seqs[3]);
    let first = engine.fixed_length_subsequences_kernel(u, v, 3)?;
    let again = engine.fixed_length_subsequences_kernel(u, v, 3)?;
    let stats = engine.count_cache().stats();
    println!("   fixed length(science, silence, 3) = {} (again: {})", first, again);
    println!(
        "   cache: {} entries, {} hits, {} misses, hit rate {:.2}",
        stats.current_size,
        stats.hits,
        stats.misses,
        stats.hit_rate()
    );
    println!();

    println!("4. Token sequences");
    let docs = vec![
        Sequence::from_whitespace("the cat sat on the mat"),
        Sequence::from_whitespace("the dog sat on the log"),
        Sequence::from_whitespace("a cat lay on a mat"),
    ];
    let kernel = SubsequenceKernel::new(
        SubsequenceKernelConfig::gap_weighted(2, 0.6)?.with_normalize(true),
    );
    let gram = kernel.compute_matrix(&docs)?;
    for row in &gram {
        let cells: Vec<String> = row.iter().map(|v| format!("{:.4}", v)).collect();
        println!("   [{}]", cells.join(", "));
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
