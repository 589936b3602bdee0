//! Tree Kernels Demonstration
//!
//! This example walks through the tree side of the crate:
//! 1. Building parse trees from labeled edges
//! 2. Production rules and fragment validity
//! 3. The Collins & Duffy kernel, exact and decayed
//! 4. A normalized Gram matrix over several trees
//!
//! Run with: cargo run --example tree_kernels_demo

use discourse_kernels::{
    fragment_kernel, is_valid_fragment, tree_kernel, weighted_tree_kernel, KernelLimits,
    LabeledGraph, RuleConfig, StructuredKernel, Tree, TreeKernel, TreeKernelConfig,
};

fn sentence(subject: &str, verb: &str, object: &str) -> anyhow::Result<Tree> {
    let tree = Tree::from_edges(
        &[
            ("S", "S"),
            ("NP-1", "NP"),
            ("N-1", "N"),
            ("subj", subject),
            ("VP", "VP"),
            ("V", "V"),
            ("verb", verb),
            ("NP-2", "NP"),
            ("D", "D"),
            ("det", "the"),
            ("N-2", "N"),
            ("obj", object),
        ],
        &[
            ("S", "NP-1"),
            ("NP-1", "N-1"),
            ("N-1", "subj"),
            ("S", "VP"),
            ("VP", "V"),
            ("V", "verb"),
            ("VP", "NP-2"),
            ("NP-2", "D"),
            ("D", "det"),
            ("NP-2", "N-2"),
            ("N-2", "obj"),
        ],
    )?;
    Ok(tree)
}

fn main() -> anyhow::Result<()> {
    println!("=== Tree Kernels Demonstration ===\n");

    println!("1. Creating parse trees...");
    let t1 = sentence("Jeff", "ate", "apple")?;
    let t2 = sentence("Jeff", "ate", "pear")?;
    let t3 = sentence("Mary", "saw", "dog")?;
    println!("  Tree 1: Jeff ate the apple");
    println!("  Tree 2: Jeff ate the pear");
    println!("  Tree 3: Mary saw the dog");
    println!();

    let config = RuleConfig::default();

    println!("2. Production rules of tree 1");
    for rule in t1.rules(&config) {
        println!("   {}", rule);
    }
    println!();

    println!("3. Fragment validity");
    let complete = LabeledGraph::from_edges(
        &[("NP-2", "NP"), ("D", "D"), ("N-2", "N")],
        &[("NP-2", "D"), ("NP-2", "N-2")],
    )?;
    let partial = LabeledGraph::from_edges(&[("NP-2", "NP"), ("D", "D")], &[("NP-2", "D")])?;
    println!("   NP -> D N      valid: {}", is_valid_fragment(&t1, &complete, &config));
    println!("   NP -> D        valid: {}", is_valid_fragment(&t1, &partial, &config));
    println!(
        "   fragments rooted at S: {}",
        t1.count_corooted_subtrees(t1.root())?
    );
    println!();

    println!("4. Collins & Duffy kernel");
    println!("   K(t1, t1) = {}", tree_kernel(&t1, &t1, &config)?);
    println!("   K(t1, t2) = {}", tree_kernel(&t1, &t2, &config)?);
    println!("   K(t1, t3) = {}", tree_kernel(&t1, &t3, &config)?);
    println!(
        "   via fragment histograms: K(t1, t2) = {}",
        fragment_kernel(&t1, &t2, &config, &KernelLimits::default())?
    );
    println!(
        "   decayed (λ = 0.4): K(t1, t2) = {:.4}",
        weighted_tree_kernel(&t1, &t2, &config, 0.4)?
    );
    println!();

    println!("5. Normalized Gram matrix");
    let kernel = TreeKernel::new(TreeKernelConfig::new().with_normalize(true));
    let gram = kernel.compute_matrix(&[t1, t2, t3])?;
    for row in &gram {
        let cells: Vec<String> = row.iter().map(|v| format!("{:.4}", v)).collect();
        println!("   [{}]", cells.join(", "));
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
