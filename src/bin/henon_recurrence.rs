//! Hénon Map Recurrences: Closest Return and Attractor Diameter
//!
//! Samples an orbit of the Hénon map and hands the visited states to the
//! spatial search as a named point set.
//!
//! ## Protocol
//!
//! 1. Iterate from a random initial condition, discarding a transient
//! 2. Collect N states into a `PointSet` named "henon"
//! 3. Closest pair of distinct states: the tightest recurrence
//! 4. Farthest pair: the attractor diameter
//! 5. Cross-check both against the O(N²) search on a prefix

use chaos_kernel::{
    max_pairwise_distance,
    max_pairwise_distance_brute,
    min_pairwise_distance,
    min_pairwise_distance_brute,
    PointSet,
};
use rand_distr::{Distribution, Uniform};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("═══════════════════════════════════════════════════════════════");
    println!("  Orbit Recurrences: Hénon Map");
    println!("═══════════════════════════════════════════════════════════════\n");

    let a = 1.4_f64;
    let b = 0.3_f64;
    let transient = 1_000;
    let n_points = 20_000;
    let n_check = 1_500;

    let mut rng = rand::rng();
    let uniform = Uniform::new(-0.1, 0.1)?;
    let (mut x, mut y): (f64, f64) = (uniform.sample(&mut rng), uniform.sample(&mut rng));
    info!(x, y, "Initial condition");

    let mut orbit = Vec::with_capacity(n_points);
    for i in 0..transient + n_points {
        let next = (1.0 - a * x * x + y, b * x);
        x = next.0;
        y = next.1;
        if i >= transient {
            orbit.push([x, y]);
        }
    }

    let points = PointSet::from_vectors(&orbit)?.with_name("henon");
    println!(
        "Orbit '{}': N = {}, D = {}",
        points.name().unwrap_or("unnamed"),
        points.len(),
        points.dimension()
    );
    println!("  Bounding box: min = {:?}", points.minima());
    println!("                max = {:?}", points.maxima());

    let start = Instant::now();
    let closest = min_pairwise_distance(&points)?;
    let farthest = max_pairwise_distance(&points)?;
    let elapsed = start.elapsed();

    println!("\nk-d tree search ({:.1?}):", elapsed);
    println!(
        "  Closest return:  states {} and {}, d = {:.3e}",
        closest.pair.0, closest.pair.1, closest.distance
    );
    println!(
        "  Diameter:        states {} and {}, d = {:.4}",
        farthest.pair.0, farthest.pair.1, farthest.distance
    );

    // Exhaustive search on a prefix
    let prefix = &orbit[..n_check];
    let tree_min = min_pairwise_distance(prefix)?;
    let brute_min = min_pairwise_distance_brute(prefix)?;
    let tree_max = max_pairwise_distance(prefix)?;
    let brute_max = max_pairwise_distance_brute(prefix)?;

    println!("\n─────────────────────────────────────────────────────────────");
    println!("Cross-check on the first {} states:", n_check);
    println!(
        "  closest:  tree {:?} vs brute {:?} -> {}",
        tree_min.pair,
        brute_min.pair,
        if tree_min == brute_min { "match" } else { "MISMATCH" }
    );
    println!(
        "  farthest: tree {:?} vs brute {:?} -> {}",
        tree_max.pair,
        brute_max.pair,
        if tree_max == brute_max { "match" } else { "MISMATCH" }
    );

    println!("\n═══════════════════════════════════════════════════════════════");
    println!("  Analysis Complete");
    println!("═══════════════════════════════════════════════════════════════");

    Ok(())
}
