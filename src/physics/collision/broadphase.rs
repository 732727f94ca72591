//! Broad phase collision detection algorithms
//! are responsible for detecting pairs of possibly intersecting objects
//! for further, more accurate narrow phase inspection.

use super::AABB;

/// A broad phase algorithm.
pub trait BroadPhase {
    /// Returns index pairs `[i, j]` with `i < j` of the boxes that may intersect,
    /// ordered by `i` and then `j`.
    fn pairs(aabbs: &[AABB]) -> Vec<[usize; 2]>;
}

/// The simplest possible broad phase algorithm,
/// which tests every object's bounding box against every other object's.
/// Very inefficient, but can work for small systems.
pub struct BruteForce;

impl BroadPhase for BruteForce {
    fn pairs(aabbs: &[AABB]) -> Vec<[usize; 2]> {
        let mut pairs = Vec::new();
        for (i, a) in aabbs.iter().enumerate() {
            for (j, b) in aabbs.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    pairs.push([i, j]);
                }
            }
        }

        pairs
    }
}
