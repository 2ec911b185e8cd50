//! Proximity deduplication over the raw point set.
//!
//! Any pair of points closer than the threshold marks BOTH members for
//! removal. There is no survivor election: a cluster of mutually-near
//! points disappears entirely. This keeps the surviving set guaranteed
//! sparse, which is what the downstream candidate scan assumes.

use hashbrown::HashSet;
use tracing::{debug, info};

use crate::geo;
use crate::models::PointRecord;

/// Default removal threshold in meters
pub const DEFAULT_DUPLICATE_THRESHOLD_M: f64 = 50.0;

pub struct ProximityDeduplicator {
    threshold_m: f64,
}

impl ProximityDeduplicator {
    pub fn new(threshold_m: f64) -> Self {
        Self { threshold_m }
    }

    /// Return the subsequence of points that have no other point within
    /// the threshold, preserving input order.
    ///
    /// O(n²) distance evaluations; fine for a bounded batch input.
    pub fn dedup(&self, points: &[PointRecord]) -> Vec<PointRecord> {
        let mut removed: HashSet<usize> = HashSet::new();

        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let d = geo::distance_m(&points[i].position, &points[j].position);
                if d < self.threshold_m {
                    debug!(
                        "Points {} and {} are {:.1}m apart, removing both",
                        points[i].id, points[j].id, d
                    );
                    removed.insert(i);
                    removed.insert(j);
                }
            }
        }

        let survivors: Vec<PointRecord> = points
            .iter()
            .enumerate()
            .filter(|(i, _)| !removed.contains(i))
            .map(|(_, p)| p.clone())
            .collect();

        info!(
            "Deduplication: {} points in, {} removed, {} surviving",
            points.len(),
            removed.len(),
            survivors.len()
        );

        survivors
    }
}

impl Default for ProximityDeduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_DUPLICATE_THRESHOLD_M)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ~0.0004 degrees of latitude is ~44.5m
    const NEAR: f64 = 0.0004;

    #[test]
    fn test_far_points_all_survive() {
        let points = vec![
            PointRecord::new("a", 10.79, 106.66),
            PointRecord::new("b", 10.80, 106.67),
            PointRecord::new("c", 10.81, 106.68),
        ];
        let out = ProximityDeduplicator::default().dedup(&points);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_close_pair_removes_both() {
        let points = vec![
            PointRecord::new("a", 10.79, 106.66),
            PointRecord::new("b", 10.79 + NEAR / 2.0, 106.66),
            PointRecord::new("c", 10.81, 106.68),
        ];
        let out = ProximityDeduplicator::default().dedup(&points);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "c");
    }

    #[test]
    fn test_chained_cluster_removes_all_members() {
        // A is ~45m from both B and C, but B and C are ~89m apart.
        // B-C alone would not trigger, yet all three must go.
        let a = PointRecord::new("a", 10.79, 106.66);
        let b = PointRecord::new("b", 10.79 + NEAR, 106.66);
        let c = PointRecord::new("c", 10.79 - NEAR, 106.66);

        let dedup = ProximityDeduplicator::new(50.0);
        let d_ab = geo::distance_m(&a.position, &b.position);
        let d_ac = geo::distance_m(&a.position, &c.position);
        let d_bc = geo::distance_m(&b.position, &c.position);
        assert!(d_ab < 50.0 && d_ac < 50.0 && d_bc > 50.0);

        let out = dedup.dedup(&[a, b, c]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let points = vec![
            PointRecord::new("a", 10.79, 106.66),
            PointRecord::new("b", 10.79 + NEAR / 2.0, 106.66),
            PointRecord::new("c", 10.80, 106.67),
            PointRecord::new("d", 10.81, 106.68),
        ];
        let dedup = ProximityDeduplicator::default();
        let once = dedup.dedup(&points);
        let twice = dedup.dedup(&once);
        assert_eq!(once.len(), twice.len());
        for (p, q) in once.iter().zip(twice.iter()) {
            assert_eq!(p.id, q.id);
        }
    }

    #[test]
    fn test_preserves_input_order() {
        let points = vec![
            PointRecord::new("d", 10.85, 106.70),
            PointRecord::new("a", 10.79, 106.66),
            PointRecord::new("c", 10.81, 106.68),
        ];
        let out = ProximityDeduplicator::default().dedup(&points);
        let ids: Vec<&str> = out.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "a", "c"]);
    }
}
