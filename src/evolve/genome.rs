//! The capability set a population member must provide.

use crate::rng::SmoothedRng;

/// A population member the evolutionary engine can breed.
///
/// The engine delegates all member semantics to this trait and performs no
/// validation on what comes back: every method must return a usable member,
/// and `fitness` is interpreted by the culling heuristic as lying in
/// [0, 1]. Destruction is plain `Drop` — replaced members are dropped when
/// the engine overwrites their slot.
pub trait Genome {
    /// Create a fresh member. `tag` encodes the generation in the high 16
    /// bits and the population slot in the low 16, so implementations can
    /// diversify initialization by birth cohort.
    fn spawn(tag: u32, rng: &mut SmoothedRng) -> Self;

    /// Score this member. Called exactly once per member, right after the
    /// member is created; the engine caches the result.
    fn fitness(&self) -> f32;

    /// Produce a perturbed variant of this member.
    fn mutate(self, rng: &mut SmoothedRng) -> Self;

    /// Combine this member with a partner into a child.
    fn merge(&self, other: &Self, rng: &mut SmoothedRng) -> Self;
}
