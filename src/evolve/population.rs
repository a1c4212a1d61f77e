//! Fixed-capacity population with fitness-guided reproduction and culling.
//!
//! One [`Population::iteration`] call runs a full generation:
//!
//! 1. **Reproduction** — scan members by ascending index; each parent
//!    breeds with the first other member whose fitness lies within the
//!    reproduction tolerance (falling back to itself), optionally mutating
//!    the child, until the population regrows to capacity or the scan
//!    index catches up with the live size.
//! 2. **Culling** — every member draws once against half its own fitness
//!    and is replaced in place on a hit. Destruction is intentionally
//!    biased toward higher-fitness members to sustain exploration.
//! 3. **Result** — the highest-fitness survivor (ties to the lowest index)
//!    is returned and the generation counter advances.

use serde::{Deserialize, Serialize};

use crate::config::{CULL_FACTOR, FITNESS_TOLERANCE};
use crate::rng::SmoothedRng;

use super::genome::Genome;

/// Construction parameters for a [`Population`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Member count the population holds at rest.
    pub capacity: usize,

    /// Probability that a freshly bred child is mutated (one draw).
    pub mutation_rate: f32,

    /// Seed for the population's own PRNG instance.
    pub seed: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            capacity: 32,
            mutation_rate: 0.05,
            seed: 0,
        }
    }
}

/// Lifetime counters, for callers watching the search churn.
#[derive(Clone, Copy, Debug, Default)]
pub struct PopulationStats {
    /// Children bred during reproduction.
    pub births: u64,

    /// Members destroyed and respawned during culling.
    pub culls: u64,
}

/// The winner of a generation.
#[derive(Debug)]
pub struct Fittest<'a, G> {
    /// Slot of the winning member.
    pub index: usize,

    /// Its cached fitness.
    pub fitness: f32,

    pub genome: &'a G,
}

struct Scored<G> {
    genome: G,
    fitness: f32,
}

/// Fixed-capacity ordered population of scored members.
pub struct Population<G: Genome> {
    members: Vec<Scored<G>>,
    capacity: usize,
    mutation_rate: f32,
    generation: u32,
    rng: SmoothedRng,
    stats: PopulationStats,
}

impl<G: Genome> Population<G> {
    /// Seed a population to capacity, scoring each member once.
    pub fn new(config: PopulationConfig) -> Self {
        assert!(config.capacity > 0, "population capacity must be nonzero");
        assert!(
            config.capacity <= u16::MAX as usize,
            "population capacity must fit the 16-bit slot tag"
        );

        let mut rng = SmoothedRng::new(config.seed);
        let mut members = Vec::with_capacity(config.capacity);
        for i in 0..config.capacity {
            let genome = G::spawn(i as u32, &mut rng);
            let fitness = genome.fitness();
            members.push(Scored { genome, fitness });
        }

        tracing::debug!(
            capacity = config.capacity,
            mutation_rate = config.mutation_rate,
            "population seeded"
        );

        Self {
            members,
            capacity: config.capacity,
            mutation_rate: config.mutation_rate,
            generation: 0,
            rng,
            stats: PopulationStats::default(),
        }
    }

    /// Live member count. Equals `capacity` at rest; transiently smaller
    /// only while an iteration is regrowing the population.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Configured capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Completed generations.
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Borrow member `i`.
    pub fn member(&self, i: usize) -> &G {
        &self.members[i].genome
    }

    /// Cached fitness of member `i`.
    pub fn fitness_of(&self, i: usize) -> f32 {
        self.members[i].fitness
    }

    /// Lifetime reproduction/culling counters.
    #[inline]
    pub fn stats(&self) -> PopulationStats {
        self.stats
    }

    /// Current best member without advancing a generation.
    pub fn fittest(&self) -> Fittest<'_, G> {
        let index = self.fittest_index();
        Fittest {
            index,
            fitness: self.members[index].fitness,
            genome: &self.members[index].genome,
        }
    }

    /// Run one full generation and return the surviving best member.
    pub fn iteration(&mut self) -> Fittest<'_, G> {
        self.reproduce();
        self.cull();

        let index = self.fittest_index();
        let fitness = self.members[index].fitness;
        self.generation += 1;

        tracing::trace!(
            generation = self.generation,
            best_index = index,
            best_fitness = fitness,
            "generation complete"
        );

        Fittest {
            index,
            fitness,
            genome: &self.members[index].genome,
        }
    }

    /// Regrow the population to capacity by breeding, scanning parents by
    /// ascending index.
    fn reproduce(&mut self) {
        let mut cur = 0;
        while self.members.len() < self.capacity {
            let target = self.members[cur].fitness;

            // first *other* member within the fitness tolerance; the parent
            // itself when none qualifies
            let mut partner = cur;
            for (i, m) in self.members.iter().enumerate() {
                if i != cur && (m.fitness - target).abs() < FITNESS_TOLERANCE {
                    partner = i;
                    break;
                }
            }

            let mut child = self.members[cur]
                .genome
                .merge(&self.members[partner].genome, &mut self.rng);
            if self.rng.next() <= self.mutation_rate {
                child = child.mutate(&mut self.rng);
            }

            let fitness = child.fitness();
            self.members.push(Scored {
                genome: child,
                fitness,
            });
            self.stats.births += 1;

            cur += 1;
            if cur >= self.members.len() {
                break;
            }
        }
    }

    /// One culling sweep: each member dies when a draw falls at or below
    /// half its fitness, and is replaced in place by a fresh, freshly
    /// scored member tagged with the current generation.
    fn cull(&mut self) {
        for i in 0..self.members.len() {
            if self.rng.next() <= CULL_FACTOR * self.members[i].fitness {
                let tag = self.generation << 16 | i as u32;
                let genome = G::spawn(tag, &mut self.rng);
                let fitness = genome.fitness();
                self.members[i] = Scored { genome, fitness };
                self.stats.culls += 1;
            }
        }
    }

    /// Highest fitness wins; the ascending scan with a strict compare
    /// breaks ties toward the lowest index.
    fn fittest_index(&self) -> usize {
        let mut best = 0;
        for (i, m) in self.members.iter().enumerate().skip(1) {
            if m.fitness > self.members[best].fitness {
                best = i;
            }
        }
        best
    }
}
