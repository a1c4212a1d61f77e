//! Evolutionary engine — fixed-capacity, fitness-guided population search,
//! generic over a caller-supplied genome type.

pub mod genome;
pub mod population;

pub use genome::Genome;
pub use population::{Fittest, Population, PopulationConfig, PopulationStats};
