//! One generation of the genetic algorithm.
//!
//! # Algorithm Overview
//!
//! 1. **Elite Selection** - The `elite_count` fittest individuals become breeding stock
//! 2. **Elite Carry-over** - With `retain_elites`, elites are copied unchanged
//! 3. **Parent Selection** - Two elites are picked uniformly, with replacement
//! 4. **Crossover** - The parents are combined position by position
//! 5. **Mutation** - Words of the child are replaced at random
//! 6. **Validity Check** - Children holding a word twice within a class are discarded
//!
//! Steps 4-6 repeat with the same parents until a valid child appears or
//! `max_child_attempts` is exhausted. In the latter case an unmutated copy of
//! the first parent takes the slot and a warning is logged, so a generation
//! always completes.

use rand::{Rng, seq::IndexedRandom as _};

use crate::{
    cancel::CancelToken,
    dataset::Dataset,
    individual::Individual,
    operators,
    params::GaParams,
    selection::{self, SelectionError},
};

/// Controls how one population becomes the next.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    /// Number of fittest individuals used as parents
    pub elite_count: usize,
    /// Crossover parent-pairing probability
    pub crossover_rate: f64,
    /// Per-position mutation probability
    pub mutation_rate: f64,
    /// Breeding attempts per child before falling back to a parent copy
    pub max_child_attempts: usize,
    /// Copy elites unchanged into the next generation
    pub retain_elites: bool,
}

impl From<&GaParams> for PopulationEvolver {
    fn from(params: &GaParams) -> Self {
        Self {
            elite_count: params.elite_count,
            crossover_rate: params.crossover_rate,
            mutation_rate: params.mutation_rate,
            max_child_attempts: params.max_child_attempts,
            retain_elites: params.retain_elites,
        }
    }
}

/// The population produced by [`PopulationEvolver::evolve`].
#[derive(Debug, Clone)]
pub struct Generation {
    pub population: Vec<Individual>,
    /// Children replaced by a parent copy after exhausting their attempts
    pub fallback_children: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EvolveError {
    #[display("elite selection failed")]
    Selection(SelectionError),
    #[display("no elites to breed from")]
    NoElites,
    #[display("evolution cancelled")]
    Cancelled,
}

impl PopulationEvolver {
    /// Produces the next generation, with the same size as `population`.
    #[tracing::instrument(level = "debug", skip_all, fields(population_size = population.len()))]
    pub fn evolve<R>(
        &self,
        rng: &mut R,
        population: &[Individual],
        dataset: &Dataset,
        cancel: &CancelToken,
    ) -> Result<Generation, EvolveError>
    where
        R: Rng + ?Sized,
    {
        let elites = selection::find_elites(population, self.elite_count, dataset)
            .map_err(EvolveError::Selection)?;
        let mut next = Vec::with_capacity(population.len());
        let mut fallback_children = 0;

        if self.retain_elites {
            next.extend(elites.iter().take(population.len()).cloned());
        }

        while next.len() < population.len() {
            if cancel.is_cancelled() {
                return Err(EvolveError::Cancelled);
            }
            let (Some(p1), Some(p2)) = (elites.choose(rng), elites.choose(rng)) else {
                return Err(EvolveError::NoElites);
            };
            if let Some(child) = self.breed(rng, p1, p2, dataset) {
                next.push(child);
            } else {
                fallback_children += 1;
                tracing::warn!(
                    attempts = self.max_child_attempts,
                    "Could not produce a duplicate-free child; reusing parent"
                );
                next.push(p1.clone());
            }
        }

        Ok(Generation {
            population: next,
            fallback_children,
        })
    }

    /// Crosses and mutates until the child is valid, or gives up.
    fn breed<R>(
        &self,
        rng: &mut R,
        p1: &Individual,
        p2: &Individual,
        dataset: &Dataset,
    ) -> Option<Individual>
    where
        R: Rng + ?Sized,
    {
        (0..self.max_child_attempts).find_map(|_| {
            let mut child = operators::crossover(rng, p1, p2, self.crossover_rate);
            operators::mutate(rng, &mut child, self.mutation_rate, dataset);
            child.is_valid().then_some(child)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{dataset::tests::sample_dataset, fitness, population};

    fn evolver() -> PopulationEvolver {
        PopulationEvolver::from(&GaParams {
            word_count: 4,
            ..GaParams::default()
        })
    }

    #[test]
    fn test_same_size_and_valid() {
        let dataset = sample_dataset();
        let mut rng = Pcg32::seed_from_u64(10);
        let cancel = CancelToken::new();
        let evolver = evolver();
        let mut current = population::random(&mut rng, 20, 4, &dataset, 10);
        for _ in 0..10 {
            let generation = evolver.evolve(&mut rng, &current, &dataset, &cancel).unwrap();
            assert_eq!(generation.population.len(), 20);
            assert!(generation.population.iter().all(Individual::is_valid));
            current = generation.population;
        }
    }

    #[test]
    fn test_retained_elites_lead_next_population() {
        let dataset = sample_dataset();
        let mut rng = Pcg32::seed_from_u64(11);
        let current = population::random(&mut rng, 10, 4, &dataset, 10);
        let elites = selection::find_elites(&current, 4, &dataset).unwrap();
        let generation = evolver()
            .evolve(&mut rng, &current, &dataset, &CancelToken::new())
            .unwrap();
        assert_eq!(generation.population[..4], elites[..]);
    }

    #[test]
    fn test_no_regression_with_retained_elites() {
        let dataset = sample_dataset();
        let mut rng = Pcg32::seed_from_u64(12);
        let mut current = population::random(&mut rng, 8, 4, &dataset, 10);
        let mut best = fitness::find_fittest(&current, &dataset).unwrap().1;
        for _ in 0..10 {
            current = evolver()
                .evolve(&mut rng, &current, &dataset, &CancelToken::new())
                .unwrap()
                .population;
            let next_best = fitness::find_fittest(&current, &dataset).unwrap().1;
            assert!(next_best >= best);
            best = next_best;
        }
    }

    #[test]
    fn test_children_only_without_retention() {
        let dataset = sample_dataset();
        let mut rng = Pcg32::seed_from_u64(13);
        let current = population::random(&mut rng, 10, 4, &dataset, 10);
        let elites = selection::find_elites(&current, 4, &dataset).unwrap();
        // every word is redrawn, so the elites do not lead the next population
        let evolver = PopulationEvolver {
            mutation_rate: 1.0,
            retain_elites: false,
            ..evolver()
        };
        let generation = evolver
            .evolve(&mut rng, &current, &dataset, &CancelToken::new())
            .unwrap();
        assert_eq!(generation.population.len(), 10);
        assert_eq!(generation.fallback_children, 0);
        assert!(generation.population.iter().all(Individual::is_valid));
        assert_ne!(generation.population[..4], elites[..]);
    }

    #[test]
    fn test_retry_bound_falls_back_to_parent() {
        // A one-word vocabulary can only ever yield children that repeat the
        // word, so every attempt fails and each slot must fall back.
        let word_counts = BTreeMap::from([
            ("A".to_owned(), BTreeMap::from([("x".to_owned(), 1)])),
            ("B".to_owned(), BTreeMap::new()),
        ]);
        let dataset = Dataset::new(
            vec!["A".to_owned(), "B".to_owned()],
            vec!["x".to_owned()],
            word_counts,
        )
        .unwrap();
        let parent = Individual::from_words(&dataset, &["x", "x"], &["x", "x"]).unwrap();
        let evolver = PopulationEvolver {
            elite_count: 2,
            crossover_rate: 0.5,
            mutation_rate: 1.0,
            max_child_attempts: 3,
            retain_elites: false,
        };
        let mut rng = Pcg32::seed_from_u64(14);
        let current = vec![parent.clone(); 5];
        let generation = evolver
            .evolve(&mut rng, &current, &dataset, &CancelToken::new())
            .unwrap();
        assert_eq!(generation.population.len(), 5);
        assert_eq!(generation.fallback_children, 5);
        assert!(generation.population.iter().all(|ind| *ind == parent));
    }

    #[test]
    fn test_cancelled() {
        let dataset = sample_dataset();
        let mut rng = Pcg32::seed_from_u64(15);
        let current = population::random(&mut rng, 10, 4, &dataset, 10);
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = evolver()
            .evolve(&mut rng, &current, &dataset, &cancel)
            .unwrap_err();
        assert_eq!(err, EvolveError::Cancelled);
    }

    #[test]
    fn test_selection_error() {
        let dataset = sample_dataset();
        let mut rng = Pcg32::seed_from_u64(16);
        let current = population::random(&mut rng, 2, 4, &dataset, 10);
        let err = evolver()
            .evolve(&mut rng, &current, &dataset, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, EvolveError::Selection(_)));
    }
}
