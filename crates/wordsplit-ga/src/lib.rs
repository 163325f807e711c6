//! Genetic algorithm for evolving binary word classifiers.
//!
//! An individual splits a fixed budget of vocabulary words between the two
//! classes of a labeled [`Dataset`](dataset::Dataset). Its fitness rewards
//! words that are frequent in the class they were assigned to and penalizes
//! words that are frequent in the other class. A generational GA with elitist
//! selection searches for the split with the highest fitness.
//!
//! # How a Run Works
//!
//! 1. **Initialization** - A population of random, duplicate-free individuals is drawn
//! 2. **Evaluation** - Every individual is scored against the dataset's word counts
//! 3. **Selection** - The fittest `elite_count` individuals become breeding stock
//! 4. **Reproduction** - Children are bred from elite pairs by crossover and mutation
//! 5. **Validity** - Children repeating a word within a class are rejected and rebred
//! 6. **Repeat** - Steps 2-5 run once per generation
//!
//! The best individual, best fitness and mean fitness of every generation are
//! collected into a [`Run`] record, which is handed to a [`RunHistory`] sink.
//!
//! # Architecture
//!
//! ```text
//! Dataset (word counts per class)
//!     ↓ scores
//! Individual (words per class)
//!     ↓ bred by
//! PopulationEvolver (selection, crossover, mutation)
//!     ↓ driven by
//! GeneticAlgorithm
//!     ↓ produces
//! Run → RunHistory
//! ```
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use wordsplit_ga::{GaParams, GeneticAlgorithm, NoProgress, RunSeed, dataset::Dataset};
//!
//! let word_counts = BTreeMap::from([
//!     ("spam".to_owned(), BTreeMap::from([("free".to_owned(), 9), ("win".to_owned(), 4)])),
//!     ("ham".to_owned(), BTreeMap::from([("meeting".to_owned(), 7), ("lunch".to_owned(), 3)])),
//! ]);
//! let dataset = Dataset::new(
//!     vec!["spam".to_owned(), "ham".to_owned()],
//!     ["free", "win", "meeting", "lunch"].map(String::from).to_vec(),
//!     word_counts,
//! )?;
//!
//! let params = GaParams {
//!     word_count: 4,
//!     generations: 10,
//!     ..GaParams::default()
//! };
//! let ga = GeneticAlgorithm::new(&dataset, params)?;
//! let mut history = vec![];
//! let run = ga.run_seeded(RunSeed::from_bytes([0; 16]), &mut NoProgress, &mut history)?;
//!
//! assert_eq!(run.best_fitnesses.len(), 10);
//! assert_eq!(history.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Reproducibility
//!
//! Every random decision is drawn from an injected [`rand::Rng`]. Runs started
//! with [`GeneticAlgorithm::run_seeded`] use a [`RunSeed`] and store it in the
//! [`Run`], so the same seed, dataset and parameters reproduce the same
//! histories.

pub mod cancel;
pub mod dataset;
pub mod evolve;
pub mod fitness;
pub mod individual;
pub mod operators;
pub mod params;
pub mod population;
pub mod run;
pub mod seed;
pub mod selection;

pub use self::{
    cancel::CancelToken,
    params::{GaParams, ParamsError},
    run::{
        GaError, GenerationProgress, GeneticAlgorithm, NoProgress, ProgressObserver, Run,
        RunHistory,
    },
    seed::RunSeed,
};
