//! Run parameters and their validation.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// Configuration of one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaParams {
    /// Number of individuals per generation
    pub population_size: usize,
    /// Words per individual, split between the two classes
    pub word_count: usize,
    /// Number of top individuals used as breeding stock
    pub elite_count: usize,
    /// Probability that a crossover position takes the first class from the first parent
    pub crossover_rate: f64,
    /// Per-position probability of replacing a word
    pub mutation_rate: f64,
    /// Number of generations to evolve
    pub generations: usize,
    /// Crossover/mutation attempts per child before falling back to a parent copy
    pub max_child_attempts: usize,
    /// Draws per initial-population slot before a duplicate is accepted
    pub max_init_attempts: usize,
    /// Carry the elites unchanged into the next generation
    pub retain_elites: bool,
    /// Score populations on scoped worker threads
    pub parallel_fitness: bool,
}

impl Default for GaParams {
    fn default() -> Self {
        Self {
            population_size: 20,
            word_count: 10,
            elite_count: 4,
            crossover_rate: 0.7,
            mutation_rate: 0.05,
            generations: 50,
            max_child_attempts: 100,
            max_init_attempts: 100,
            retain_elites: true,
            parallel_fitness: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ParamsError {
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("elite count must be at least 1")]
    NoElites,
    #[display("elite count {elite_count} exceeds population size {population_size}")]
    TooManyElites {
        elite_count: usize,
        population_size: usize,
    },
    #[display("word count {word_count} leaves a class without words (minimum is 2)")]
    WordCountTooSmall { word_count: usize },
    #[display("word count {word_count} exceeds vocabulary size {vocab_len}")]
    WordCountExceedsVocabulary { word_count: usize, vocab_len: usize },
    #[display("{name} must be within [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },
    #[display("{name} must be at least 1")]
    ZeroAttempts { name: &'static str },
}

impl GaParams {
    /// Checks the parameters against each other and against `dataset`.
    pub fn validate(&self, dataset: &Dataset) -> Result<(), ParamsError> {
        if self.population_size == 0 {
            return Err(ParamsError::EmptyPopulation);
        }
        if self.elite_count == 0 {
            return Err(ParamsError::NoElites);
        }
        if self.elite_count > self.population_size {
            return Err(ParamsError::TooManyElites {
                elite_count: self.elite_count,
                population_size: self.population_size,
            });
        }
        if self.word_count < 2 {
            return Err(ParamsError::WordCountTooSmall {
                word_count: self.word_count,
            });
        }
        if self.word_count > dataset.vocab_len() {
            return Err(ParamsError::WordCountExceedsVocabulary {
                word_count: self.word_count,
                vocab_len: dataset.vocab_len(),
            });
        }
        for (name, value) in [
            ("crossover rate", self.crossover_rate),
            ("mutation rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ParamsError::RateOutOfRange { name, value });
            }
        }
        for (name, value) in [
            ("max child attempts", self.max_child_attempts),
            ("max init attempts", self.max_init_attempts),
        ] {
            if value == 0 {
                return Err(ParamsError::ZeroAttempts { name });
            }
        }
        Ok(())
    }
}
