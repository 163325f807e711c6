//! Fitness evaluation.
//!
//! A word placed in a class earns that class's count for the word and loses
//! the opposite class's count:
//!
//! ```text
//! fitness = Σ_c Σ_{w ∈ individual[c]} counts[c][w] - counts[other(c)][w]
//! ```
//!
//! Words strongly associated with the class they are assigned to raise the
//! score; words that belong to the other class lower it.

use std::{iter, num::NonZeroUsize, thread};

use crate::{
    dataset::{ClassIndex, Dataset},
    individual::Individual,
};

/// Scores one individual. Higher is better.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use wordsplit_ga::{dataset::Dataset, fitness, individual::Individual};
///
/// let word_counts = BTreeMap::from([
///     ("A".to_owned(), BTreeMap::from([("x".to_owned(), 5)])),
///     ("B".to_owned(), BTreeMap::from([("z".to_owned(), 5)])),
/// ]);
/// let dataset = Dataset::new(
///     vec!["A".to_owned(), "B".to_owned()],
///     vec!["x".to_owned(), "z".to_owned()],
///     word_counts,
/// )?;
/// let right = Individual::from_words(&dataset, &["x"], &["z"])?;
/// let wrong = Individual::from_words(&dataset, &["z"], &["x"])?;
/// assert_eq!(fitness::fitness(&right, &dataset), 10);
/// assert_eq!(fitness::fitness(&wrong, &dataset), -10);
/// # Ok::<(), wordsplit_ga::dataset::DatasetError>(())
/// ```
#[must_use]
pub fn fitness(individual: &Individual, dataset: &Dataset) -> i64 {
    ClassIndex::ALL
        .into_iter()
        .map(|class| {
            individual
                .words(class)
                .iter()
                .map(|word| {
                    i64::from(dataset.count(class, *word))
                        - i64::from(dataset.count(class.other(), *word))
                })
                .sum::<i64>()
        })
        .sum()
}

/// Scores every individual, preserving population order.
#[must_use]
pub fn population_fitness(population: &[Individual], dataset: &Dataset) -> Vec<i64> {
    population
        .iter()
        .map(|individual| fitness(individual, dataset))
        .collect()
}

/// Like [`population_fitness`], but splits the population across scoped
/// worker threads.
#[must_use]
pub fn par_population_fitness(population: &[Individual], dataset: &Dataset) -> Vec<i64> {
    let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    let chunk_size = population.len().div_ceil(workers).max(1);
    let mut scores = vec![0; population.len()];
    thread::scope(|s| {
        for (individuals, out) in
            iter::zip(population.chunks(chunk_size), scores.chunks_mut(chunk_size))
        {
            s.spawn(move || {
                for (individual, score) in iter::zip(individuals, out) {
                    *score = fitness(individual, dataset);
                }
            });
        }
    });
    scores
}

/// Index of the maximum score; the first one wins ties.
#[must_use]
pub fn fittest_index(scores: &[i64]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, i64)>, (i, &score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((i, score)),
        })
        .map(|(i, _)| i)
}

/// Returns the fittest individual and its score, or `None` for an empty
/// population. Ties go to the earliest individual.
#[must_use]
pub fn find_fittest<'a>(
    population: &'a [Individual],
    dataset: &Dataset,
) -> Option<(&'a Individual, i64)> {
    let scores = population_fitness(population, dataset);
    let index = fittest_index(&scores)?;
    Some((&population[index], scores[index]))
}
