//! Genetic operators on [`Individual`]s.
//!
//! - **Crossover**: [`crossover`] mixes two parents position by position
//! - **Mutation**: [`mutate`] replaces words with random vocabulary words
//!
//! Both operators may produce an individual that holds the same word twice
//! within one class. Callers check [`Individual::is_valid`] and retry.

use rand::Rng;

use crate::{
    dataset::{ClassIndex, Dataset, WordId},
    individual::Individual,
};

/// Combines two parents into one child.
///
/// For each position `i` a uniform `r` in `[0, 1)` is drawn:
///
/// - `r < crossover_rate`: the child takes `parent1`'s first-class word and
///   `parent2`'s second-class word at `i`
/// - otherwise: `parent2`'s first-class word and `parent1`'s second-class word
///
/// With an odd word budget the second class is one position longer than the
/// first; that trailing position follows the second-class half of the rule.
///
/// # Panics
///
/// Panics in debug builds if the parents' class lengths differ.
pub fn crossover<R>(
    rng: &mut R,
    parent1: &Individual,
    parent2: &Individual,
    crossover_rate: f64,
) -> Individual
where
    R: Rng + ?Sized,
{
    let [p1_first, p1_second] = ClassIndex::ALL.map(|class| parent1.words(class));
    let [p2_first, p2_second] = ClassIndex::ALL.map(|class| parent2.words(class));
    debug_assert_eq!(p1_first.len(), p2_first.len());
    debug_assert_eq!(p1_second.len(), p2_second.len());

    let mut first = Vec::with_capacity(p1_first.len());
    let mut second = Vec::with_capacity(p1_second.len());
    for i in 0..usize::max(p1_first.len(), p1_second.len()) {
        let take_parent1_first = rng.random::<f64>() < crossover_rate;
        let (first_src, second_src) = if take_parent1_first {
            (p1_first, p2_second)
        } else {
            (p2_first, p1_second)
        };
        if let Some(word) = first_src.get(i) {
            first.push(*word);
        }
        if let Some(word) = second_src.get(i) {
            second.push(*word);
        }
    }
    Individual::new(first, second)
}

/// Mutates an individual in place.
///
/// Every position of every class is replaced, with probability
/// `mutation_rate`, by a word drawn uniformly from the whole vocabulary.
pub fn mutate<R>(rng: &mut R, individual: &mut Individual, mutation_rate: f64, dataset: &Dataset)
where
    R: Rng + ?Sized,
{
    let vocab_len = dataset.vocab_len();
    for class in ClassIndex::ALL {
        for word in individual.words_mut(class) {
            if rng.random::<f64>() < mutation_rate {
                *word = WordId::new(rng.random_range(0..vocab_len));
            }
        }
    }
}
