//! Initial population generation.

use std::collections::HashSet;

use rand::Rng;

use crate::{dataset::Dataset, individual::Individual};

/// Generates `population_size` random individuals.
///
/// Structural duplicates are rejected and regenerated, up to `max_attempts`
/// draws per slot. When every draw collides (tiny vocabularies admit only a
/// handful of distinct individuals) the last draw is accepted anyway, so the
/// result always has exactly `population_size` members.
///
/// # Panics
///
/// Panics if `word_count` exceeds the vocabulary size.
pub fn random<R>(
    rng: &mut R,
    population_size: usize,
    word_count: usize,
    dataset: &Dataset,
    max_attempts: usize,
) -> Vec<Individual>
where
    R: Rng + ?Sized,
{
    let mut seen = HashSet::with_capacity(population_size);
    let mut population = Vec::with_capacity(population_size);
    let mut duplicates = 0;
    for _ in 0..population_size {
        let mut individual = Individual::random(rng, word_count, dataset);
        let mut attempts = 1;
        while seen.contains(&individual) && attempts < max_attempts {
            individual = Individual::random(rng, word_count, dataset);
            attempts += 1;
        }
        if !seen.insert(individual.clone()) {
            duplicates += 1;
        }
        population.push(individual);
    }
    if duplicates > 0 {
        tracing::debug!(
            duplicates,
            max_attempts,
            "Accepted duplicate individuals into the initial population"
        );
    }
    population
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::dataset::tests::sample_dataset;

    #[test]
    fn test_exact_size() {
        let dataset = sample_dataset();
        let mut rng = Pcg32::seed_from_u64(1);
        for size in [0, 1, 7, 20] {
            let population = random(&mut rng, size, 2, &dataset, 10);
            assert_eq!(population.len(), size);
        }
    }

    #[test]
    fn test_unique_when_possible() {
        // 4 words, budget 2: 4 * 3 = 12 distinct ordered individuals.
        let dataset = sample_dataset();
        let mut rng = Pcg32::seed_from_u64(2);
        let population = random(&mut rng, 12, 2, &dataset, 10_000);
        let distinct = population.iter().collect::<HashSet<_>>();
        assert_eq!(distinct.len(), 12);
    }

    #[test]
    fn test_duplicates_accepted_when_exhausted() {
        let dataset = sample_dataset();
        let mut rng = Pcg32::seed_from_u64(3);
        let population = random(&mut rng, 30, 2, &dataset, 5);
        assert_eq!(population.len(), 30);
        assert!(population.iter().all(Individual::is_valid));
    }
}
