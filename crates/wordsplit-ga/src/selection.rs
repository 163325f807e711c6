//! Elite selection.

use crate::{dataset::Dataset, fitness, individual::Individual};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SelectionError {
    #[display("cannot select {elite_count} elites from a population of {population_size}")]
    TooManyElites {
        elite_count: usize,
        population_size: usize,
    },
}

/// Indices of the `elite_count` highest scores in descending score order.
///
/// Equal scores keep their population order, so the earliest individual is
/// selected first.
pub fn elite_indices(scores: &[i64], elite_count: usize) -> Result<Vec<usize>, SelectionError> {
    if elite_count > scores.len() {
        return Err(SelectionError::TooManyElites {
            elite_count,
            population_size: scores.len(),
        });
    }
    let mut order = (0..scores.len()).collect::<Vec<_>>();
    // stable sort: ties stay in population order
    order.sort_by(|&a, &b| scores[b].cmp(&scores[a]));
    order.truncate(elite_count);
    Ok(order)
}

/// Returns copies of the `elite_count` fittest individuals, best first.
///
/// The fitness vector is computed once.
pub fn find_elites(
    population: &[Individual],
    elite_count: usize,
    dataset: &Dataset,
) -> Result<Vec<Individual>, SelectionError> {
    let scores = fitness::population_fitness(population, dataset);
    let indices = elite_indices(&scores, elite_count)?;
    Ok(indices.into_iter().map(|i| population[i].clone()).collect())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{dataset::tests::sample_dataset, population};

    #[test]
    fn test_elite_indices_order_and_ties() {
        let scores = [4, 9, 4, -1, 9];
        assert_eq!(elite_indices(&scores, 0).unwrap(), Vec::<usize>::new());
        assert_eq!(elite_indices(&scores, 3).unwrap(), [1, 4, 0]);
        assert_eq!(elite_indices(&scores, 5).unwrap(), [1, 4, 0, 2, 3]);
    }

    #[test]
    fn test_too_many_elites() {
        let err = elite_indices(&[1, 2], 3).unwrap_err();
        assert_eq!(
            err,
            SelectionError::TooManyElites {
                elite_count: 3,
                population_size: 2
            }
        );
    }

    #[test]
    fn test_find_elites_non_increasing() {
        let dataset = sample_dataset();
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..20 {
            let population = population::random(&mut rng, 12, 2, &dataset, 10);
            let scores = fitness::population_fitness(&population, &dataset);
            let elites = find_elites(&population, 5, &dataset).unwrap();
            assert_eq!(elites.len(), 5);

            let elite_scores = fitness::population_fitness(&elites, &dataset);
            assert!(elite_scores.is_sorted_by(|a, b| a >= b));
            assert!(elite_scores.iter().all(|s| scores.contains(s)));
            assert_eq!(elite_scores[0], *scores.iter().max().unwrap());
        }
    }
}
