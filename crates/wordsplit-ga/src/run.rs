//! The run driver and its collaborators.
//!
//! [`GeneticAlgorithm`] initializes a population, evolves it for the
//! configured number of generations, and summarizes the run as a [`Run`]:
//!
//! ```text
//! GeneticAlgorithm::run
//!     ├─ population::random           (once)
//!     ├─ for each generation
//!     │   ├─ PopulationEvolver::evolve
//!     │   ├─ fitness of the new population
//!     │   └─ ProgressObserver::on_generation
//!     └─ RunHistory::record(Run)
//! ```
//!
//! Progress reporting and run persistence are injected: any
//! `FnMut(&GenerationProgress)` is an observer, and `Vec<Run>` is an
//! in-memory history.

use std::{convert::Infallible, error::Error};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use wordsplit_stats::descriptive::DescriptiveStats;

use crate::{
    cancel::CancelToken,
    dataset::Dataset,
    evolve::{EvolveError, PopulationEvolver},
    fitness,
    individual::LabeledIndividual,
    params::{GaParams, ParamsError},
    population,
    seed::RunSeed,
};

/// Record of one complete optimization run.
///
/// The three history vectors are indexed by generation (0-based).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Creation time in milliseconds since the Unix epoch
    ///
    /// Not unique: runs finishing within the same millisecond share an id.
    /// `created_at` and `seed` tell them apart.
    pub id: i64,
    pub created_at: DateTime<Utc>,
    /// Dataset label, `"first : second"`
    pub dataset: String,
    pub population_size: usize,
    pub word_count: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elite_count: usize,
    /// Seed of a reproducible run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<RunSeed>,
    pub best_individuals: Vec<LabeledIndividual>,
    pub best_fitnesses: Vec<i64>,
    pub average_fitnesses: Vec<f64>,
    /// Children per generation that fell back to a parent copy
    #[serde(default)]
    pub fallback_children: Vec<usize>,
}

impl Run {
    /// Best fitness of the last generation.
    #[must_use]
    pub fn final_best_fitness(&self) -> Option<i64> {
        self.best_fitnesses.last().copied()
    }

    /// Best individual of the last generation.
    #[must_use]
    pub fn final_best_individual(&self) -> Option<&LabeledIndividual> {
        self.best_individuals.last()
    }

    /// Total number of fallback children over the whole run.
    #[must_use]
    pub fn total_fallback_children(&self) -> usize {
        self.fallback_children.iter().sum()
    }
}

/// Per-generation notification sent to a [`ProgressObserver`].
#[derive(Debug, Clone)]
pub struct GenerationProgress {
    /// 1-based generation number
    pub generation: usize,
    pub best_fitness: i64,
    /// Statistics of the whole population's fitness
    pub stats: DescriptiveStats,
    pub fallback_children: usize,
}

/// Receives one notification per generation, in generation order.
pub trait ProgressObserver {
    fn on_generation(&mut self, progress: &GenerationProgress);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&GenerationProgress),
{
    fn on_generation(&mut self, progress: &GenerationProgress) {
        self(progress);
    }
}

/// Observer that ignores all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_generation(&mut self, _progress: &GenerationProgress) {}
}

/// Destination of completed runs.
pub trait RunHistory {
    type Error: Error + Send + Sync + 'static;

    fn record(&mut self, run: Run) -> Result<(), Self::Error>;
}

impl RunHistory for Vec<Run> {
    type Error = Infallible;

    fn record(&mut self, run: Run) -> Result<(), Self::Error> {
        self.push(run);
        Ok(())
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum GaError {
    #[display("invalid parameters")]
    Params(ParamsError),
    #[display("evolution failed")]
    Evolve(EvolveError),
    #[display("run cancelled after {completed_generations} generations")]
    Cancelled { completed_generations: usize },
    /// The run completed but the history sink rejected it.
    #[display("failed to record run {}: {error}", run.id)]
    History {
        run: Box<Run>,
        #[error(not(source))]
        error: Box<dyn Error + Send + Sync>,
    },
}

impl GaError {
    /// Takes back the completed run of a [`GaError::History`] failure.
    #[must_use]
    pub fn into_run(self) -> Option<Run> {
        match self {
            Self::History { run, .. } => Some(*run),
            _ => None,
        }
    }
}

/// Drives a full optimization over one dataset.
#[derive(Debug, Clone)]
pub struct GeneticAlgorithm<'a> {
    dataset: &'a Dataset,
    params: GaParams,
    cancel: CancelToken,
}

impl<'a> GeneticAlgorithm<'a> {
    /// Validates `params` against `dataset`.
    pub fn new(dataset: &'a Dataset, params: GaParams) -> Result<Self, ParamsError> {
        params.validate(dataset)?;
        Ok(Self {
            dataset,
            params,
            cancel: CancelToken::new(),
        })
    }

    /// Makes the run stop early once `cancel` is triggered.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn params(&self) -> &GaParams {
        &self.params
    }

    #[must_use]
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Runs with a [`Pcg32`](rand_pcg::Pcg32) seeded from `seed` and records
    /// the seed in the result.
    pub fn run_seeded<O, H>(
        &self,
        seed: RunSeed,
        observer: &mut O,
        history: &mut H,
    ) -> Result<Run, GaError>
    where
        O: ProgressObserver + ?Sized,
        H: RunHistory + ?Sized,
    {
        let mut rng = seed.rng();
        self.run_inner(&mut rng, Some(seed), observer, history)
    }

    /// Runs with a caller-supplied random source.
    pub fn run<R, O, H>(&self, rng: &mut R, observer: &mut O, history: &mut H) -> Result<Run, GaError>
    where
        R: Rng + ?Sized,
        O: ProgressObserver + ?Sized,
        H: RunHistory + ?Sized,
    {
        self.run_inner(rng, None, observer, history)
    }

    fn run_inner<R, O, H>(
        &self,
        rng: &mut R,
        seed: Option<RunSeed>,
        observer: &mut O,
        history: &mut H,
    ) -> Result<Run, GaError>
    where
        R: Rng + ?Sized,
        O: ProgressObserver + ?Sized,
        H: RunHistory + ?Sized,
    {
        let params = &self.params;
        let dataset = self.dataset;
        tracing::info!(
            dataset = %dataset.label(),
            population_size = params.population_size,
            word_count = params.word_count,
            elite_count = params.elite_count,
            generations = params.generations,
            "Starting run"
        );

        let mut population = population::random(
            rng,
            params.population_size,
            params.word_count,
            dataset,
            params.max_init_attempts,
        );
        let evolver = PopulationEvolver::from(params);

        let mut best_individuals = Vec::with_capacity(params.generations);
        let mut best_fitnesses = Vec::with_capacity(params.generations);
        let mut average_fitnesses = Vec::with_capacity(params.generations);
        let mut fallback_children = Vec::with_capacity(params.generations);

        for generation in 0..params.generations {
            let cancelled = GaError::Cancelled {
                completed_generations: generation,
            };
            if self.cancel.is_cancelled() {
                return Err(cancelled);
            }
            let next = evolver
                .evolve(rng, &population, dataset, &self.cancel)
                .map_err(|e| match e {
                    EvolveError::Cancelled => cancelled,
                    e => GaError::Evolve(e),
                })?;
            population = next.population;

            let scores = if params.parallel_fitness {
                fitness::par_population_fitness(&population, dataset)
            } else {
                fitness::population_fitness(&population, dataset)
            };
            let best = fitness::fittest_index(&scores).expect("population is never empty");
            let stats = DescriptiveStats::from_fitness(scores.iter().copied())
                .expect("population is never empty");

            best_individuals.push(population[best].to_labeled(dataset));
            best_fitnesses.push(scores[best]);
            average_fitnesses.push(stats.mean);
            fallback_children.push(next.fallback_children);

            observer.on_generation(&GenerationProgress {
                generation: generation + 1,
                best_fitness: scores[best],
                stats,
                fallback_children: next.fallback_children,
            });
        }

        let created_at = Utc::now();
        let run = Run {
            id: created_at.timestamp_millis(),
            created_at,
            dataset: dataset.label(),
            population_size: params.population_size,
            word_count: params.word_count,
            generations: params.generations,
            mutation_rate: params.mutation_rate,
            crossover_rate: params.crossover_rate,
            elite_count: params.elite_count,
            seed,
            best_individuals,
            best_fitnesses,
            average_fitnesses,
            fallback_children,
        };
        if let Err(e) = history.record(run.clone()) {
            return Err(GaError::History {
                run: Box::new(run),
                error: Box::new(e),
            });
        }

        tracing::info!(
            run_id = run.id,
            best_fitness = ?run.final_best_fitness(),
            fallback_children = run.total_fallback_children(),
            "Run completed"
        );
        Ok(run)
    }
}
