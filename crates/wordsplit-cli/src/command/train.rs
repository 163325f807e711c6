use std::path::PathBuf;

use anyhow::{Context as _, anyhow};
use rand::Rng as _;
use wordsplit_ga::{
    GaError, GaParams, GenerationProgress, GeneticAlgorithm, Run, RunSeed, dataset::Dataset,
};

use crate::util::{self, JsonlRunHistory, Output};

const DEFAULT_POPULATION_SIZE: usize = 20;
const DEFAULT_WORD_COUNT: usize = 10;
const DEFAULT_ELITE_COUNT: usize = 4;
const DEFAULT_CROSSOVER_RATE: f64 = 0.7;
const DEFAULT_MUTATION_RATE: f64 = 0.05;
const DEFAULT_GENERATIONS: usize = 50;
const DEFAULT_MAX_CHILD_ATTEMPTS: usize = 100;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Dataset JSON file
    #[arg(long)]
    dataset: PathBuf,
    /// Number of individuals per generation
    #[arg(long, default_value_t = DEFAULT_POPULATION_SIZE)]
    population_size: usize,
    /// Words per individual, split between the two classes
    #[arg(long, default_value_t = DEFAULT_WORD_COUNT)]
    word_count: usize,
    /// Number of fittest individuals used as parents
    #[arg(long, default_value_t = DEFAULT_ELITE_COUNT)]
    elite_count: usize,
    /// Probability of taking the first class from the first parent
    #[arg(long, default_value_t = DEFAULT_CROSSOVER_RATE)]
    crossover_rate: f64,
    /// Per-word replacement probability
    #[arg(long, default_value_t = DEFAULT_MUTATION_RATE)]
    mutation_rate: f64,
    /// Number of generations
    #[arg(long, default_value_t = DEFAULT_GENERATIONS)]
    generations: usize,
    /// Breeding attempts per child before reusing a parent
    #[arg(long, default_value_t = DEFAULT_MAX_CHILD_ATTEMPTS)]
    max_child_attempts: usize,
    /// Copy the elites unchanged into the next generation
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    keep_elites: bool,
    /// Score populations on multiple threads
    #[arg(long)]
    parallel_fitness: bool,
    /// 32-character hex seed; a random seed is drawn when omitted
    #[arg(long)]
    seed: Option<RunSeed>,
    /// JSON Lines file the run is appended to
    #[arg(long)]
    history: Option<PathBuf>,
    /// Output file path for the run record
    #[arg(long)]
    output: Option<PathBuf>,
}

impl TrainArg {
    fn params(&self) -> GaParams {
        GaParams {
            population_size: self.population_size,
            word_count: self.word_count,
            elite_count: self.elite_count,
            crossover_rate: self.crossover_rate,
            mutation_rate: self.mutation_rate,
            generations: self.generations,
            max_child_attempts: self.max_child_attempts,
            retain_elites: self.keep_elites,
            parallel_fitness: self.parallel_fitness,
            ..GaParams::default()
        }
    }
}

fn log_progress(progress: &GenerationProgress) {
    tracing::info!(
        generation = progress.generation,
        best = progress.best_fitness,
        mean = progress.stats.mean,
        median = progress.stats.median,
        min = progress.stats.min,
        fallback_children = progress.fallback_children,
        "Generation completed"
    );
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let dataset: Dataset = util::read_json_file("dataset", &arg.dataset)?;
    tracing::info!(
        path = %arg.dataset.display(),
        classes = %dataset.label(),
        vocab = dataset.vocab_len(),
        "Loaded dataset"
    );

    let ga = GeneticAlgorithm::new(&dataset, arg.params()).context("Invalid run parameters")?;
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(%seed, "Seeded run");

    let result = match &arg.history {
        Some(path) => ga.run_seeded(seed, &mut log_progress, &mut JsonlRunHistory::new(path)),
        None => ga.run_seeded(seed, &mut log_progress, &mut Vec::<Run>::new()),
    };
    // a history failure still yields the run, which is saved before reporting
    let (run, history_error) = match result {
        Ok(run) => (run, None),
        Err(GaError::History { run, error }) => (*run, Some(error)),
        Err(e) => return Err(e.into()),
    };

    if let Some(best) = run.final_best_individual() {
        for class in &best.classes {
            tracing::info!(class = %class.class, words = ?class.words, "Best split");
        }
    }
    Output::save_json(&run, arg.output.clone())?;
    if let Some(path) = &arg.output {
        tracing::info!(path = %path.display(), "Run saved");
    }

    if let Some(path) = &arg.history {
        if let Some(error) = history_error {
            return Err(anyhow!(error)).with_context(|| {
                format!(
                    "Failed to append run {} to history file: {}",
                    run.id,
                    path.display()
                )
            });
        }
        tracing::info!(path = %path.display(), "Run appended to history");
    }

    Ok(())
}
