use wordsplit_ga::{
    CancelToken, GaError, GaParams, GenerationProgress, GeneticAlgorithm, NoProgress, ParamsError,
    Run, RunSeed, dataset::Dataset,
};

fn dataset() -> Dataset {
    let json = r#"{
        "class_names": ["sports", "politics"],
        "vocab": [
            "goal", "match", "team", "coach", "season",
            "vote", "senate", "policy", "election", "minister",
            "the", "week"
        ],
        "word_counts": {
            "sports": {
                "goal": 30, "match": 25, "team": 40, "coach": 12, "season": 18,
                "vote": 1, "the": 50, "week": 8
            },
            "politics": {
                "vote": 35, "senate": 22, "policy": 27, "election": 30, "minister": 15,
                "team": 3, "the": 55, "week": 9
            }
        }
    }"#;
    serde_json::from_str(json).unwrap()
}

fn params() -> GaParams {
    GaParams {
        population_size: 20,
        word_count: 4,
        elite_count: 4,
        crossover_rate: 0.7,
        mutation_rate: 0.05,
        generations: 10,
        ..GaParams::default()
    }
}

fn seed() -> RunSeed {
    "0123456789abcdef0123456789abcdef".parse().unwrap()
}

fn run_with_seed(dataset: &Dataset, seed: RunSeed) -> (Run, Vec<Run>) {
    let ga = GeneticAlgorithm::new(dataset, params()).unwrap();
    let mut history = vec![];
    let run = ga.run_seeded(seed, &mut NoProgress, &mut history).unwrap();
    (run, history)
}

#[test]
fn test_fixed_seed_run() {
    let dataset = dataset();
    let (run, history) = run_with_seed(&dataset, seed());

    assert_eq!(run.dataset, "sports : politics");
    assert_eq!(run.population_size, 20);
    assert_eq!(run.word_count, 4);
    assert_eq!(run.elite_count, 4);
    assert_eq!(run.generations, 10);
    assert_eq!(run.seed, Some(seed()));
    assert_eq!(run.id, run.created_at.timestamp_millis());

    assert_eq!(run.best_individuals.len(), 10);
    assert_eq!(run.best_fitnesses.len(), 10);
    assert_eq!(run.average_fitnesses.len(), 10);
    assert!(run.best_fitnesses.windows(2).all(|w| w[0] <= w[1]));

    for individual in &run.best_individuals {
        let [first, second] = &individual.classes;
        assert_eq!(first.class, "sports");
        assert_eq!(second.class, "politics");
        assert_eq!(first.words.len(), 2);
        assert_eq!(second.words.len(), 2);
    }

    assert_eq!(history, [run]);
}

#[test]
fn test_same_seed_same_histories() {
    let dataset = dataset();
    let (a, _) = run_with_seed(&dataset, seed());
    let (b, _) = run_with_seed(&dataset, seed());

    assert_eq!(a.best_individuals, b.best_individuals);
    assert_eq!(a.best_fitnesses, b.best_fitnesses);
    assert_eq!(a.average_fitnesses, b.average_fitnesses);
    assert_eq!(a.fallback_children, b.fallback_children);
}

#[test]
fn test_parallel_fitness_matches_sequential() {
    let dataset = dataset();
    let (sequential, _) = run_with_seed(&dataset, seed());
    let ga = GeneticAlgorithm::new(
        &dataset,
        GaParams {
            parallel_fitness: true,
            ..params()
        },
    )
    .unwrap();
    let parallel = ga
        .run_seeded(seed(), &mut NoProgress, &mut vec![])
        .unwrap();
    assert_eq!(parallel.best_fitnesses, sequential.best_fitnesses);
    assert_eq!(parallel.average_fitnesses, sequential.average_fitnesses);
}

#[test]
fn test_observer_sees_every_generation() {
    let dataset = dataset();
    let ga = GeneticAlgorithm::new(&dataset, params()).unwrap();
    let mut generations = vec![];
    let mut observer = |progress: &GenerationProgress| {
        assert!(progress.stats.mean <= progress.stats.max);
        generations.push(progress.generation);
    };
    ga.run_seeded(seed(), &mut observer, &mut vec![]).unwrap();
    assert_eq!(generations, (1..=10).collect::<Vec<_>>());
}

#[test]
fn test_cancelled_run_records_nothing() {
    let dataset = dataset();
    let cancel = CancelToken::new();
    cancel.cancel();
    let ga = GeneticAlgorithm::new(&dataset, params())
        .unwrap()
        .with_cancel(cancel);
    let mut history = vec![];
    let err = ga
        .run_seeded(seed(), &mut NoProgress, &mut history)
        .unwrap_err();
    assert!(matches!(
        err,
        GaError::Cancelled {
            completed_generations: 0
        }
    ));
    assert!(history.is_empty());
}

#[test]
fn test_word_count_larger_than_vocab_rejected() {
    let dataset = dataset();
    let err = GeneticAlgorithm::new(
        &dataset,
        GaParams {
            word_count: 13,
            ..params()
        },
    )
    .unwrap_err();
    assert_eq!(
        err,
        ParamsError::WordCountExceedsVocabulary {
            word_count: 13,
            vocab_len: 12
        }
    );
}

#[test]
fn test_run_json_roundtrip() {
    let dataset = dataset();
    let (run, _) = run_with_seed(&dataset, seed());
    let json = serde_json::to_string_pretty(&run).unwrap();
    let parsed: Run = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, run);
}
