use std::path::PathBuf;

use wordsplit_ga::Run;
use wordsplit_stats::descriptive::DescriptiveStats;

use crate::util::JsonlRunHistory;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct HistoryArg {
    /// JSON Lines history file written by `train --history`
    #[arg(long)]
    history: PathBuf,
    /// Only show runs on this dataset label (e.g. "spam : ham")
    #[arg(long)]
    dataset: Option<String>,
}

/// Change of the best fitness between the first and last generation.
fn improvement(run: &Run) -> Option<i64> {
    let first = run.best_fitnesses.first()?;
    let last = run.best_fitnesses.last()?;
    Some(last - first)
}

#[expect(clippy::cast_precision_loss)]
fn summarize<I>(values: I) -> Option<DescriptiveStats>
where
    I: IntoIterator<Item = i64>,
{
    DescriptiveStats::new(values.into_iter().map(|v| v as f64))
}

pub(crate) fn run(arg: &HistoryArg) -> anyhow::Result<()> {
    let HistoryArg { history, dataset } = arg;
    let runs = JsonlRunHistory::new(history)
        .read_all()?
        .into_iter()
        .filter(|run| dataset.as_ref().is_none_or(|label| run.dataset == *label))
        .collect::<Vec<_>>();

    if runs.is_empty() {
        eprintln!("No runs recorded in {}", history.display());
        return Ok(());
    }

    println!(
        "{:>15}  {:<20}  {:<24}  {:>5}  {:>5}  {:>8}  {:>8}",
        "ID", "CREATED", "DATASET", "POP", "GENS", "BEST", "GAIN"
    );
    for run in &runs {
        println!(
            "{:>15}  {:<20}  {:<24}  {:>5}  {:>5}  {:>8}  {:>8}",
            run.id,
            run.created_at.format("%Y-%m-%d %H:%M:%S"),
            run.dataset,
            run.population_size,
            run.generations,
            display_opt(run.final_best_fitness()),
            display_opt(improvement(run)),
        );
        let fallbacks = run.total_fallback_children();
        if fallbacks > 0 {
            println!("{:>15}  ({fallbacks} fallback children)", "");
        }
    }

    println!();
    println!("{} runs", runs.len());
    if let Some(stats) = summarize(runs.iter().filter_map(Run::final_best_fitness)) {
        print_stats("Final best fitness", &stats);
    }
    if let Some(stats) = summarize(runs.iter().filter_map(improvement)) {
        print_stats("Improvement", &stats);
    }

    Ok(())
}

fn display_opt(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

fn print_stats(title: &str, stats: &DescriptiveStats) {
    println!("{title}:");
    println!("  Min:     {:.1}", stats.min);
    println!("  Max:     {:.1}", stats.max);
    println!("  Mean:    {:.2}", stats.mean);
    println!("  Median:  {:.1}", stats.median);
    println!("  Std dev: {:.2}", stats.std_dev);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(std::iter::empty()).is_none());
    }

    #[test]
    fn test_summarize_values() {
        let stats = summarize([4, 10, 7]).unwrap();
        assert_eq!(stats.min, 4.0);
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.median, 7.0);
    }
}
