use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use anyhow::{Context as _, bail};
use wordsplit_ga::dataset::{Dataset, DatasetBuilder};

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct BuildDatasetArg {
    /// Tab-separated input, one `label<TAB>text` document per line
    #[arg(long)]
    input: PathBuf,
    /// Class labels; exactly two
    #[arg(long = "class", required = true, num_args = 1)]
    classes: Vec<String>,
    /// Drop words seen fewer times than this across both classes
    #[arg(long, default_value_t = 1)]
    min_count: u32,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Counts every document of `reader` into a dataset.
///
/// Blank lines are skipped. Lines without a tab or with a label that is not
/// one of the classes are errors.
fn build<R>(reader: R, classes: Vec<String>, min_count: u32) -> anyhow::Result<Dataset>
where
    R: BufRead,
{
    let mut builder = DatasetBuilder::new(classes)?;
    let mut documents = 0;
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.with_context(|| format!("Failed to read line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let Some((label, text)) = line.split_once('\t') else {
            bail!("Line {line_no}: expected `label<TAB>text`");
        };
        builder
            .add_document(label.trim(), text)
            .with_context(|| format!("Line {line_no}"))?;
        documents += 1;
    }
    tracing::info!(
        documents,
        distinct_words = builder.distinct_words(),
        "Counted documents"
    );
    let dataset = builder.build(min_count)?;
    Ok(dataset)
}

pub(crate) fn run(arg: &BuildDatasetArg) -> anyhow::Result<()> {
    let BuildDatasetArg {
        input,
        classes,
        min_count,
        output,
    } = arg;
    let file = File::open(input)
        .with_context(|| format!("Failed to open input file: {}", input.display()))?;
    let dataset = build(BufReader::new(file), classes.clone(), *min_count)
        .with_context(|| format!("Failed to build dataset from {}", input.display()))?;
    tracing::info!(
        classes = %dataset.label(),
        vocab = dataset.vocab_len(),
        min_count,
        "Built dataset"
    );
    Output::save_json(&dataset, output.clone())?;
    Ok(())
}
