use std::{
    fs::{File, OpenOptions},
    io::{self, BufRead as _, BufReader, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use wordsplit_ga::{Run, RunHistory};

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::create(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn create(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Run history stored as a JSON Lines file, one [`Run`] per line.
///
/// The file is created on the first write; existing runs are never rewritten.
#[derive(Debug, Clone)]
pub struct JsonlRunHistory {
    path: PathBuf,
}

impl JsonlRunHistory {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { path: path.into() }
    }

    /// Reads every recorded run, oldest first. A missing file has no runs.
    pub fn read_all(&self) -> anyhow::Result<Vec<Run>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to open history file: {}", self.path.display())
                });
            }
        };

        let mut runs = vec![];
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| {
                format!("Failed to read history file: {}", self.path.display())
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let run = serde_json::from_str(&line).with_context(|| {
                format!(
                    "Failed to parse run on line {} of {}",
                    i + 1,
                    self.path.display()
                )
            })?;
            runs.push(run);
        }
        Ok(runs)
    }
}

impl RunHistory for JsonlRunHistory {
    type Error = io::Error;

    fn record(&mut self, run: Run) -> Result<(), Self::Error> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &run)?;
        writeln!(writer)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, fs};

    use wordsplit_ga::{GaParams, GeneticAlgorithm, NoProgress, RunSeed, dataset::Dataset};

    use super::*;

    fn sample_run(seed: u8) -> Run {
        let word_counts = BTreeMap::from([
            (
                "A".to_owned(),
                BTreeMap::from([("x".to_owned(), 5), ("y".to_owned(), 1)]),
            ),
            (
                "B".to_owned(),
                BTreeMap::from([("z".to_owned(), 5), ("w".to_owned(), 1)]),
            ),
        ]);
        let dataset = Dataset::new(
            vec!["A".to_owned(), "B".to_owned()],
            ["x", "y", "z", "w"].map(String::from).to_vec(),
            word_counts,
        )
        .unwrap();
        let params = GaParams {
            population_size: 6,
            word_count: 4,
            elite_count: 2,
            generations: 3,
            ..GaParams::default()
        };
        GeneticAlgorithm::new(&dataset, params)
            .unwrap()
            .run_seeded(RunSeed::from_bytes([seed; 16]), &mut NoProgress, &mut vec![])
            .unwrap()
    }

    #[test]
    fn test_missing_history_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = JsonlRunHistory::new(dir.path().join("missing.jsonl"));
        assert!(history.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_history_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.jsonl");
        let mut history = JsonlRunHistory::new(&path);

        let first = sample_run(1);
        let second = sample_run(2);
        history.record(first.clone()).unwrap();
        history.record(second.clone()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert_eq!(history.read_all().unwrap(), [first, second]);
    }

    #[test]
    fn test_history_reports_bad_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        fs::write(&path, "{}\n").unwrap();
        let err = JsonlRunHistory::new(&path).read_all().unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_history_record_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = JsonlRunHistory::new(dir.path());
        assert!(history.record(sample_run(3)).is_err());
    }
}
