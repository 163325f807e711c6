use std::collections::HashMap;

use super::{ClassIndex, Dataset, DatasetError, validate_class_names};

/// Accumulates per-class word counts from labeled documents.
///
/// # Example
///
/// ```
/// use wordsplit_ga::dataset::{ClassIndex, DatasetBuilder};
///
/// let mut builder = DatasetBuilder::new(vec!["spam".to_owned(), "ham".to_owned()])?;
/// builder.add_document("spam", "Free offer! Claim your FREE prize")?;
/// builder.add_document("ham", "Lunch meeting moved to noon")?;
///
/// let dataset = builder.build(1)?;
/// let free = dataset.word_id("free").unwrap();
/// assert_eq!(dataset.count(ClassIndex::First, free), 2);
/// assert_eq!(dataset.vocab()[0], "free");
/// # Ok::<(), wordsplit_ga::dataset::DatasetError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    class_names: [String; 2],
    counts: HashMap<String, [u32; 2]>,
}

impl DatasetBuilder {
    pub fn new(class_names: Vec<String>) -> Result<Self, DatasetError> {
        Ok(Self {
            class_names: validate_class_names(class_names)?,
            counts: HashMap::new(),
        })
    }

    /// Counts the words of `text` towards the class labeled `class`.
    pub fn add_document(&mut self, class: &str, text: &str) -> Result<(), DatasetError> {
        let class = ClassIndex::ALL
            .into_iter()
            .find(|c| self.class_names[c.index()] == class)
            .ok_or_else(|| DatasetError::UnknownClass {
                class: class.to_owned(),
            })?;
        self.add_class_document(class, text);
        Ok(())
    }

    pub fn add_class_document(&mut self, class: ClassIndex, text: &str) {
        for word in tokenize(text) {
            let counts = self.counts.entry(word).or_default();
            counts[class.index()] = counts[class.index()].saturating_add(1);
        }
    }

    /// Number of distinct words seen so far.
    #[must_use]
    pub fn distinct_words(&self) -> usize {
        self.counts.len()
    }

    /// Builds the dataset from every word seen at least `min_count` times
    /// across both classes.
    ///
    /// The vocabulary is ordered by descending total count, ties broken
    /// lexicographically, so the output is deterministic.
    pub fn build(self, min_count: u32) -> Result<Dataset, DatasetError> {
        let total = |counts: &[u32; 2]| u64::from(counts[0]) + u64::from(counts[1]);
        let mut entries = self
            .counts
            .into_iter()
            .filter(|(_, counts)| total(counts) >= u64::from(min_count))
            .collect::<Vec<_>>();
        entries.sort_by(|(a_word, a), (b_word, b)| {
            total(b).cmp(&total(a)).then_with(|| a_word.cmp(b_word))
        });
        let (vocab, counts) = entries.into_iter().unzip();
        Dataset::from_parts(self.class_names, vocab, counts)
    }
}

/// Splits text into lowercase word tokens.
///
/// Tokens are maximal runs of alphanumeric characters and apostrophes, with
/// leading and trailing apostrophes removed.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|token| token.trim_matches('\''))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}
