//! Labeled word-frequency datasets.
//!
//! A [`Dataset`] is the read-only input of an optimization run: two class
//! labels, a vocabulary the individuals draw their words from, and per-class
//! occurrence counts for those words.
//!
//! # Data Structure
//!
//! ```text
//! Dataset
//! ├─ class_names: [first, second]
//! ├─ vocab: [word, ...]            (distinct tokens, indexed by WordId)
//! └─ counts: [[first, second], ...] (one count pair per vocabulary word)
//! ```
//!
//! # Serialization
//!
//! Datasets are (de)serialized through [`RawDataset`], which is validated on
//! the way in:
//!
//! ```json
//! {
//!   "class_names": ["spam", "ham"],
//!   "vocab": ["free", "offer", "meeting", "lunch"],
//!   "word_counts": {
//!     "spam": { "free": 40, "offer": 25 },
//!     "ham": { "meeting": 31, "lunch": 12, "free": 2 }
//!   }
//! }
//! ```
//!
//! A word missing from a class table has count zero. Words listed in a table
//! but not in `vocab` are ignored since no individual can ever select them.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

pub use self::builder::{DatasetBuilder, tokenize};

mod builder;

/// One of the two target classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassIndex {
    First,
    Second,
}

impl ClassIndex {
    /// Both classes, in dataset order.
    pub const ALL: [Self; 2] = [Self::First, Self::Second];

    /// Position of this class in `class_names`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    /// The opposite class.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// Index of a word in a dataset's vocabulary.
///
/// Ids are only meaningful for the dataset that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("#{_0}")]
pub struct WordId(usize);

impl WordId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the word in [`Dataset::vocab`].
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DatasetError {
    #[display("dataset must have exactly two class names, got {count}")]
    ClassCount { count: usize },
    #[display("class names must be distinct, got '{name}' twice")]
    DuplicateClassName { name: String },
    #[display("missing word counts for class '{class}'")]
    MissingWordCounts { class: String },
    #[display("vocabulary is empty")]
    EmptyVocabulary,
    #[display("word '{word}' appears more than once in the vocabulary")]
    DuplicateWord { word: String },
    #[display("unknown class '{class}'")]
    UnknownClass { class: String },
    #[display("word '{word}' is not in the vocabulary")]
    UnknownWord { word: String },
}

/// Unvalidated, serializable form of a [`Dataset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDataset {
    pub class_names: Vec<String>,
    pub vocab: Vec<String>,
    pub word_counts: BTreeMap<String, BTreeMap<String, u32>>,
}

/// A validated dataset with O(1) word-count lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset", into = "RawDataset")]
pub struct Dataset {
    class_names: [String; 2],
    vocab: Vec<String>,
    word_ids: HashMap<String, WordId>,
    counts: Vec<[u32; 2]>,
}

impl Dataset {
    /// Validates and indexes a dataset.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use wordsplit_ga::dataset::{ClassIndex, Dataset};
    ///
    /// let word_counts = BTreeMap::from([
    ///     ("A".to_owned(), BTreeMap::from([("x".to_owned(), 5)])),
    ///     ("B".to_owned(), BTreeMap::new()),
    /// ]);
    /// let dataset = Dataset::new(
    ///     vec!["A".to_owned(), "B".to_owned()],
    ///     vec!["x".to_owned(), "y".to_owned()],
    ///     word_counts,
    /// )?;
    /// let x = dataset.word_id("x").unwrap();
    /// assert_eq!(dataset.count(ClassIndex::First, x), 5);
    /// assert_eq!(dataset.count(ClassIndex::Second, x), 0);
    /// # Ok::<(), wordsplit_ga::dataset::DatasetError>(())
    /// ```
    pub fn new(
        class_names: Vec<String>,
        vocab: Vec<String>,
        word_counts: BTreeMap<String, BTreeMap<String, u32>>,
    ) -> Result<Self, DatasetError> {
        let class_names = validate_class_names(class_names)?;
        let tables = class_names.each_ref().map(|name| word_counts.get(name));
        let [Some(first), Some(second)] = tables else {
            let missing = if tables[0].is_none() {
                &class_names[0]
            } else {
                &class_names[1]
            };
            return Err(DatasetError::MissingWordCounts {
                class: missing.clone(),
            });
        };

        let counts = vocab
            .iter()
            .map(|word| {
                [
                    first.get(word).copied().unwrap_or(0),
                    second.get(word).copied().unwrap_or(0),
                ]
            })
            .collect();
        Self::from_parts(class_names, vocab, counts)
    }

    /// Builds a dataset from an already aligned count table.
    pub(crate) fn from_parts(
        class_names: [String; 2],
        vocab: Vec<String>,
        counts: Vec<[u32; 2]>,
    ) -> Result<Self, DatasetError> {
        debug_assert_eq!(vocab.len(), counts.len());
        if vocab.is_empty() {
            return Err(DatasetError::EmptyVocabulary);
        }
        let mut word_ids = HashMap::with_capacity(vocab.len());
        for (i, word) in vocab.iter().enumerate() {
            if word_ids.insert(word.clone(), WordId::new(i)).is_some() {
                return Err(DatasetError::DuplicateWord { word: word.clone() });
            }
        }
        Ok(Self {
            class_names,
            vocab,
            word_ids,
            counts,
        })
    }

    #[must_use]
    pub fn class_names(&self) -> &[String; 2] {
        &self.class_names
    }

    #[must_use]
    pub fn class_name(&self, class: ClassIndex) -> &str {
        &self.class_names[class.index()]
    }

    /// Looks up a class by its label.
    #[must_use]
    pub fn class_index(&self, name: &str) -> Option<ClassIndex> {
        ClassIndex::ALL
            .into_iter()
            .find(|class| self.class_name(*class) == name)
    }

    /// Human-readable label of the form `"first : second"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} : {}", self.class_names[0], self.class_names[1])
    }

    #[must_use]
    pub fn vocab(&self) -> &[String] {
        &self.vocab
    }

    #[must_use]
    pub fn vocab_len(&self) -> usize {
        self.vocab.len()
    }

    /// Returns the token for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this dataset.
    #[must_use]
    pub fn word(&self, id: WordId) -> &str {
        &self.vocab[id.index()]
    }

    #[must_use]
    pub fn word_id(&self, word: &str) -> Option<WordId> {
        self.word_ids.get(word).copied()
    }

    /// Occurrence count of a word in a class.
    #[must_use]
    pub fn count(&self, class: ClassIndex, id: WordId) -> u32 {
        self.counts[id.index()][class.index()]
    }
}

fn validate_class_names(class_names: Vec<String>) -> Result<[String; 2], DatasetError> {
    let count = class_names.len();
    let [first, second]: [String; 2] = class_names
        .try_into()
        .map_err(|_| DatasetError::ClassCount { count })?;
    if first == second {
        return Err(DatasetError::DuplicateClassName { name: first });
    }
    Ok([first, second])
}

impl TryFrom<RawDataset> for Dataset {
    type Error = DatasetError;

    fn try_from(raw: RawDataset) -> Result<Self, Self::Error> {
        Self::new(raw.class_names, raw.vocab, raw.word_counts)
    }
}

impl From<Dataset> for RawDataset {
    fn from(dataset: Dataset) -> Self {
        let word_counts = ClassIndex::ALL
            .into_iter()
            .map(|class| {
                let table = dataset
                    .vocab
                    .iter()
                    .zip(&dataset.counts)
                    .map(|(word, counts)| (word, counts[class.index()]))
                    .filter(|(_, count)| *count > 0)
                    .map(|(word, count)| (word.clone(), count))
                    .collect();
                (dataset.class_name(class).to_owned(), table)
            })
            .collect();
        let Dataset {
            class_names, vocab, ..
        } = dataset;
        RawDataset {
            class_names: class_names.into(),
            vocab,
            word_counts,
        }
    }
}
