//! Candidate solutions: a word budget split between two classes.

use std::collections::HashSet;

use rand::{Rng, seq::index};
use serde::{Deserialize, Serialize};

use crate::dataset::{ClassIndex, Dataset, DatasetError, WordId};

/// A candidate solution assigning words to each of the two classes.
///
/// Equality and hashing are structural: two individuals are equal when both
/// class sequences hold the same words in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Individual {
    classes: [Vec<WordId>; 2],
}

/// Per-class sizes for a word budget: `floor(n / 2)` and the remainder.
///
/// ```
/// use wordsplit_ga::individual::class_split;
///
/// assert_eq!(class_split(4), [2, 2]);
/// assert_eq!(class_split(5), [2, 3]);
/// ```
#[must_use]
pub const fn class_split(word_count: usize) -> [usize; 2] {
    let first = word_count / 2;
    [first, word_count - first]
}

impl Individual {
    #[must_use]
    pub fn new(first: Vec<WordId>, second: Vec<WordId>) -> Self {
        Self {
            classes: [first, second],
        }
    }

    /// Draws `word_count` distinct vocabulary words in random order and
    /// splits them between the classes as given by [`class_split`].
    ///
    /// # Panics
    ///
    /// Panics if `word_count` exceeds the vocabulary size.
    pub fn random<R>(rng: &mut R, word_count: usize, dataset: &Dataset) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(
            word_count <= dataset.vocab_len(),
            "word count {word_count} exceeds vocabulary size {}",
            dataset.vocab_len()
        );
        let [first_len, _] = class_split(word_count);
        let mut drawn = index::sample(rng, dataset.vocab_len(), word_count)
            .into_iter()
            .map(WordId::new)
            .collect::<Vec<_>>();
        let second = drawn.split_off(first_len);
        Self::new(drawn, second)
    }

    /// Builds an individual from word tokens.
    pub fn from_words(
        dataset: &Dataset,
        first: &[&str],
        second: &[&str],
    ) -> Result<Self, DatasetError> {
        let resolve = |words: &[&str]| {
            words
                .iter()
                .map(|word| {
                    dataset
                        .word_id(word)
                        .ok_or_else(|| DatasetError::UnknownWord {
                            word: (*word).to_owned(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()
        };
        Ok(Self::new(resolve(first)?, resolve(second)?))
    }

    #[must_use]
    pub fn words(&self, class: ClassIndex) -> &[WordId] {
        &self.classes[class.index()]
    }

    pub(crate) fn words_mut(&mut self, class: ClassIndex) -> &mut [WordId] {
        &mut self.classes[class.index()]
    }

    /// Total number of words across both classes.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.classes.iter().map(Vec::len).sum()
    }

    /// Returns `true` if no class holds the same word twice.
    ///
    /// The same word may still appear in both classes.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.classes.iter().all(|words| all_distinct(words))
    }

    /// Resolves word ids back to tokens.
    #[must_use]
    pub fn to_labeled(&self, dataset: &Dataset) -> LabeledIndividual {
        LabeledIndividual {
            classes: ClassIndex::ALL.map(|class| ClassWords {
                class: dataset.class_name(class).to_owned(),
                words: self
                    .words(class)
                    .iter()
                    .map(|id| dataset.word(*id).to_owned())
                    .collect(),
            }),
        }
    }
}

fn all_distinct(words: &[WordId]) -> bool {
    let mut seen = HashSet::with_capacity(words.len());
    words.iter().all(|word| seen.insert(*word))
}

/// Token-level rendering of an [`Individual`], stored in run records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledIndividual {
    pub classes: [ClassWords; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassWords {
    pub class: String,
    pub words: Vec<String>,
}
