//! Character-level Markov chains trained on example names.
use std::collections::{BTreeMap, HashMap};

use rand::distributions::WeightedIndex;

use crate::error::NameError;
use crate::rng::WorldRng;

pub const DEFAULT_ORDER: usize = 2;
const PAD: char = ' ';

/// Next-character distribution for one context.
#[derive(Debug, Clone)]
struct Transition {
    chars: Vec<char>,
    probs: Vec<f64>,
    index: WeightedIndex<f64>,
}

#[derive(Debug, Clone)]
pub struct MarkovModel {
    order: usize,
    transitions: HashMap<String, Transition>,
}

impl MarkovModel {
    /// Count transitions over space-padded lowercase training names and
    /// normalise them into probabilities. Blank lines are ignored.
    pub fn train<'a>(
        key: &str,
        names: impl IntoIterator<Item = &'a str>,
        order: usize,
    ) -> Result<Self, NameError> {
        let order = order.max(1);
        let mut counts: HashMap<String, BTreeMap<char, u32>> = HashMap::new();
        let mut trained = 0usize;

        for name in names {
            let name = name.trim().to_lowercase();
            if name.is_empty() {
                continue;
            }
            trained += 1;
            let padded: Vec<char> = std::iter::repeat(PAD)
                .take(order)
                .chain(name.chars())
                .chain(std::iter::once(PAD))
                .collect();
            for window in padded.windows(order + 1) {
                let context: String = window[..order].iter().collect();
                *counts.entry(context).or_default().entry(window[order]).or_insert(0) += 1;
            }
        }
        if trained == 0 {
            return Err(NameError::EmptyCorpus { key: key.to_string() });
        }

        let mut transitions = HashMap::with_capacity(counts.len());
        for (context, next) in counts {
            let total: u32 = next.values().sum();
            let chars: Vec<char> = next.keys().copied().collect();
            let probs: Vec<f64> = next.values().map(|&n| n as f64 / total as f64).collect();
            // Every recorded count is positive, so this only fails on an
            // empty successor table, which cannot be recorded.
            if let Ok(index) = WeightedIndex::new(probs.iter().copied()) {
                transitions.insert(context, Transition { chars, probs, index });
            }
        }
        Ok(Self { order, transitions })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of distinct contexts seen in training.
    pub fn contexts(&self) -> usize {
        self.transitions.len()
    }

    /// Probability of `next` following `context`, zero when unseen.
    pub fn probability(&self, context: &str, next: char) -> f64 {
        self.transitions
            .get(context)
            .and_then(|t| t.chars.iter().position(|&c| c == next).map(|i| t.probs[i]))
            .unwrap_or(0.0)
    }

    /// Walk the chain from the padding context.
    ///
    /// Stops on a space once the trimmed name has at least `min_len`
    /// characters, or unconditionally at `max_len`. A context with no
    /// recorded successor restarts from the padding context.
    pub fn generate(&self, min_len: usize, max_len: usize, rng: &mut WorldRng) -> Result<String, NameError> {
        let start: Vec<char> = vec![PAD; self.order];
        let mut context = start.clone();
        let mut name = String::new();

        for _ in 0..max_len.max(1) * 4 {
            let key: String = context.iter().collect();
            let Some(t) = self.transitions.get(&key) else {
                if context == start {
                    return Err(NameError::DeadEnd { context: key });
                }
                context.clone_from(&start);
                continue;
            };
            let next = t.chars[rng.weighted(&t.index)];
            name.push(next);
            context.remove(0);
            context.push(next);

            let len = name.trim().chars().count();
            if (next == PAD && len >= min_len) || len >= max_len {
                return Ok(title_case(name.trim()));
            }
        }
        Err(NameError::DeadEnd { context: context.iter().collect() })
    }
}

/// Uppercase the first letter of each whitespace-separated word.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn transition_probabilities_are_normalised_counts() {
        let model = MarkovModel::train("t", ["ab", "ac", "ab"], 2).unwrap();
        assert_abs_diff_eq!(model.probability(" a", 'b'), 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(model.probability(" a", 'c'), 1.0 / 3.0, epsilon = 1e-12);
        assert_eq!(model.probability("  ", 'a'), 1.0);
        assert_eq!(model.probability("zz", 'a'), 0.0);
    }

    #[test]
    fn empty_corpus_is_an_error() {
        let err = MarkovModel::train("empire_ruins", ["", "   "], 2).unwrap_err();
        assert!(matches!(err, NameError::EmptyCorpus { .. }));
    }

    #[test]
    fn single_name_corpus_reproduces_that_name() {
        let model = MarkovModel::train("t", ["Thornwick"], 2).unwrap();
        let name = model.generate(3, 12, &mut WorldRng::new(1)).unwrap();
        assert_eq!(name, "Thornwick");
    }

    #[test]
    fn output_respects_length_bounds() {
        let corpus = ["aldermoor", "brightwater", "caerwyn", "dunmere", "eastholm", "fallowmere"];
        let model = MarkovModel::train("t", corpus, 2).unwrap();
        let mut rng = WorldRng::new(17);
        for _ in 0..50 {
            let name = model.generate(3, 12, &mut rng).unwrap();
            let len = name.chars().count();
            assert!((3..=12).contains(&len), "{name:?}");
            assert!(name.chars().next().is_some_and(char::is_uppercase));
        }
    }

    #[test]
    fn long_name_is_cut_at_max_length() {
        let model = MarkovModel::train("t", ["abcdefghijklmnop"], 2).unwrap();
        let name = model.generate(3, 5, &mut WorldRng::new(0)).unwrap();
        assert_eq!(name, "Abcde");
    }

    #[test]
    fn title_case_per_word() {
        assert_eq!(title_case("old  KINGS road"), "Old Kings Road");
        assert_eq!(title_case(""), "");
    }
}
