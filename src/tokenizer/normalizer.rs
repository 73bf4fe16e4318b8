use std::collections::{HashMap, HashSet};

use stop_words::{get, LANGUAGE};
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::AnalyzerConfig;

/// Text analyzer: casefolding, diacritic stripping and boundary splitting
#[derive(Clone, Debug)]
pub struct Analyzer {
    config: AnalyzerConfig,
    stopwords: HashSet<String>,
}

impl Analyzer {
    /// Create a new analyzer from configuration
    pub fn new(config: &AnalyzerConfig) -> Self {
        let stopwords = if config.remove_stopwords {
            get(LANGUAGE::English)
                .into_iter()
                .map(|s| fold(&s))
                .collect()
        } else {
            HashSet::new()
        };

        Self {
            config: config.clone(),
            stopwords,
        }
    }

    /// Normalize text into a sequence of tokens
    ///
    /// Running the output back through `normalize` (joined with any
    /// separator) yields the same tokens.
    ///
    /// # Example
    ///
    /// ```
    /// use cinedex::config::AnalyzerConfig;
    /// use cinedex::tokenizer::Analyzer;
    ///
    /// let analyzer = Analyzer::new(&AnalyzerConfig::default());
    /// assert_eq!(analyzer.normalize("Amélie, Sci-Fi!"), vec!["amelie", "sci", "fi"]);
    /// ```
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let folded = fold(text);
        folded
            .unicode_words()
            .flat_map(|word| word.split(|c: char| !c.is_alphanumeric()))
            .filter(|token| self.keep(token))
            .map(str::to_string)
            .collect()
    }

    /// Count token occurrences for a piece of text
    pub fn term_frequencies(&self, text: &str) -> HashMap<String, u32> {
        let mut freq = HashMap::new();
        for token in self.normalize(text) {
            *freq.entry(token).or_insert(0) += 1;
        }
        freq
    }

    /// Collapse text into a single exact-match key
    ///
    /// "Sci-Fi" and "sci fi" share the key `sci fi`.
    pub fn keyword(&self, text: &str) -> String {
        self.normalize(text).join(" ")
    }

    /// Whether text produces no tokens at all
    pub fn is_blank(&self, text: &str) -> bool {
        self.normalize(text).is_empty()
    }

    fn keep(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        let len = token.chars().count();
        len >= self.config.min_token_length
            && len <= self.config.max_token_length
            && !self.stopwords.contains(token)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(&AnalyzerConfig::default())
    }
}

/// Canonically decompose, drop diacritical marks and lowercase
pub fn fold(text: &str) -> String {
    let stripped: String = text.nfd().filter(|c| !is_diacritic(*c)).collect();
    stripped.to_lowercase()
}

/// Combining diacritical mark blocks
pub fn is_diacritic(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}
