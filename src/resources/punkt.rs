//! Punkt sentence-boundary parameters, read from NLTK's `punkt_tab` layout.
//!
//! Each language directory holds plain-text tables:
//!
//! - `abbrev_types.txt`: one lower-case abbreviation per line, final period removed
//! - `collocations.tab`: `first<TAB>second` word pairs that never straddle a boundary
//! - `sent_starters.txt`: words that frequently begin a sentence
//! - `ortho_context.tab`: `word<TAB>flags`, where the flags record whether the
//!   word was seen upper- or lower-case at the start, middle, or an unknown
//!   position of a sentence

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{ResourceError, ResourceResult};

pub const ABBREV_FILE: &str = "abbrev_types.txt";
pub const COLLOCATIONS_FILE: &str = "collocations.tab";
pub const SENT_STARTERS_FILE: &str = "sent_starters.txt";
pub const ORTHO_CONTEXT_FILE: &str = "ortho_context.tab";

/// Seen upper-case at the start of a sentence.
pub const ORTHO_BEG_UC: u32 = 1 << 1;
/// Seen upper-case inside a sentence.
pub const ORTHO_MID_UC: u32 = 1 << 2;
/// Seen upper-case at an unknown position.
pub const ORTHO_UNK_UC: u32 = 1 << 3;
/// Seen lower-case at the start of a sentence.
pub const ORTHO_BEG_LC: u32 = 1 << 4;
/// Seen lower-case inside a sentence.
pub const ORTHO_MID_LC: u32 = 1 << 5;
/// Seen lower-case at an unknown position.
pub const ORTHO_UNK_LC: u32 = 1 << 6;

const ORTHO_UC: u32 = ORTHO_BEG_UC | ORTHO_MID_UC | ORTHO_UNK_UC;
const ORTHO_LC: u32 = ORTHO_BEG_LC | ORTHO_MID_LC | ORTHO_UNK_LC;

/// Learned punkt tables for one language.
#[derive(Debug, Clone, Default)]
pub struct PunktParameters {
    abbreviations: HashSet<String>,
    collocations: HashSet<(String, String)>,
    sentence_starters: HashSet<String>,
    ortho_context: HashMap<String, u32>,
}

impl PunktParameters {
    /// Build parameters from in-memory tables. Entries are lower-cased.
    pub fn from_parts<'a>(
        abbreviations: impl IntoIterator<Item = &'a str>,
        collocations: impl IntoIterator<Item = (&'a str, &'a str)>,
        sentence_starters: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            abbreviations: abbreviations.into_iter().map(str::to_lowercase).collect(),
            collocations: collocations
                .into_iter()
                .map(|(a, b)| (a.to_lowercase(), b.to_lowercase()))
                .collect(),
            sentence_starters: sentence_starters.into_iter().map(str::to_lowercase).collect(),
            ortho_context: HashMap::new(),
        }
    }

    /// Add orthographic context flags. Flags for a repeated word are merged.
    pub fn with_ortho_context<'a>(mut self, entries: impl IntoIterator<Item = (&'a str, u32)>) -> Self {
        for (word, flags) in entries {
            *self.ortho_context.entry(word.to_lowercase()).or_default() |= flags;
        }
        self
    }

    /// Load the tables from a `punkt_tab/<language>/` directory.
    ///
    /// `abbrev_types.txt` is mandatory; the other tables may be absent.
    pub fn load(dir: &Path) -> ResourceResult<Self> {
        let abbrev_path = dir.join(ABBREV_FILE);
        let abbrevs = std::fs::read_to_string(&abbrev_path).map_err(|e| ResourceError::Io {
            path: abbrev_path.display().to_string(),
            source: e,
        })?;
        let collocations = read_optional(&dir.join(COLLOCATIONS_FILE))?;
        let starters = read_optional(&dir.join(SENT_STARTERS_FILE))?;
        let ortho = read_optional(&dir.join(ORTHO_CONTEXT_FILE))?;

        Ok(Self::from_parts(
            table_lines(&abbrevs),
            table_lines(&collocations).filter_map(|line| line.split_once('\t')),
            table_lines(&starters),
        )
        .with_ortho_context(table_lines(&ortho).filter_map(|line| {
            let (word, flags) = line.split_once('\t')?;
            Some((word, flags.trim().parse().ok()?))
        })))
    }

    pub fn is_abbreviation(&self, word: &str) -> bool {
        self.abbreviations.contains(word)
    }

    pub fn is_collocation(&self, first: &str, second: &str) -> bool {
        // HashSet<(String, String)> can't be probed with borrowed halves.
        self.collocations
            .contains(&(first.to_string(), second.to_string()))
    }

    pub fn is_sentence_starter(&self, word: &str) -> bool {
        self.sentence_starters.contains(word)
    }

    /// Whether `word` was ever seen in lower case.
    pub fn seen_lower_case(&self, word: &str) -> bool {
        self.ortho(word) & ORTHO_LC != 0
    }

    /// Punkt's orthographic heuristic for the word after a candidate boundary.
    ///
    /// `Some(true)`: the word starts a sentence here. `Some(false)`: it does
    /// not. `None`: no evidence either way.
    pub fn ortho_heuristic(&self, word: &str, first_upper: bool, first_lower: bool) -> Option<bool> {
        let ctx = self.ortho(word);
        if first_upper && ctx & ORTHO_LC != 0 && ctx & ORTHO_MID_UC == 0 {
            Some(true)
        } else if first_lower && (ctx & ORTHO_UC != 0 || ctx & ORTHO_BEG_LC == 0) {
            Some(false)
        } else {
            None
        }
    }

    fn ortho(&self, word: &str) -> u32 {
        self.ortho_context.get(word).copied().unwrap_or(0)
    }

    pub fn abbreviation_count(&self) -> usize {
        self.abbreviations.len()
    }
}

fn read_optional(path: &Path) -> ResourceResult<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(ResourceError::Io {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

fn table_lines(content: &str) -> impl Iterator<Item = &str> {
    content.lines().map(str::trim).filter(|l| !l.is_empty())
}
