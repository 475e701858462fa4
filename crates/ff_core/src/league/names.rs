//! Team name resolution
//!
//! Platforms report team names with markup, odd spacing or punctuation. The
//! cascade below maps a raw name onto exactly one canonical name, or fails.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, TradeError};

/// Minimum similarity ratio for a fuzzy team lookup.
pub const TEAM_NAME_MATCH_CAP: f64 = 0.85;

static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"));
static NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]").expect("alphanumeric pattern is valid"));

/// Strips markup tags and collapses whitespace.
pub fn clean(name: &str) -> String {
    let stripped = MARKUP.replace_all(name, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps ASCII letters and digits only.
pub fn alphanumeric(name: &str) -> String {
    NON_ALNUM.replace_all(name, "").into_owned()
}

/// Maps a raw team name onto one of `candidates`.
///
/// Steps, first hit wins: exact; cleaned candidate; cleaned both sides;
/// alphanumeric-only candidate; alphanumeric-only both sides. Two or more hits
/// in the same step is an error.
pub fn resolve<S: AsRef<str>>(query: &str, candidates: &[S]) -> Result<String> {
    let cleaned: Vec<String> = candidates.iter().map(|c| clean(c.as_ref())).collect();
    let stripped: Vec<String> = cleaned.iter().map(|c| alphanumeric(c)).collect();
    let clean_query = clean(query);
    let stripped_query = alphanumeric(query);

    let steps: [&dyn Fn(usize) -> bool; 5] = [
        &|i: usize| candidates[i].as_ref() == query,
        &|i: usize| cleaned[i] == query,
        &|i: usize| cleaned[i] == clean_query,
        &|i: usize| stripped[i] == query,
        &|i: usize| stripped[i] == stripped_query,
    ];

    for step in steps {
        let hits: Vec<usize> = (0..candidates.len()).filter(|&i| step(i)).collect();
        match hits.as_slice() {
            [] => continue,
            [only] => return Ok(candidates[*only].as_ref().to_string()),
            _ => {
                return Err(TradeError::AmbiguousTeamName {
                    query: query.to_string(),
                    matches: hits.iter().map(|&i| candidates[i].as_ref().to_string()).collect(),
                })
            }
        }
    }

    Err(TradeError::UnknownTeam {
        query: query.to_string(),
        options: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
    })
}

/// Index of the single candidate similar enough to `query`.
///
/// An exact match always wins. Otherwise exactly one candidate must reach
/// `threshold`; none or several is a failure listing the options.
pub fn fuzzy_find<S: AsRef<str>>(query: &str, candidates: &[S], threshold: f64) -> Result<usize> {
    if let Some(i) = candidates.iter().position(|c| c.as_ref() == query) {
        return Ok(i);
    }

    let valid: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| similarity(query, c.as_ref()) >= threshold)
        .map(|(i, _)| i)
        .collect();

    match valid.as_slice() {
        [only] => Ok(*only),
        [] => Err(TradeError::UnknownTeam {
            query: query.to_string(),
            options: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
        }),
        _ => Err(TradeError::AmbiguousTeamName {
            query: query.to_string(),
            matches: valid.iter().map(|&i| candidates[i].as_ref().to_string()).collect(),
        }),
    }
}

/// Ratcliff/Obershelp similarity: `2 * matched / (len(a) + len(b))`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + len..], &b[j + len..])
}

/// Earliest longest common substring as `(start in a, start in b, length)`.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for i in 0..a.len() {
        for j in 0..b.len() {
            curr[j + 1] = if a[i] == b[j] { prev[j] + 1 } else { 0 };
            if curr[j + 1] > best.2 {
                best = (i + 1 - curr[j + 1], j + 1 - curr[j + 1], curr[j + 1]);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    best
}
