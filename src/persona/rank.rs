//! Relevance scoring and ranking of sections.

use super::keywords::KeywordSet;
use crate::model::Section;

/// Bonus for each keyword found in a section title.
pub const TITLE_MATCH_BONUS: i64 = 15;
/// Penalty for each excluded term found in a section.
pub const DIETARY_PENALTY: i64 = 100;
/// Keyword that switches on the dietary penalty.
pub const DIETARY_TRIGGER: &str = "vegetarian";
/// Terms penalised when the dietary penalty is on.
pub const NON_VEGETARIAN_TERMS: &[&str] =
    &["chicken", "tuna", "beef", "lamb", "pork", "shrimp", "meat"];
/// Maximum number of sections kept by [`rank_sections`].
pub const MAX_RANKED_SECTIONS: usize = 5;

/// Score one section against a keyword set.
///
/// Each keyword adds its non-overlapping occurrences in the content and
/// [`TITLE_MATCH_BONUS`] if it occurs in the title. Matching is
/// case-insensitive.
pub fn score_section(section: &Section, keywords: &KeywordSet) -> i64 {
    let content = section.content.to_lowercase();
    let title = section.title.to_lowercase();

    let mut score = 0i64;
    for keyword in keywords.iter() {
        score += content.matches(keyword).count() as i64;
        if title.contains(keyword) {
            score += TITLE_MATCH_BONUS;
        }
    }

    if keywords.contains(DIETARY_TRIGGER) {
        for term in NON_VEGETARIAN_TERMS {
            if title.contains(term) || content.contains(term) {
                score -= DIETARY_PENALTY;
            }
        }
    }

    score
}

/// Score every section and keep the best positive ones.
///
/// Sections are ordered by descending score, ties keeping their input
/// order; at most [`MAX_RANKED_SECTIONS`] are returned.
pub fn rank_sections(mut sections: Vec<Section>, keywords: &KeywordSet) -> Vec<Section> {
    for section in &mut sections {
        section.score = score_section(section, keywords);
    }
    sections.sort_by(|a, b| b.score.cmp(&a.score));

    sections
        .into_iter()
        .filter(|s| s.score > 0)
        .take(MAX_RANKED_SECTIONS)
        .collect()
}
