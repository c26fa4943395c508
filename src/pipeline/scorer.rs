//! Free-text relevance scoring

use crate::models::Job;

const EXACT_TITLE: u32 = 100;
const TITLE_PREFIX: u32 = 80;
const TITLE_CONTAINS: u32 = 50;
const TITLE_WORD: u32 = 30;
const COMPANY_CONTAINS: u32 = 20;
const DEPARTMENT_EXACT: u32 = 25;
const DEPARTMENT_CONTAINS: u32 = 15;
const DESCRIPTION_CONTAINS: u32 = 10;
const DESCRIPTION_WORD: u32 = 5;

/// A query lowercased, trimmed and split into words
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedQuery {
    text: String,
    words: Vec<String>,
}

impl NormalizedQuery {
    pub fn new(query: &str) -> Self {
        let text = query.trim().to_lowercase();
        let words = text.split_whitespace().map(str::to_string).collect();
        Self { text, words }
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Relevance of `job` for this query; 0 for a blank query
    pub fn score(&self, job: &Job) -> u32 {
        if self.is_blank() {
            return 0;
        }

        let title = job.title.to_lowercase();
        if title == self.text {
            return EXACT_TITLE;
        }

        let mut score = 0;

        if title.starts_with(&self.text) {
            score += TITLE_PREFIX;
        }
        if title.contains(&self.text) {
            score += TITLE_CONTAINS;
        }
        score += TITLE_WORD * self.count_words_in(&title);

        if job.company_name.to_lowercase().contains(&self.text) {
            score += COMPANY_CONTAINS;
        }

        let department = job.department.to_lowercase();
        if department == self.text {
            score += DEPARTMENT_EXACT;
        }
        if department.contains(&self.text) {
            score += DEPARTMENT_CONTAINS;
        }

        let description = job.description.to_lowercase();
        if description.contains(&self.text) {
            score += DESCRIPTION_CONTAINS;
        }
        score += DESCRIPTION_WORD * self.count_words_in(&description);

        score
    }

    fn count_words_in(&self, haystack: &str) -> u32 {
        self.words.iter().filter(|w| haystack.contains(w.as_str())).count() as u32
    }
}

/// Score a single job against a raw query string
pub fn score(job: &Job, query: &str) -> u32 {
    NormalizedQuery::new(query).score(job)
}

/// Jobs with a positive score, best first, ties kept in input order
///
/// A blank query passes every job through unchanged.
pub fn rank<'a>(jobs: impl IntoIterator<Item = &'a Job>, query: &str) -> Vec<&'a Job> {
    let query = NormalizedQuery::new(query);
    if query.is_blank() {
        return jobs.into_iter().collect();
    }

    let mut scored: Vec<(u32, &Job)> = jobs
        .into_iter()
        .filter_map(|job| {
            let score = query.score(job);
            (score > 0).then_some((score, job))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, job)| job).collect()
}
