//! Stable ordering of the filtered collection

use crate::models::{Job, SortOption};
use crate::pipeline::salary::extract_salary_value;
use std::cmp::Reverse;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Accent- and case-insensitive key for title ordering
pub fn collation_key(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Sort in place; `SortOption::None` keeps the incoming order
pub fn sort_jobs(jobs: &mut [&Job], option: SortOption) {
    match option {
        SortOption::None => {}
        SortOption::AlphabeticalAsc => jobs.sort_by_cached_key(|job| title_key(job)),
        SortOption::AlphabeticalDesc => jobs.sort_by_cached_key(|job| Reverse(title_key(job))),
        SortOption::SalaryAsc => jobs.sort_by_cached_key(|job| {
            let value = extract_salary_value(job.salary.as_deref(), false);
            (value == 0, value)
        }),
        SortOption::SalaryDesc => jobs.sort_by_cached_key(|job| {
            let value = extract_salary_value(job.salary.as_deref(), true);
            (value == 0, Reverse(value))
        }),
    }
}

fn title_key(job: &Job) -> (String, String, String) {
    (
        collation_key(&job.title),
        job.title.to_lowercase(),
        job.title.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(jobs: &[&Job]) -> Vec<String> {
        jobs.iter().map(|j| j.title.clone()).collect()
    }

    #[test]
    fn test_salary_desc_puts_missing_last() {
        let jobs = vec![
            Job::new("a", "Hundred", "X").with_salary("$100K"),
            Job::new("b", "None", "X").with_salary("no salary given"),
            Job::new("c", "TwoHundred", "X").with_salary("$200K"),
        ];
        let mut refs: Vec<&Job> = jobs.iter().collect();
        sort_jobs(&mut refs, SortOption::SalaryDesc);
        assert_eq!(titles(&refs), vec!["TwoHundred", "Hundred", "None"]);
    }

    #[test]
    fn test_salary_asc_puts_missing_last_and_keeps_zero_order() {
        let jobs = vec![
            Job::new("a", "Hourly", "X").with_salary("$45 per hour"),
            Job::new("b", "High", "X").with_salary("$150K – $200K"),
            Job::new("c", "Blank", "X"),
            Job::new("d", "Low", "X").with_salary("$90K – $250K"),
        ];
        let mut refs: Vec<&Job> = jobs.iter().collect();
        sort_jobs(&mut refs, SortOption::SalaryAsc);
        assert_eq!(titles(&refs), vec!["Low", "High", "Hourly", "Blank"]);
    }

    #[test]
    fn test_salary_desc_reads_top_of_range() {
        let jobs = vec![
            Job::new("a", "Narrow", "X").with_salary("$150K – $200K"),
            Job::new("b", "Wide", "X").with_salary("$90K – $250K"),
        ];
        let mut refs: Vec<&Job> = jobs.iter().collect();
        sort_jobs(&mut refs, SortOption::SalaryDesc);
        assert_eq!(titles(&refs), vec!["Wide", "Narrow"]);
    }

    #[test]
    fn test_alphabetical_ignores_case_and_accents() {
        let jobs = vec![
            Job::new("a", "zeta", "X"),
            Job::new("b", "Émile Lead", "X"),
            Job::new("c", "Alpha", "X"),
            Job::new("d", "beta", "X"),
        ];
        let mut refs: Vec<&Job> = jobs.iter().collect();

        sort_jobs(&mut refs, SortOption::AlphabeticalAsc);
        assert_eq!(titles(&refs), vec!["Alpha", "beta", "Émile Lead", "zeta"]);

        sort_jobs(&mut refs, SortOption::AlphabeticalDesc);
        assert_eq!(titles(&refs), vec!["zeta", "Émile Lead", "beta", "Alpha"]);
    }

    #[test]
    fn test_none_keeps_order() {
        let jobs = vec![Job::new("a", "B", "X"), Job::new("b", "A", "X")];
        let mut refs: Vec<&Job> = jobs.iter().collect();
        sort_jobs(&mut refs, SortOption::None);
        assert_eq!(titles(&refs), vec!["B", "A"]);
    }

    #[test]
    fn test_collation_key() {
        assert_eq!(collation_key("Crème Brûlée"), "creme brulee");
    }
}
