use super::models::{CandidateRow, SimilarUser, SimilarUsersPage, SimilarityFilter};
use std::cmp::Ordering;
use time::Date;

pub const PAGE_SIZE: usize = 10;

/// Year difference only, month and day are ignored.
pub fn approximate_age(date_of_birth: Date, reference_year: i32) -> i32 {
    reference_year - date_of_birth.year()
}

impl SimilarityFilter {
    fn has_age_bounds(&self) -> bool {
        self.age_min.is_some() || self.age_max.is_some()
    }

    fn admits(&self, age: Option<i32>) -> bool {
        if !self.has_age_bounds() {
            return true;
        }
        let Some(age) = age else {
            return false;
        };
        let age = i64::from(age);
        self.age_min.map_or(true, |min| age >= i64::from(min))
            && self.age_max.map_or(true, |max| age <= i64::from(max))
    }
}

/// Case-insensitive, with the raw value as tiebreak.
/// Missing and blank names go after every named candidate.
fn compare_names(a: &Option<String>, b: &Option<String>) -> Ordering {
    let a = a.as_deref().filter(|name| !name.trim().is_empty());
    let b = b.as_deref().filter(|name| !name.trim().is_empty());
    match (a, b) {
        (Some(a), Some(b)) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filters by age, orders by shared hobbies (desc), then name, then id, and cuts one page.
pub fn rank_candidates(
    candidates: Vec<CandidateRow>,
    filter: &SimilarityFilter,
    reference_year: i32,
) -> SimilarUsersPage {
    let mut ranked: Vec<SimilarUser> = candidates
        .into_iter()
        .map(|row| SimilarUser {
            id: row.id,
            name: row.name,
            common_hobbies: row.common_hobbies,
            age: row
                .date_of_birth
                .map(|date| approximate_age(date, reference_year)),
        })
        .filter(|user| filter.admits(user.age))
        .collect();

    ranked.sort_by(|a, b| {
        b.common_hobbies
            .cmp(&a.common_hobbies)
            .then_with(|| compare_names(&a.name, &b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    let pages = ranked.len().div_ceil(PAGE_SIZE) as u32;
    let page = filter.page.unwrap_or(1);

    let users = match page {
        0 => Vec::new(),
        page => ranked
            .into_iter()
            .skip((page as usize - 1).saturating_mul(PAGE_SIZE))
            .take(PAGE_SIZE)
            .collect(),
    };

    SimilarUsersPage { users, page, pages }
}
