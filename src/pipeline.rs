use serde::Serialize;
use std::cmp::Ordering;

use crate::models::{PlayerRanking, Region, Team, TeamRanking};
use crate::query::{SortBy, SortOrder, TeamsQuery};

pub trait Regional {
    fn region(&self) -> Region;
}

pub trait Ranked {
    fn rank(&self) -> u32;
}

pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

pub trait Sortable: Ranked {
    fn name(&self) -> &str;
    fn win_rate(&self) -> f64;
    fn points(&self) -> f64;
}

impl Regional for Team {
    fn region(&self) -> Region {
        self.region
    }
}

impl Ranked for Team {
    fn rank(&self) -> u32 {
        self.ranking
    }
}

impl Searchable for Team {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.name.as_str(),
            self.short_name.as_str(),
            self.tag.as_str(),
            self.country.as_str(),
            self.city.as_str(),
        ];
        fields.extend(self.roster.iter().map(|p| p.name.as_str()));
        fields
    }
}

impl Sortable for Team {
    fn name(&self) -> &str {
        &self.name
    }

    fn win_rate(&self) -> f64 {
        self.stats.win_rate
    }

    fn points(&self) -> f64 {
        self.ranking_points as f64
    }
}

impl Regional for TeamRanking {
    fn region(&self) -> Region {
        self.region
    }
}

impl Ranked for TeamRanking {
    fn rank(&self) -> u32 {
        self.rank
    }
}

impl Regional for PlayerRanking {
    fn region(&self) -> Region {
        self.region
    }
}

impl Ranked for PlayerRanking {
    fn rank(&self) -> u32 {
        self.rank
    }
}

pub fn filter_by_region<T: Regional + Clone>(records: &[T], region: Region) -> Vec<T> {
    if region.is_unfiltered() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| r.region() == region)
        .cloned()
        .collect()
}

// inclusive on both ends
pub fn filter_by_rank_range<T: Ranked + Clone>(records: &[T], min: u32, max: u32) -> Vec<T> {
    records
        .iter()
        .filter(|r| (min..=max).contains(&r.rank()))
        .cloned()
        .collect()
}

pub fn search<T: Searchable + Clone>(records: &[T], term: &str) -> Vec<T> {
    let term = term.to_lowercase();
    records
        .iter()
        .filter(|r| {
            r.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
        })
        .cloned()
        .collect()
}

// stable in both directions, ties keep input order
pub fn sort_records<T: Sortable>(records: &mut [T], sort_by: SortBy, order: SortOrder) {
    records.sort_by(|a, b| {
        let ordering = compare(a, b, sort_by);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare<T: Sortable>(a: &T, b: &T, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Ranking => a.rank().cmp(&b.rank()),
        SortBy::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        SortBy::WinRate => a.win_rate().total_cmp(&b.win_rate()),
        SortBy::Points => a.points().total_cmp(&b.points()),
    }
}

pub fn select_teams(teams: &[Team], query: &TeamsQuery) -> Vec<Team> {
    let regional = filter_by_region(teams, query.region);
    let mut selected = filter_by_rank_range(&regional, query.min_rank, query.max_rank);
    if let Some(term) = &query.search {
        selected = search(&selected, term);
    }
    sort_records(&mut selected, query.sort_by, query.sort_order);
    selected
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_teams: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

// page is 1-based
pub fn paginate<T: Clone>(records: &[T], page: u32, limit: u32) -> Page<T> {
    let page = page.max(1);
    let limit = limit.max(1);
    let total = records.len();

    let start = ((page - 1) as usize).saturating_mul(limit as usize);
    let end = start.saturating_add(limit as usize);
    let items = records[start.min(total)..end.min(total)].to_vec();

    Page {
        items,
        pagination: Pagination {
            current_page: page,
            total_pages: total.div_ceil(limit as usize) as u32,
            total_teams: total,
            has_next_page: end < total,
            has_previous_page: page > 1,
            limit,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedData;

    fn teams() -> Vec<Team> {
        SeedData::bundled().unwrap().teams
    }

    fn names(teams: &[Team]) -> Vec<&str> {
        teams.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn region_filter_matches_exactly() {
        let emea = filter_by_region(&teams(), Region::Emea);
        assert_eq!(names(&emea), vec!["FNATIC"]);
    }

    #[test]
    fn region_sentinels_keep_everything() {
        assert_eq!(filter_by_region(&teams(), Region::All).len(), 3);
        assert_eq!(filter_by_region(&teams(), Region::Global).len(), 3);
    }

    #[test]
    fn region_filter_is_idempotent() {
        let once = filter_by_region(&teams(), Region::Apac);
        let twice = filter_by_region(&once, Region::Apac);
        assert_eq!(once, twice);
    }

    #[test]
    fn rank_range_is_inclusive() {
        let ranged = filter_by_rank_range(&teams(), 2, 3);
        assert_eq!(names(&ranged), vec!["FNATIC", "Gen.G"]);
        assert!(filter_by_rank_range(&teams(), 4, 100).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_and_partial() {
        assert_eq!(names(&search(&teams(), "sen")), vec!["Sentinels"]);
        assert_eq!(names(&search(&teams(), "SEOUL")), vec!["Gen.G"]);
    }

    #[test]
    fn search_looks_at_roster_names() {
        assert_eq!(names(&search(&teams(), "tenz")), vec!["Sentinels"]);
        assert!(search(&teams(), "nobody").is_empty());
    }

    #[test]
    fn sorts_by_requested_key() {
        let mut list = teams();
        sort_records(&mut list, SortBy::Ranking, SortOrder::Desc);
        assert_eq!(names(&list), vec!["Gen.G", "FNATIC", "Sentinels"]);

        sort_records(&mut list, SortBy::Name, SortOrder::Asc);
        assert_eq!(names(&list), vec!["FNATIC", "Gen.G", "Sentinels"]);

        sort_records(&mut list, SortBy::WinRate, SortOrder::Desc);
        assert_eq!(names(&list), vec!["Sentinels", "FNATIC", "Gen.G"]);
    }

    #[test]
    fn ties_keep_input_order_in_both_directions() {
        let mut list = teams();
        for team in &mut list {
            team.ranking_points = 1000;
        }
        sort_records(&mut list, SortBy::Points, SortOrder::Asc);
        assert_eq!(names(&list), vec!["Sentinels", "FNATIC", "Gen.G"]);
        sort_records(&mut list, SortBy::Points, SortOrder::Desc);
        assert_eq!(names(&list), vec!["Sentinels", "FNATIC", "Gen.G"]);
    }

    #[test]
    fn select_teams_chains_filters_then_sort() {
        let query = TeamsQuery {
            min_rank: 2,
            sort_by: SortBy::Name,
            sort_order: SortOrder::Desc,
            ..TeamsQuery::default()
        };
        assert_eq!(names(&select_teams(&teams(), &query)), vec!["Gen.G", "FNATIC"]);

        let query = TeamsQuery {
            region: Region::Americas,
            search: Some("korea".into()),
            ..TeamsQuery::default()
        };
        assert!(select_teams(&teams(), &query).is_empty());
    }

    #[test]
    fn pagination_reports_neighbours() {
        let list: Vec<u32> = (1..=45).collect();

        let first = paginate(&list, 1, 20);
        assert_eq!(first.items.len(), 20);
        assert_eq!(first.pagination.total_pages, 3);
        assert!(first.pagination.has_next_page);
        assert!(!first.pagination.has_previous_page);

        let last = paginate(&list, 3, 20);
        assert_eq!(last.items, (41..=45).collect::<Vec<_>>());
        assert!(!last.pagination.has_next_page);
        assert!(last.pagination.has_previous_page);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let list: Vec<u32> = (1..=3).collect();
        let page = paginate(&list, 9, 2);
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total_pages, 2);
        assert!(!page.pagination.has_next_page);
    }

    #[test]
    fn page_length_and_count_hold_for_many_shapes() {
        for total in 0..30usize {
            let list: Vec<usize> = (0..total).collect();
            for limit in 1..8u32 {
                for page in 1..8u32 {
                    let result = paginate(&list, page, limit);
                    assert!(result.items.len() <= limit as usize);
                    assert_eq!(
                        result.pagination.total_pages as usize,
                        total.div_ceil(limit as usize)
                    );
                }
            }
        }
    }
}
