use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Facet {
    Category,
    City,
    Source,
}

impl Facet {
    pub const ALL: [Facet; 3] = [Facet::Category, Facet::City, Facet::Source];

    /// Query parameter name on `/api/jobs`.
    pub fn param(self) -> &'static str {
        match self {
            Facet::Category => "category",
            Facet::City => "city",
            Facet::Source => "source",
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            Facet::Category => "filter-label-category",
            Facet::City => "filter-label-location",
            Facet::Source => "filter-label-source",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    BestMatch,
    Oldest,
}

impl SortOrder {
    pub fn param(self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::BestMatch => "score",
            SortOrder::Oldest => "oldest",
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            SortOrder::Newest => "sort-newest",
            SortOrder::BestMatch => "sort-score",
            SortOrder::Oldest => "sort-oldest",
        }
    }

    pub fn next(self) -> SortOrder {
        match self {
            SortOrder::Newest => SortOrder::BestMatch,
            SortOrder::BestMatch => SortOrder::Oldest,
            SortOrder::Oldest => SortOrder::Newest,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "score" | "best" | "best-match" => Ok(SortOrder::BestMatch),
            "oldest" => Ok(SortOrder::Oldest),
            other => Err(format!("unknown sort '{other}' (expected newest, score or oldest)")),
        }
    }
}

/// Active filter selections. Each facet is single-select.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    facets: BTreeMap<Facet, String>,
    search: String,
    only_new: bool,
    exclude_non_local: bool,
    min_salary: Option<u32>,
    sort: SortOrder,
}

impl FilterState {
    pub fn selected(&self, facet: Facet) -> Option<&str> {
        self.facets.get(&facet).map(String::as_str)
    }

    /// Select `value` for `facet`, or clear it when it is already selected.
    pub fn toggle_facet(&mut self, facet: Facet, value: &str) {
        if self.selected(facet) == Some(value) {
            self.facets.remove(&facet);
        } else {
            self.facets.insert(facet, value.to_string());
        }
    }

    pub fn clear_facet(&mut self, facet: Facet) {
        self.facets.remove(&facet);
    }

    /// Drop every facet selection and the search text.
    pub fn clear_all(&mut self) {
        self.facets.clear();
        self.search.clear();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.trim().to_string();
    }

    pub fn only_new(&self) -> bool {
        self.only_new
    }

    pub fn set_only_new(&mut self, on: bool) {
        self.only_new = on;
    }

    pub fn exclude_non_local(&self) -> bool {
        self.exclude_non_local
    }

    pub fn set_exclude_non_local(&mut self, on: bool) {
        self.exclude_non_local = on;
    }

    pub fn min_salary(&self) -> Option<u32> {
        self.min_salary
    }

    /// Monthly salary floor. Zero means no floor.
    pub fn set_min_salary(&mut self, floor: Option<u32>) {
        self.min_salary = floor.filter(|&n| n > 0);
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    pub fn has_active_facets(&self) -> bool {
        !self.facets.is_empty() || !self.search.is_empty()
    }

    pub fn query(&self, offset: usize, limit: usize) -> JobQuery {
        JobQuery {
            limit,
            offset,
            sort: self.sort,
            search: (!self.search.is_empty()).then(|| self.search.clone()),
            only_new: self.only_new,
            exclude_dutch: self.exclude_non_local,
            min_salary: self.min_salary,
            category: self.facets.get(&Facet::Category).cloned(),
            city: self.facets.get(&Facet::City).cloned(),
            source: self.facets.get(&Facet::Source).cloned(),
        }
    }
}

/// Request descriptor for `GET /api/jobs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub limit: usize,
    pub offset: usize,
    pub sort: SortOrder,
    pub search: Option<String>,
    pub only_new: bool,
    pub exclude_dutch: bool,
    pub min_salary: Option<u32>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub source: Option<String>,
}

impl JobQuery {
    /// Query pairs. Filters at their default value are omitted rather than
    /// sent empty.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
            ("sort", self.sort.param().to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if self.only_new {
            pairs.push(("only_new", "true".to_string()));
        }
        if self.exclude_dutch {
            pairs.push(("exclude_dutch", "true".to_string()));
        }
        if let Some(floor) = self.min_salary {
            pairs.push(("min_salary", floor.to_string()));
        }
        let facets = [
            (Facet::Category, &self.category),
            (Facet::City, &self.city),
            (Facet::Source, &self.source),
        ];
        for (facet, value) in facets {
            if let Some(value) = value {
                pairs.push((facet.param(), value.clone()));
            }
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChipRow {
    Chip {
        value: String,
        count: u64,
        active: bool,
    },
    Divider,
}

/// Chip rows for one facet, in server order. A `pinned` value (the home
/// city) is moved to the front and followed by a divider.
pub fn facet_chips(
    counts: &IndexMap<String, u64>,
    facet: Facet,
    filters: &FilterState,
    pinned: Option<&str>,
) -> Vec<ChipRow> {
    let selected = filters.selected(facet);
    let chip = |value: &str, count: u64| ChipRow::Chip {
        value: value.to_string(),
        count,
        active: selected == Some(value),
    };

    let mut rows = Vec::with_capacity(counts.len() + 1);
    let pinned = pinned.and_then(|p| counts.get_key_value(p));
    if let Some((value, count)) = pinned {
        rows.push(chip(value.as_str(), *count));
        rows.push(ChipRow::Divider);
    }
    for (value, count) in counts {
        if pinned.is_some_and(|(p, _)| p == value) {
            continue;
        }
        rows.push(chip(value.as_str(), *count));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn toggle_twice_clears() {
        let mut filters = FilterState::default();
        filters.toggle_facet(Facet::City, "Leiden");
        assert_eq!(filters.selected(Facet::City), Some("Leiden"));
        filters.toggle_facet(Facet::City, "Leiden");
        assert_eq!(filters.selected(Facet::City), None);
        assert_eq!(filters, FilterState::default());
    }

    #[test]
    fn selecting_another_value_replaces() {
        let mut filters = FilterState::default();
        filters.toggle_facet(Facet::Source, "indeed");
        filters.toggle_facet(Facet::Source, "linkedin");
        assert_eq!(filters.selected(Facet::Source), Some("linkedin"));
    }

    #[test]
    fn default_query_sends_only_paging_and_sort() {
        let pairs = FilterState::default().query(0, 50).to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("limit", "50".to_string()),
                ("offset", "0".to_string()),
                ("sort", "newest".to_string()),
            ]
        );
    }

    #[test]
    fn blank_search_is_unset() {
        let mut filters = FilterState::default();
        filters.set_search("   ");
        assert_eq!(filters.query(0, 50).search, None);
        filters.set_search("  analyst ");
        assert_eq!(filters.query(0, 50).search.as_deref(), Some("analyst"));
    }

    #[test]
    fn full_query_pairs() {
        let mut filters = FilterState::default();
        filters.set_search("data");
        filters.set_only_new(true);
        filters.set_exclude_non_local(true);
        filters.set_min_salary(Some(3000));
        filters.set_sort(SortOrder::BestMatch);
        filters.toggle_facet(Facet::Category, "Finance");
        filters.toggle_facet(Facet::City, "Haarlem");
        filters.toggle_facet(Facet::Source, "indeed");

        assert_eq!(
            filters.query(100, 50).to_pairs(),
            vec![
                ("limit", "50".to_string()),
                ("offset", "100".to_string()),
                ("sort", "score".to_string()),
                ("search", "data".to_string()),
                ("only_new", "true".to_string()),
                ("exclude_dutch", "true".to_string()),
                ("min_salary", "3000".to_string()),
                ("category", "Finance".to_string()),
                ("city", "Haarlem".to_string()),
                ("source", "indeed".to_string()),
            ]
        );
    }

    #[test]
    fn zero_salary_floor_is_unset() {
        let mut filters = FilterState::default();
        filters.set_min_salary(Some(0));
        assert_eq!(filters.min_salary(), None);
        assert!(!filters.query(0, 50).to_pairs().iter().any(|(k, _)| *k == "min_salary"));

        filters.set_min_salary(Some(2500));
        assert_eq!(filters.query(0, 50).min_salary, Some(2500));
        filters.set_min_salary(None);
        assert_eq!(filters, FilterState::default());
    }

    #[test]
    fn home_city_is_pinned_with_divider() {
        let counts: IndexMap<String, u64> = [("Amsterdam", 9), ("Leiden", 3), ("Haarlem", 4)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let mut filters = FilterState::default();
        filters.toggle_facet(Facet::City, "Leiden");

        let rows = facet_chips(&counts, Facet::City, &filters, Some("Haarlem"));
        assert_eq!(
            rows,
            vec![
                ChipRow::Chip { value: "Haarlem".into(), count: 4, active: false },
                ChipRow::Divider,
                ChipRow::Chip { value: "Amsterdam".into(), count: 9, active: false },
                ChipRow::Chip { value: "Leiden".into(), count: 3, active: true },
            ]
        );
    }

    #[test]
    fn absent_pin_keeps_server_order() {
        let counts: IndexMap<String, u64> = [("b", 1), ("a", 2)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let rows = facet_chips(&counts, Facet::Category, &FilterState::default(), Some("Haarlem"));
        assert_eq!(rows.len(), 2);
        assert!(!rows.contains(&ChipRow::Divider));
    }

    #[test]
    fn clear_all_keeps_toggles_and_sort() {
        let mut filters = FilterState::default();
        filters.toggle_facet(Facet::Category, "IT");
        filters.set_search("x");
        filters.set_only_new(true);
        filters.set_sort(SortOrder::Oldest);
        filters.clear_all();
        assert!(!filters.has_active_facets());
        assert!(filters.only_new());
        assert_eq!(filters.sort(), SortOrder::Oldest);
    }
}
