// Copyright 2026 HyperDash Contributors
// Licensed under the Apache License, Version 2.0

//! Pure filter/sort/paginate over an in-memory record collection.
//!
//! Each list view instantiates the engine with a [`QuerySchema`] naming its
//! searchable fields, sortable fields, and filter definitions; the engine
//! itself is identical across record shapes. Recomputation is from scratch
//! on every input change, which is fine at the tens-to-hundreds scale these
//! views carry.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// What a field accessor projects a record field into for searching and
/// sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

impl FieldValue {
    fn cmp_value(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(left), Self::Text(right)) => left.cmp(right),
            (Self::Integer(left), Self::Integer(right)) => left.cmp(right),
            // A schema never mixes kinds within one field.
            _ => Ordering::Equal,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SortField<R> {
    pub name: &'static str,
    pub get: fn(&R) -> FieldValue,
}

#[derive(Debug, Clone, Copy)]
pub enum FilterKind<R> {
    /// Membership in a selected set of values; an empty selection is inert.
    Categorical { get: fn(&R) -> String },
    /// Closed interval over an integer field; inert while the state equals
    /// the configured full range.
    NumericRange {
        get: fn(&R) -> i64,
        full_range: (i64, i64),
    },
}

#[derive(Debug, Clone, Copy)]
pub struct FilterDef<R> {
    pub name: &'static str,
    pub kind: FilterKind<R>,
}

/// Per-view configuration: which fields the search box scans, which fields
/// sort, and which filters exist. This is the only thing that varies
/// between the contacts, companies, and admin views.
#[derive(Debug, Clone)]
pub struct QuerySchema<R> {
    pub search_fields: Vec<fn(&R) -> String>,
    pub sort_fields: Vec<SortField<R>>,
    pub filters: Vec<FilterDef<R>>,
}

impl<R> QuerySchema<R> {
    pub fn sort_field(&self, name: &str) -> Option<&SortField<R>> {
        self.sort_fields.iter().find(|field| field.name == name)
    }

    pub fn filter(&self, name: &str) -> Option<&FilterDef<R>> {
        self.filters.iter().find(|filter| filter.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: &'static str,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Selected(BTreeSet<String>),
    Range(i64, i64),
}

impl FilterValue {
    pub fn selected<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Selected(values.into_iter().map(Into::into).collect())
    }
}

/// The UI-control state one view owns across renders. Mutators enforce the
/// page-reset invariant: any change to search, filters, or sort puts the
/// view back on page 1.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    search_term: String,
    filters: BTreeMap<&'static str, FilterValue>,
    sort: Option<SortSpec>,
    current_page: usize,
    page_size: usize,
}

impl QueryState {
    pub fn new(page_size: usize) -> Self {
        Self {
            search_term: String::new(),
            filters: BTreeMap::new(),
            sort: None,
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn with_sort(page_size: usize, sort: SortSpec) -> Self {
        let mut state = Self::new(page_size);
        state.sort = Some(sort);
        state
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn filter_value(&self, name: &str) -> Option<&FilterValue> {
        self.filters.get(name)
    }

    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.current_page = 1;
    }

    pub fn set_filter(&mut self, name: &'static str, value: FilterValue) {
        self.filters.insert(name, value);
        self.current_page = 1;
    }

    pub fn clear_filter(&mut self, name: &str) {
        self.filters.remove(name);
        self.current_page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.current_page = 1;
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
        self.current_page = 1;
    }

    /// Pages are 1-based. The engine does not clamp an out-of-range page;
    /// callers disable their next/prev affordances at the boundaries.
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<R> {
    pub page: Vec<R>,
    pub total_count: usize,
    pub page_count: usize,
    pub current_page: usize,
}

impl<R> QueryResult<R> {
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.page_count
    }

    pub const fn has_prev_page(&self) -> bool {
        self.current_page > 1
    }
}

/// Computes the visible page: search, then ANDed filters, then a stable
/// sort, then the slice for the current page. Never mutates `records`.
pub fn run_query<R: Clone>(
    records: &[R],
    schema: &QuerySchema<R>,
    state: &QueryState,
) -> QueryResult<R> {
    let term = state.search_term.trim().to_lowercase();

    let mut rows: Vec<&R> = records
        .iter()
        .filter(|record| matches_search(*record, schema, &term))
        .filter(|record| matches_filters(*record, schema, state))
        .collect();

    if let Some(sort) = state.sort
        && let Some(field) = schema.sort_field(sort.field)
    {
        // Vec::sort_by is stable, so ties keep their original order and
        // descending is exactly the reversed ascending comparator.
        rows.sort_by(|left, right| {
            let ordering = (field.get)(left).cmp_value(&(field.get)(right));
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    let total_count = rows.len();
    let page_count = total_count.div_ceil(state.page_size);
    let start = (state.current_page - 1).saturating_mul(state.page_size);
    let page = rows
        .into_iter()
        .skip(start)
        .take(state.page_size)
        .cloned()
        .collect();

    QueryResult {
        page,
        total_count,
        page_count,
        current_page: state.current_page,
    }
}

fn matches_search<R>(record: &R, schema: &QuerySchema<R>, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    schema
        .search_fields
        .iter()
        .any(|get| get(record).to_lowercase().contains(term))
}

fn matches_filters<R>(record: &R, schema: &QuerySchema<R>, state: &QueryState) -> bool {
    schema.filters.iter().all(|filter| {
        match (&filter.kind, state.filters.get(filter.name)) {
            (FilterKind::Categorical { get }, Some(FilterValue::Selected(selected))) => {
                selected.is_empty() || selected.contains(&get(record))
            }
            (
                FilterKind::NumericRange { get, full_range },
                Some(FilterValue::Range(min, max)),
            ) => {
                if (*min, *max) == *full_range {
                    return true;
                }
                let value = get(record);
                (*min..=*max).contains(&value)
            }
            // Unset filters and type mismatches (unreachable by
            // construction: widgets only produce their declared type) are
            // inert.
            _ => true,
        }
    })
}
