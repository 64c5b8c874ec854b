use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::voter::Voter;

/// The voter fields the server accepts as sort keys. Anything else falls
/// back to the server's default ordering, so there is no "unknown" variant
/// on the client side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    SerialNo,
    Name,
    GuardianName,
    HouseNo,
    HouseName,
    GenderAge,
    IdCardNo,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        Self::SerialNo,
        Self::Name,
        Self::GuardianName,
        Self::HouseNo,
        Self::HouseName,
        Self::GenderAge,
        Self::IdCardNo,
    ];

    /// The wire name the `sortBy` query parameter expects.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SerialNo => "serialNo",
            Self::Name => "name",
            Self::GuardianName => "guardianName",
            Self::HouseNo => "houseNo",
            Self::HouseName => "houseName",
            Self::GenderAge => "genderAge",
            Self::IdCardNo => "idCardNo",
        }
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown sort field {s:?}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Ascending),
            "desc" => Ok(Self::Descending),
            other => Err(format!("unknown sort order {other:?} (use asc or desc)")),
        }
    }
}

/// The transient roster view state: what to ask the server for. Owned by
/// the roster view and never persisted.
///
/// Invariant: changing the search term, the sort field or the sort order
/// resets `page` to 1, so the mutators below are the only supported way to
/// change those fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterQuery {
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub search: String,
    pub page: u32,
    pub page_size: u32,
}

impl RosterQuery {
    pub fn new(page_size: u32) -> Self {
        Self {
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            search: String::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Commit a search term; any term change starts over on the first page.
    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.page = 1;
    }

    /// Column-header semantics: the active field flips its order, a new
    /// field sorts ascending. Either way we jump back to the first page.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_by == field {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_by = field;
            self.sort_order = SortOrder::Ascending;
        }
        self.page = 1;
    }

    /// Set an explicit sort, e.g. from the console's CLI flags.
    pub fn set_sort(&mut self, field: SortField, order: SortOrder) {
        self.sort_by = field;
        self.sort_order = order;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        if page_size > 0 {
            self.page_size = page_size;
            self.page = 1;
        }
    }

    /// Query-string parameters in the form the `GET voters` endpoint
    /// expects.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("sortBy", self.sort_by.as_str().to_string()),
            ("sortOrder", self.sort_order.as_str().to_string()),
            ("page", self.page.to_string()),
            ("limit", self.page_size.to_string()),
            ("search", self.search.clone()),
        ]
    }
}

/// Server-reported pagination bookkeeping for the most recent query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_count: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub page_size: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl Pagination {
    /// Derive consistent bookkeeping for a given total count; this is the
    /// same formula the server applies, and what the invariants in the
    /// tests are checked against.
    pub fn for_counts(total_count: u64, current_page: u32, page_size: u32) -> Self {
        let page_size = page_size.max(1);
        let total_pages = (total_count.div_ceil(page_size as u64)).max(1) as u32;
        Self {
            total_count,
            total_pages,
            current_page,
            page_size,
            has_next_page: current_page < total_pages,
            has_previous_page: current_page > 1,
        }
    }

    pub fn empty(page_size: u32) -> Self {
        Self::for_counts(0, 1, page_size)
    }
}

/// One page of the registry plus its pagination envelope, as returned by
/// `GET voters`.
#[derive(Debug, Clone, Deserialize)]
pub struct VoterPage {
    #[serde(rename = "data")]
    pub records: Vec<Voter>,
    pub pagination: Pagination,
}
