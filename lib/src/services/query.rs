// lib/src/services/query.rs

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use models::errors::ValidationError;

/// Optional `limit`/`offset` window applied after filtering and sorting.
/// With neither set every row is returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl Page {
    pub fn new(limit: Option<usize>, offset: Option<usize>) -> Self {
        Page { limit, offset }
    }

    pub fn apply<T>(&self, rows: Vec<T>) -> Vec<T> {
        rows.into_iter()
            .skip(self.offset.unwrap_or(0))
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

/// Parses a `status` query value. Absent, blank and `all` mean "no filter".
pub fn parse_status_filter<S>(raw: Option<&str>) -> Result<Option<S>, ValidationError>
where
    S: FromStr<Err = ValidationError>,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}
