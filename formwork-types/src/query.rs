use crate::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Query options accepted by [`DataProvider::find`](crate::DataProvider::find).
///
/// Providers may honor any subset of these; the runtime assumes nothing about
/// the query shape beyond the fields below. `filter` carries arbitrary
/// residual key/value pairs (e.g. leftover HTTP query parameters).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Full-text query over the entity's text fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub filter: serde_json::Map<String, Value>,
}

impl FindQuery {
    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn q(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.insert(key.into(), value.into());
        self
    }
}

/// Sort directive serialized as `"field:asc"` / `"field:desc"`.
///
/// A bare `"field"` parses as ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(':') {
            Some((field, "asc")) => (field, SortDirection::Ascending),
            Some((field, "desc")) => (field, SortDirection::Descending),
            Some((_, other)) => {
                return Err(Error::InvalidSort(format!(
                    "direction must be 'asc' or 'desc', got '{other}'"
                )));
            }
            None => (s, SortDirection::Ascending),
        };
        if field.is_empty() {
            return Err(Error::InvalidSort("empty field name".into()));
        }
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        write!(f, "{}:{}", self.field, dir)
    }
}

impl Serialize for SortSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SortSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One page of records.
///
/// `page` is 1-based. Out-of-range pages are valid and come back with empty
/// `data` and the unchanged `total`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse {
    pub data: Vec<Value>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

/// What a provider's `find` returns: a paginated page or a plain sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FindResult {
    Page(PaginatedResponse),
    Items(Vec<Value>),
}

impl FindResult {
    /// The records regardless of pagination shape.
    pub fn records(&self) -> &[Value] {
        match self {
            FindResult::Page(page) => &page.data,
            FindResult::Items(items) => items,
        }
    }

    /// The paginated form, if the provider produced one.
    pub fn as_page(&self) -> Option<&PaginatedResponse> {
        match self {
            FindResult::Page(page) => Some(page),
            FindResult::Items(_) => None,
        }
    }
}

/// Acknowledgement returned by [`DataProvider::delete`](crate::DataProvider::delete).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAck {
    pub success: bool,
}
