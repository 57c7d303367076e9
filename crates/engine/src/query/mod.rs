//! Query building blocks
//!
//! - [`Filter`]: which documents match
//! - [`Update`]: how a matched document changes
//! - [`Projection`]: which fields come back
//! - [`Query`]: chained find with sort, limit, and projection
//!
//! ```ignore
//! let people = collection
//!     .query(Filter::eq("favoriteFoods", "burrito"))
//!     .sort("name", SortOrder::Ascending)
//!     .limit(2)
//!     .select(Projection::exclude(["age"]))
//!     .exec()?;
//! ```

mod compare;
mod filter;
mod projection;
mod update;

pub use compare::compare_values;
pub use filter::Filter;
pub use projection::Projection;
pub use update::{Update, UpdateOp};

use crate::collection::Collection;
use folio_core::{Document, Result};
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

/// A chained find over one collection
///
/// Nothing runs until [`Query::exec`]. Results are filtered in natural
/// order, stably sorted by each sort key in turn, truncated to the limit,
/// and finally projected.
#[derive(Debug, Clone)]
#[must_use = "a query does nothing until exec() is called"]
pub struct Query {
    collection: Collection,
    filter: Filter,
    sort: Vec<(String, SortOrder)>,
    skip: usize,
    limit: Option<usize>,
    projection: Option<Projection>,
}

impl Query {
    pub(crate) fn new(collection: Collection, filter: Filter) -> Self {
        Self {
            collection,
            filter,
            sort: Vec::new(),
            skip: 0,
            limit: None,
            projection: None,
        }
    }

    /// Add a sort key; earlier keys take precedence
    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort.push((field.into(), order));
        self
    }

    /// Skip the first `n` sorted results
    pub fn skip(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    /// Return at most `n` results; `0` means no limit
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = if n == 0 { None } else { Some(n) };
        self
    }

    /// Choose which fields to return
    pub fn select(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Run the query
    pub fn exec(self) -> Result<Vec<Document>> {
        let mut docs = self.collection.find(&self.filter)?;

        if !self.sort.is_empty() {
            docs.sort_by(|a, b| compare_by_keys(a, b, &self.sort));
        }

        let limit = self.limit.unwrap_or(usize::MAX);
        let docs = docs.into_iter().skip(self.skip).take(limit);

        let results: Vec<Document> = match &self.projection {
            Some(projection) => docs.map(|d| projection.apply(d)).collect(),
            None => docs.collect(),
        };

        tracing::debug!(
            collection = %self.collection.name(),
            results = results.len(),
            "Executed query"
        );
        Ok(results)
    }
}

fn compare_by_keys(a: &Document, b: &Document, keys: &[(String, SortOrder)]) -> Ordering {
    for (field, order) in keys {
        let ord = compare_values(a.lookup(field), b.lookup(field));
        let ord = match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
