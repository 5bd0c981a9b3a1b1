//! Index definitions and explain output

use mongodb::bson::{Bson, Document};
use serde::Serialize;
use std::fmt;

/// A named index over one or more book fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: &'static str,
    /// Field and direction (`1` ascending, `-1` descending)
    pub keys: &'static [(&'static str, i32)],
}

/// Single-field index on title
pub const TITLE_INDEX: IndexSpec = IndexSpec {
    name: "idx_title_asc",
    keys: &[("title", 1)],
};

/// Compound index on author then newest-first year
pub const AUTHOR_YEAR_INDEX: IndexSpec = IndexSpec {
    name: "idx_author_year",
    keys: &[("author", 1), ("published_year", -1)],
};

/// Title used by the explain diagnostic
pub const EXPLAIN_TITLE: &str = "1984";

impl IndexSpec {
    /// Keys document in declaration order
    pub fn keys_document(&self) -> Document {
        self.keys
            .iter()
            .map(|(field, direction)| (field.to_string(), Bson::Int32(*direction)))
            .collect()
    }
}

/// Acknowledgement of an index creation
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IndexAck {
    pub name: String,
    /// True when no real index was built
    pub simulated: bool,
}

impl fmt::Display for IndexAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.simulated {
            write!(f, "{} (simulated)", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// Query plan diagnostic for the title lookup
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExplainReport {
    /// True when the plan is a placeholder rather than server output
    pub simulated: bool,
    pub plan: serde_json::Value,
}

impl ExplainReport {
    /// Convert a server explain document
    pub fn from_server(plan: Document) -> Self {
        Self {
            simulated: false,
            plan: Bson::Document(plan).into_relaxed_extjson(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_keys_document_keeps_order() {
        assert_eq!(TITLE_INDEX.keys_document(), doc! { "title": 1 });
        assert_eq!(
            AUTHOR_YEAR_INDEX.keys_document(),
            doc! { "author": 1, "published_year": -1 }
        );
        let keys = AUTHOR_YEAR_INDEX.keys_document();
        let fields: Vec<&String> = keys.keys().collect();
        assert_eq!(fields, ["author", "published_year"]);
    }

    #[test]
    fn test_ack_display() {
        let ack = IndexAck {
            name: TITLE_INDEX.name.to_string(),
            simulated: true,
        };
        assert_eq!(ack.to_string(), "idx_title_asc (simulated)");
    }

    #[test]
    fn test_explain_from_server() {
        let report = ExplainReport::from_server(doc! { "ok": 1.0, "queryPlanner": { "namespace": "plp_bookstore.books" } });
        assert!(!report.simulated);
        assert_eq!(report.plan["queryPlanner"]["namespace"], "plp_bookstore.books");
    }
}
