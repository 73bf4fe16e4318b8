//! Query tree
//!
//! Leaves address a single field with an already normalized token. A
//! `Boolean` node combines weighted clauses with SHOULD/MUST semantics.

use std::fmt;

/// How a clause participates in a boolean query
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Occur {
    /// Optional; contributes score when it matches
    Should,
    /// Required; filters candidates without contributing score
    Must,
}

/// A weighted subquery inside a boolean query
#[derive(Clone, Debug, PartialEq)]
pub struct Clause {
    pub occur: Occur,
    pub query: Query,
    pub boost: f32,
}

impl Clause {
    pub fn should(query: Query, boost: f32) -> Self {
        Self {
            occur: Occur::Should,
            query,
            boost,
        }
    }

    pub fn must(query: Query) -> Self {
        Self {
            occur: Occur::Must,
            query,
            boost: 1.0,
        }
    }
}

/// Query tree evaluated by the scorer
#[derive(Clone, Debug, PartialEq)]
pub enum Query {
    /// Exact term match
    Term { field: String, token: String },
    /// Indexed terms starting with the token
    Prefix { field: String, token: String },
    /// Indexed terms within `max_edits` of the token
    Fuzzy {
        field: String,
        token: String,
        max_edits: u32,
    },
    /// Weighted combination of subqueries
    Boolean(Vec<Clause>),
}

impl Query {
    pub fn term(field: impl Into<String>, token: impl Into<String>) -> Self {
        Query::Term {
            field: field.into(),
            token: token.into(),
        }
    }

    pub fn prefix(field: impl Into<String>, token: impl Into<String>) -> Self {
        Query::Prefix {
            field: field.into(),
            token: token.into(),
        }
    }

    pub fn fuzzy(field: impl Into<String>, token: impl Into<String>, max_edits: u32) -> Self {
        Query::Fuzzy {
            field: field.into(),
            token: token.into(),
            max_edits,
        }
    }

    /// Get the query type name for debugging and logging
    pub fn query_type(&self) -> &'static str {
        match self {
            Query::Term { .. } => "term",
            Query::Prefix { .. } => "prefix",
            Query::Fuzzy { .. } => "fuzzy",
            Query::Boolean(_) => "bool",
        }
    }

    /// Clauses of a boolean query, empty for leaves
    pub fn clauses(&self) -> &[Clause] {
        match self {
            Query::Boolean(clauses) => clauses,
            _ => &[],
        }
    }

    /// Number of leaf queries in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            Query::Boolean(clauses) => clauses.iter().map(|c| c.query.leaf_count()).sum(),
            _ => 1,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Term { field, token } => write!(f, "{}:{}", field, token),
            Query::Prefix { field, token } => write!(f, "{}:{}*", field, token),
            Query::Fuzzy {
                field,
                token,
                max_edits,
            } => write!(f, "{}:{}~{}", field, token, max_edits),
            Query::Boolean(clauses) => {
                write!(f, "(")?;
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    if clause.occur == Occur::Must {
                        write!(f, "+")?;
                    }
                    write!(f, "{}", clause.query)?;
                    if clause.boost != 1.0 {
                        write!(f, "^{}", clause.boost)?;
                    }
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let query = Query::Boolean(vec![
            Clause::should(Query::prefix("title", "mat"), 8.0),
            Clause::should(Query::fuzzy("title", "mat", 1), 8.0),
            Clause::must(Query::term("genreKeys", "sci fi")),
        ]);
        assert_eq!(
            query.to_string(),
            "(title:mat*^8 title:mat~1^8 +genreKeys:sci fi)"
        );
    }

    #[test]
    fn test_leaf_count() {
        let leaf = Query::term("year", "1999");
        assert_eq!(leaf.leaf_count(), 1);
        assert!(leaf.clauses().is_empty());

        let nested = Query::Boolean(vec![
            Clause::should(leaf.clone(), 1.0),
            Clause::should(
                Query::Boolean(vec![
                    Clause::should(Query::prefix("title", "a"), 1.0),
                    Clause::must(Query::term("year", "2000")),
                ]),
                1.0,
            ),
        ]);
        assert_eq!(nested.leaf_count(), 3);
        assert_eq!(nested.query_type(), "bool");
    }

    #[test]
    fn test_clause_constructors() {
        let must = Clause::must(Query::term("year", "1999"));
        assert_eq!(must.occur, Occur::Must);
        assert_eq!(must.boost, 1.0);

        let should = Clause::should(Query::term("year", "1999"), 4.0);
        assert_eq!(should.occur, Occur::Should);
        assert_eq!(should.boost, 4.0);
    }
}
