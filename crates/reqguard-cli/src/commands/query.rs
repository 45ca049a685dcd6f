// SPDX-License-Identifier: Apache-2.0

//! Built-in statement templates and argument binding.

use anyhow::{Context, Result};
use reqguard_core::{Params, SqlValue, StatementTemplate};
use tracing::debug;

use super::types::QueryResult;
use crate::cli::StatementName;

const USER_BY_NAME: StatementTemplate =
    StatementTemplate::new("SELECT id, name FROM users WHERE name = ?");

const USER_BY_ID: StatementTemplate =
    StatementTemplate::new("SELECT id, name FROM users WHERE id = ?");

const SEARCH_PRODUCTS: StatementTemplate =
    StatementTemplate::new("SELECT * FROM products WHERE name LIKE ?");

const DELETE_USER: StatementTemplate = StatementTemplate::new("DELETE FROM users WHERE id = ?");

impl StatementName {
    /// The template for this statement.
    pub fn template(self) -> StatementTemplate {
        match self {
            StatementName::UserByName => USER_BY_NAME,
            StatementName::UserById => USER_BY_ID,
            StatementName::SearchProducts => SEARCH_PRODUCTS,
            StatementName::DeleteUser => DELETE_USER,
        }
    }

    /// Kebab-case name as typed on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            StatementName::UserByName => "user-by-name",
            StatementName::UserById => "user-by-id",
            StatementName::SearchProducts => "search-products",
            StatementName::DeleteUser => "delete-user",
        }
    }

    /// Converts raw arguments to typed values for this statement.
    fn params(self, args: &[String]) -> Result<Params> {
        let values: Vec<SqlValue> = match self {
            StatementName::UserByName => args.iter().map(|a| SqlValue::from(a.as_str())).collect(),
            StatementName::UserById | StatementName::DeleteUser => args
                .iter()
                .map(|a| {
                    a.parse::<i64>()
                        .map(SqlValue::Int)
                        .with_context(|| format!("User id must be an integer, got {a:?}"))
                })
                .collect::<Result<Vec<_>>>()?,
            StatementName::SearchProducts => args
                .iter()
                .map(|a| SqlValue::Text(format!("%{a}%")))
                .collect(),
        };
        Ok(Params::Positional(values))
    }
}

/// Bind `args` to the named statement.
pub fn run(name: StatementName, args: &[String]) -> Result<QueryResult> {
    let params = name.params(args)?;
    debug!(statement = name.as_str(), values = params.len(), "Binding statement");

    let bound = name.template().bind(params)?;
    Ok(QueryResult {
        statement: name.as_str().to_string(),
        bound,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqguard_core::GuardError;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_injection_text_stays_a_value() {
        let result = run(StatementName::UserByName, &args(&["alice' OR '1'='1"])).unwrap();
        assert_eq!(result.bound.sql(), "SELECT id, name FROM users WHERE name = ?");
        assert_eq!(
            result.bound.values().next(),
            Some(&SqlValue::Text("alice' OR '1'='1".to_string()))
        );
    }

    #[test]
    fn test_user_by_id_is_typed() {
        let result = run(StatementName::UserById, &args(&["42"])).unwrap();
        assert_eq!(result.bound.values().next(), Some(&SqlValue::Int(42)));
    }

    #[test]
    fn test_user_by_id_rejects_expression() {
        let err = run(StatementName::DeleteUser, &args(&["1 OR 1=1"])).unwrap_err();
        assert!(err.to_string().contains("must be an integer"));
    }

    #[test]
    fn test_search_wraps_term() {
        let result = run(StatementName::SearchProducts, &args(&["widget"])).unwrap();
        assert_eq!(
            result.bound.values().next(),
            Some(&SqlValue::Text("%widget%".to_string()))
        );
    }

    #[test]
    fn test_wrong_argument_count() {
        let err = run(StatementName::UserByName, &args(&["a", "b"])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GuardError>(),
            Some(GuardError::ArityMismatch {
                expected: 1,
                actual: 2
            })
        ));

        assert!(run(StatementName::UserByName, &[]).is_err());
    }
}
