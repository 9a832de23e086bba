//! Refinement errors.

use thiserror::Error;

/// Recoverable refinement errors. Protocol violations (refining an already
/// finalized object) are programming errors and assert instead.
#[derive(Debug, Error)]
pub enum RefineError {
    /// A construction or finalization keyword whose top-level segment does
    /// not name a declared refinable member. The message enumerates the
    /// offending keys and every valid member name.
    #[error(
        "'{type_name}' object has no refinable attribute(s): {}.\nAvailable attributes:\n    {}",
        quote_keys(.unexpected),
        .available.join("\n    ")
    )]
    UnknownAttributes {
        type_name: String,
        unexpected: Vec<String>,
        available: Vec<String>,
    },

    /// Failed to parse an ingested namespace layer.
    #[error("{0}")]
    Parse(String),
}

impl RefineError {
    /// Build an `UnknownAttributes` error with both key lists sorted.
    pub fn unknown_attributes(
        type_name: &str,
        unexpected: impl IntoIterator<Item = String>,
        available: impl IntoIterator<Item = String>,
    ) -> RefineError {
        let mut unexpected: Vec<String> = unexpected.into_iter().collect();
        unexpected.sort();
        let mut available: Vec<String> = available.into_iter().collect();
        available.sort();
        RefineError::UnknownAttributes {
            type_name: type_name.to_string(),
            unexpected,
            available,
        }
    }
}

fn quote_keys(keys: &[String]) -> String {
    keys.iter()
        .map(|k| format!("\"{k}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_attributes_message() {
        let err = RefineError::unknown_attributes(
            "Fruit",
            ["b".to_string(), "a".to_string()],
            ["taste".to_string(), "color".to_string()],
        );
        let text = err.to_string();
        assert_eq!(
            text,
            "'Fruit' object has no refinable attribute(s): \"a\", \"b\".\n\
             Available attributes:\n    color\n    taste"
        );
    }
}
