use serde_json::Value;

use crate::models::ClothingItemId;

/// Extracts recommended clothing ids from raw model output.
///
/// Anything other than a JSON array made up entirely of integer ids degrades
/// to an empty recommendation. A failed parse is logged, never returned as an error.
pub fn parse_recommended_ids(raw: &str) -> Vec<ClothingItemId> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, response = %raw, "Model response is not valid JSON");
            return vec![];
        }
    };

    let Value::Array(elements) = value else {
        tracing::warn!(response = %raw, "Model response is not a JSON array");
        return vec![];
    };

    let ids: Option<Vec<ClothingItemId>> = elements
        .iter()
        .map(|element| {
            element
                .as_i64()
                .and_then(|id| ClothingItemId::try_from(id).ok())
        })
        .collect();

    ids.unwrap_or_else(|| {
        tracing::warn!(response = %raw, "Model response contains non-integer ids");
        vec![]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_id_array() {
        assert_eq!(parse_recommended_ids("[1, 3]"), vec![1, 3]);
    }

    #[test]
    fn test_surrounding_whitespace_is_fine() {
        assert_eq!(parse_recommended_ids("\n  [4,2]\n"), vec![4, 2]);
    }

    #[test]
    fn test_empty_array() {
        assert!(parse_recommended_ids("[]").is_empty());
    }

    #[test]
    fn test_not_json_degrades_to_empty() {
        assert!(parse_recommended_ids("not json").is_empty());
    }

    #[test]
    fn test_non_list_json_degrades_to_empty() {
        assert!(parse_recommended_ids(r#"{"a":1}"#).is_empty());
        assert!(parse_recommended_ids("42").is_empty());
    }

    #[test]
    fn test_prose_wrapped_answer_degrades_to_empty() {
        assert!(parse_recommended_ids("Sure! Here you go: [1, 2]").is_empty());
        assert!(parse_recommended_ids("```json\n[1, 2]\n```").is_empty());
    }

    #[test]
    fn test_mixed_element_types_degrade_to_empty() {
        assert!(parse_recommended_ids(r#"[1, "2"]"#).is_empty());
        assert!(parse_recommended_ids("[1, 2.5]").is_empty());
        assert!(parse_recommended_ids("[1, null]").is_empty());
    }

    #[test]
    fn test_out_of_range_ids_degrade_to_empty() {
        assert!(parse_recommended_ids("[1, 99999999999]").is_empty());
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        assert_eq!(parse_recommended_ids("[3, 1, 3]"), vec![3, 1, 3]);
    }
}
