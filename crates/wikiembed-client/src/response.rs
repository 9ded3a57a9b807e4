use serde_json::Value;
use wikiembed_core::{EmbedFailure, Embedding};

/// Interpret an embedding endpoint response body.
///
/// Accepts a flat array of numbers (including `[]`), or a one-element array
/// wrapping such an array (the batch shape of text-embeddings-inference
/// `/embed`). Anything else is a `FormatFailure`.
pub fn parse_embedding(value: &Value) -> Result<Embedding, EmbedFailure> {
    let Value::Array(items) = value else {
        return Err(EmbedFailure::Format(format!("expected a JSON array, got {}", kind(value))));
    };
    match items.as_slice() {
        [Value::Array(inner)] => numbers(inner),
        _ => numbers(items),
    }
}

fn numbers(items: &[Value]) -> Result<Embedding, EmbedFailure> {
    items
        .iter()
        .enumerate()
        .map(|(i, v)| v.as_f64().ok_or_else(|| EmbedFailure::Format(format!("element {i} is {}, not a number", kind(v)))))
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_and_wrapped_vectors() {
        assert_eq!(parse_embedding(&json!([0.1, 0.2])).unwrap(), vec![0.1, 0.2]);
        assert_eq!(parse_embedding(&json!([[0.5, -1, 3]])).unwrap(), vec![0.5, -1.0, 3.0]);
    }

    #[test]
    fn empty_array_is_an_empty_vector() {
        assert_eq!(parse_embedding(&json!([])).unwrap(), Vec::<f64>::new());
        assert_eq!(parse_embedding(&json!([[]])).unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn other_shapes_are_format_failures() {
        for body in [json!({"embedding": [0.1]}), json!([[0.1], [0.2]]), json!([[0.1], 0.2]), json!(["0.1"]), json!(null)] {
            let err = parse_embedding(&body).expect_err("shape must be rejected");
            assert!(matches!(err, EmbedFailure::Format(_)), "body {body} gave {err:?}");
        }
    }
}
