use serde::Serialize;
use serde_json::Value;

use super::GraphQlClientError;
use crate::unpack::kind_of;

/// The wire-level `variables` object of a GraphQL request.
pub type Variables = serde_json::Map<String, Value>;

/// Converts any serializable input into the `variables` object.
///
/// The result is what serializing `input` to JSON and reading it back as an
/// object gives: maps keep their keys, structs use their serde field names
/// (including `rename`). A `null` input gives an empty object.
///
/// # Errors
///
/// - [`GraphQlClientError::InvalidVariablesShape`] when `input` serializes to
///   something else than an object or `null`,
/// - [`GraphQlClientError::EncodeError`] when `input` cannot be serialized.
///
/// # Example
///
/// ```rust
/// use gqlclient::flatten_variables;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct UserVariables {
///     #[serde(rename = "id")]
///     user_id: String,
/// }
///
/// let variables = flatten_variables(&UserVariables { user_id: "1".into() })?;
/// assert_eq!(variables["id"], "1");
///
/// assert!(flatten_variables("nope").is_err());
/// # Ok::<(), gqlclient::GraphQlClientError>(())
/// ```
pub fn flatten_variables<V>(input: &V) -> Result<Variables, GraphQlClientError>
where
    V: Serialize + ?Sized,
{
    match serde_json::to_value(input)? {
        Value::Null => Ok(Variables::new()),
        Value::Object(variables) => Ok(variables),
        other => Err(GraphQlClientError::InvalidVariablesShape {
            actual: kind_of(&other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::ser::Error as _;
    use serde_json::json;

    use super::*;

    #[derive(Serialize)]
    #[allow(non_snake_case)]
    struct Plain {
        ID: String,
    }

    #[derive(Serialize)]
    struct Tagged {
        #[serde(rename = "my_id")]
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        after: Option<String>,
    }

    struct Broken;

    impl Serialize for Broken {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("not serializable"))
        }
    }

    #[test]
    fn should_flatten_plain_struct() {
        let variables = flatten_variables(&Plain {
            ID: "123".to_string(),
        })
        .expect("object");

        assert_eq!(Value::Object(variables), json!({ "ID": "123" }));
    }

    #[test]
    fn should_follow_serde_renames() {
        let variables = flatten_variables(&Tagged {
            id: "123".to_string(),
            after: None,
        })
        .expect("object");

        assert_eq!(Value::Object(variables), json!({ "my_id": "123" }));
    }

    #[test]
    fn should_pass_maps_through() {
        let input = HashMap::from([("id", "123")]);

        let variables = flatten_variables(&input).expect("object");

        assert_eq!(Value::Object(variables), json!({ "id": "123" }));
    }

    #[test]
    fn should_match_json_round_trip() {
        let input = json!({ "first": 10, "filter": { "tags": ["a", "b"], "open": true } });

        let variables = flatten_variables(&input).expect("object");

        assert_eq!(Value::Object(variables), input);
    }

    #[test]
    fn should_treat_null_as_empty() {
        assert!(flatten_variables(&()).expect("object").is_empty());
        assert!(flatten_variables(&None::<Tagged>).expect("object").is_empty());
        assert!(flatten_variables(&Value::Null).expect("object").is_empty());
    }

    #[test]
    fn should_reject_non_object_inputs() {
        let cases: Vec<_> = [
            flatten_variables("nope"),
            flatten_variables(&[1, 2]),
            flatten_variables(&42),
            flatten_variables(&true),
        ]
        .into_iter()
        .map(|result| match result {
            Err(GraphQlClientError::InvalidVariablesShape { actual }) => actual,
            other => panic!("expected InvalidVariablesShape, got {other:?}"),
        })
        .collect();

        insta::assert_debug_snapshot!(cases, @r#"
        [
            "string",
            "array",
            "number",
            "boolean",
        ]
        "#);
    }

    #[test]
    fn should_report_serialization_failure() {
        let result = flatten_variables(&Broken);

        assert!(matches!(result, Err(GraphQlClientError::EncodeError(_))));
    }
}
