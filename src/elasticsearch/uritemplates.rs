use crate::elasticsearch::ElasticsearchError;

/// Expands `{name}` placeholders in an endpoint path with url-encoded values.
///
/// Every placeholder must have a value, and every value is encoded so it
/// stays within a single path segment.
pub fn expand(template: &str, values: &[(&str, &str)]) -> Result<String, ElasticsearchError> {
    let mut path = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        push_literal(&mut path, template, &rest[..start])?;

        let after = &rest[start + 1..];
        let end = after
            .find('}')
            .ok_or_else(|| error(template, "unclosed `{`"))?;
        let name = &after[..end];
        if name.is_empty() {
            return Err(error(template, "empty placeholder"));
        }

        let value = values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| error(template, &format!("no value for `{}`", name)))?;
        path.push_str(&encode_segment(value));

        rest = &after[end + 1..];
    }

    push_literal(&mut path, template, rest)?;
    Ok(path)
}

fn push_literal(path: &mut String, template: &str, literal: &str) -> Result<(), ElasticsearchError> {
    if literal.contains('}') {
        return Err(error(template, "unmatched `}`"));
    }
    path.push_str(literal);
    Ok(())
}

fn encode_segment(value: &str) -> String {
    // form encoding turns spaces into '+', which means something else in a path
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn error(template: &str, reason: &str) -> ElasticsearchError {
    ElasticsearchError::PathTemplate {
        template: template.to_owned(),
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use crate::elasticsearch::uritemplates::expand;
    use crate::elasticsearch::ElasticsearchError;

    #[test]
    fn test_literal_path() {
        assert_eq!(
            expand("/_cluster/settings", &[]).unwrap(),
            "/_cluster/settings"
        );
    }

    #[test]
    fn test_placeholders_are_encoded() {
        assert_eq!(
            expand(
                "/{index}/_doc/{id}",
                &[("index", "my index"), ("id", "a/b+c")]
            )
            .unwrap(),
            "/my%20index/_doc/a%2Fb%2Bc"
        );
    }

    #[test]
    fn test_missing_value() {
        match expand("/{index}/_settings", &[]) {
            Err(ElasticsearchError::PathTemplate { template, reason }) => {
                assert_eq!(template, "/{index}/_settings");
                assert_eq!(reason, "no value for `index`");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_templates() {
        assert!(expand("/{index", &[("index", "x")]).is_err());
        assert!(expand("/{}/_settings", &[]).is_err());
        assert!(expand("/index}/_settings", &[]).is_err());
    }

    #[test]
    fn test_stray_brace_before_placeholder() {
        match expand("/a}b/{x}", &[("x", "y")]) {
            Err(ElasticsearchError::PathTemplate { reason, .. }) => {
                assert_eq!(reason, "unmatched `}`")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
