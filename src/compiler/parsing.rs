use crate::spec::{FieldSpec, FieldType};
use indexmap::IndexMap;

/// What to do with a type token that mentions none of `string`, `number`
/// or `boolean`. Tokens that do mention one have it capitalized in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldTypePolicy {
    /// Keep the trimmed token verbatim, e.g. `Date` or `ObjectId`.
    #[default]
    Passthrough,
    /// Fall back to `String`.
    CoerceToString,
}

impl FieldTypePolicy {
    pub fn resolve(&self, token: &str) -> FieldType {
        match FieldType::normalize_keywords(token) {
            Some(normalized) => FieldType::from(normalized),
            None => match self {
                FieldTypePolicy::Passthrough => FieldType::Custom(token.to_string()),
                FieldTypePolicy::CoerceToString => FieldType::String,
            },
        }
    }
}

/// Parses newline-delimited `name: type` declarations into ordered fields.
///
/// Lines are trimmed and blank ones skipped. A line needs both a name and a
/// type token; anything after a second `:` is ignored. Redeclaring a name
/// replaces its type but keeps its original position.
pub fn parse_schema_text(text: &str, policy: FieldTypePolicy) -> IndexMap<String, FieldSpec> {
    let mut fields = IndexMap::new();
    for line in text.trim().lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split(':').map(str::trim);
        let name = parts.next().unwrap_or_default();
        let token = parts.next().unwrap_or_default();
        if name.is_empty() || token.is_empty() {
            tracing::trace!("Skipping schema line without name and type: '{}'", line);
            continue;
        }
        fields.insert(name.to_string(), FieldSpec::required(policy.resolve(token)));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_normalized() {
        let fields = parse_schema_text("name: string\nage: NUMBER\r\nactive: Boolean", FieldTypePolicy::default());
        let types: Vec<_> = fields.iter().map(|(k, v)| (k.as_str(), v.field_type.as_str())).collect();
        assert_eq!(types, vec![("name", "String"), ("age", "Number"), ("active", "Boolean")]);
        assert!(fields.values().all(|f| f.required));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let fields = parse_schema_text("\n  \nnoType\n: String\nempty:   \nok: string:extra\n", FieldTypePolicy::default());
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["ok"].field_type, FieldType::String);
    }

    #[test]
    fn test_unknown_tokens_follow_policy() {
        let passthrough = parse_schema_text("createdAt: Date", FieldTypePolicy::Passthrough);
        assert_eq!(passthrough["createdAt"].field_type, FieldType::Custom("Date".to_string()));

        let coerced = parse_schema_text("createdAt: Date", FieldTypePolicy::CoerceToString);
        assert_eq!(coerced["createdAt"].field_type, FieldType::String);
    }

    #[test]
    fn test_keywords_inside_tokens_are_capitalized() {
        let fields = parse_schema_text(
            "tags: string[]\nids: Array<number>\npair: Map<string, string>\nnote: strings",
            FieldTypePolicy::default(),
        );
        let types: Vec<_> = fields.values().map(|f| f.field_type.as_str()).collect();
        assert_eq!(types, vec!["String[]", "Array<Number>", "Map<String, string>", "strings"]);

        let coerced = parse_schema_text("ids: Array<number>\nnote: strings", FieldTypePolicy::CoerceToString);
        assert_eq!(coerced["ids"].field_type, FieldType::Custom("Array<Number>".to_string()));
        assert_eq!(coerced["note"].field_type, FieldType::String);
    }

    #[test]
    fn test_redeclared_field_keeps_position() {
        let fields = parse_schema_text("a: string\nb: number\na: boolean", FieldTypePolicy::default());
        let names: Vec<_> = fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(fields["a"].field_type, FieldType::Boolean);
    }
}
