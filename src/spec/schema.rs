use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Master macro for the field type keywords recognized in schema text.
macro_rules! define_field_types {
    ( $( ($variant:ident, $keyword:expr) ),* $(,)? ) => {
        /// The declared type of a model field.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum FieldType {
            $( $variant, )*
            /// An unrecognized type token, kept verbatim.
            Custom(String),
        }

        impl FieldType {
            /// Capitalizes the first whole-word occurrence of each keyword in
            /// `token`, ignoring case, so `string[]` reads `String[]`.
            /// Returns `None` when the token mentions no keyword.
            pub fn normalize_keywords(token: &str) -> Option<String> {
                let mut text = token.to_string();
                let mut found = false;
                $(
                    if let Some(replaced) = replace_first_word(&text, $keyword, stringify!($variant)) {
                        text = replaced;
                        found = true;
                    }
                )*
                found.then_some(text)
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $( FieldType::$variant => stringify!($variant), )*
                    FieldType::Custom(token) => token,
                }
            }
        }

        impl From<String> for FieldType {
            fn from(name: String) -> Self {
                match name.as_str() {
                    $( stringify!($variant) => FieldType::$variant, )*
                    _ => FieldType::Custom(name),
                }
            }
        }
    };
}

define_field_types! {
    (String, "string"),
    (Number, "number"),
    (Boolean, "boolean"),
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn replace_first_word(text: &str, word: &str, replacement: &str) -> Option<String> {
    text.char_indices().find_map(|(start, _)| {
        let end = start + word.len();
        let candidate = text.get(start..end)?;
        let bounded_before = text[..start].chars().next_back().is_none_or(|c| !is_word_char(c));
        let bounded_after = text[end..].chars().next().is_none_or(|c| !is_word_char(c));
        (candidate.eq_ignore_ascii_case(word) && bounded_before && bounded_after)
            .then(|| format!("{}{}{}", &text[..start], replacement, &text[end..]))
    })
}

impl Default for FieldType {
    fn default() -> Self {
        FieldType::String
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Custom(token) => token,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single field of a data model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Always `true`: schema text has no syntax for optional fields.
    pub required: bool,
}

impl FieldSpec {
    pub fn required(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: true,
        }
    }
}

/// A data model derived from a `model` node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSpec {
    pub name: String,
    pub fields: IndexMap<String, FieldSpec>,
    /// Lifecycle hook name -> natural-language instruction. Omitted when empty.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub hooks: IndexMap<String, String>,
}

impl SchemaSpec {
    pub fn new(name: impl Into<String>, fields: IndexMap<String, FieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
            hooks: IndexMap::new(),
        }
    }
}
