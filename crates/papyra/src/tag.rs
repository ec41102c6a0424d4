//! Field annotation parsing.
//!
//! Annotations use the familiar struct-tag text form: space-separated
//! `key:"value"` pairs, where the value is a comma-separated list whose
//! first element is the binding name and the rest are option tokens
//! (`validate:"required,min=3"`). An absent key is a structural signal
//! ("this field is not a query parameter"), never an error; malformed
//! syntax means the model definition itself is broken and aborts the
//! synthesis pass.

/// Body binding name (inbound traversal)
pub const FORM: &str = "form";
/// Query parameter binding
pub const QUERY: &str = "query";
/// Path parameter binding
pub const PATH: &str = "path";
/// Header parameter binding
pub const HEADER: &str = "header";
/// Cookie parameter binding
pub const COOKIE: &str = "cookie";
/// Serialized name (outbound traversal)
pub const JSON: &str = "json";
/// Human description override
pub const DESCRIPTION: &str = "description";
/// Default literal override
pub const DEFAULT: &str = "default";
/// Validation rule tokens; the literal `required` token marks requiredness
pub const VALIDATE: &str = "validate";

/// A single parsed annotation value: leading name plus option tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValue {
    pub name: String,
    pub options: Vec<String>,
}

/// All annotations of one field, parsed once per field visit.
#[derive(Debug, Clone, Default)]
pub struct FieldTags {
    entries: Vec<(String, TagValue)>,
}

impl FieldTags {
    /// Parse raw annotation text.
    ///
    /// # Panics
    /// Malformed syntax (key without `:"..."`, unterminated value) is a
    /// fatal configuration error.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut entries = Vec::new();
        let mut rest = raw.trim_start();
        while !rest.is_empty() {
            let Some(colon) = rest.find(':') else {
                panic!("malformed field tag {raw:?}: expected `:` after key in {rest:?}");
            };
            let key = &rest[..colon];
            if key.is_empty() || key.contains(char::is_whitespace) {
                panic!("malformed field tag {raw:?}: invalid key {key:?}");
            }
            rest = &rest[colon + 1..];
            if !rest.starts_with('"') {
                panic!("malformed field tag {raw:?}: expected quoted value for key {key:?}");
            }
            let Some(end) = rest[1..].find('"') else {
                panic!("malformed field tag {raw:?}: unterminated value for key {key:?}");
            };
            let value = &rest[1..=end];
            let mut parts = value.split(',').map(str::to_string);
            let name = parts.next().unwrap_or_default();
            entries.push((
                key.to_string(),
                TagValue {
                    name,
                    options: parts.collect(),
                },
            ));
            rest = rest[end + 2..].trim_start();
        }
        Self { entries }
    }

    /// Look up a category; `None` means the annotation is absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Whether the `validate` rule list contains the literal `required`
    /// token.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.get(VALIDATE).is_some_and(|tag| {
            tag.name == "required" || tag.options.iter().any(|opt| opt == "required")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_multiple_categories() {
        let tags = FieldTags::parse(
            r#"json:"user_id" query:"user_id" description:"User identifier" validate:"required,min=1""#,
        );
        assert_eq!(tags.get(JSON).unwrap().name, "user_id");
        assert_eq!(tags.get(QUERY).unwrap().name, "user_id");
        assert_eq!(tags.get(DESCRIPTION).unwrap().name, "User identifier");
        assert!(tags.is_required());
    }

    #[test]
    fn absent_key_is_a_signal_not_an_error() {
        let tags = FieldTags::parse(r#"json:"name""#);
        assert!(tags.get(QUERY).is_none());
        assert!(!tags.is_required());
    }

    #[test]
    fn empty_tag_text_parses_to_no_entries() {
        let tags = FieldTags::parse("");
        assert!(tags.get(JSON).is_none());
    }

    #[test]
    fn options_split_after_leading_name() {
        let tags = FieldTags::parse(r#"validate:"min=3,required,max=10""#);
        let validate = tags.get(VALIDATE).unwrap();
        assert_eq!(validate.name, "min=3");
        assert_eq!(validate.options, vec!["required", "max=10"]);
        assert!(tags.is_required());
    }

    #[test]
    fn required_must_be_an_exact_token() {
        let tags = FieldTags::parse(r#"validate:"required_if=other""#);
        assert!(!tags.is_required());
    }

    #[test]
    fn first_entry_wins_on_duplicate_keys() {
        let tags = FieldTags::parse(r#"query:"a" query:"b""#);
        assert_eq!(tags.get(QUERY).unwrap().name, "a");
    }

    #[rstest]
    #[case(r#"json"name""#)]
    #[case(r#"json:name"#)]
    #[case(r#"json:"name"#)]
    #[case(r#"bad key:"name""#)]
    #[should_panic(expected = "malformed field tag")]
    fn malformed_tag_is_fatal(#[case] raw: &str) {
        let _ = FieldTags::parse(raw);
    }
}
