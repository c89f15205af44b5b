//! Bundled resume templates and sample data.
//!
//! The same files that live under `template/` are compiled into the binary so
//! a resume can be built without a template directory on disk.

/// Name under which [`base_template`] is registered.
pub const BASE_NAME: &str = "base.html";
/// Name under which [`index_template`] is registered, and the default entry
/// template.
pub const INDEX_NAME: &str = "index.html";

/// Page skeleton: document head, print styles, and a `content` block.
pub fn base_template() -> &'static str {
    include_str!("../template/base.html")
}

/// Single-page resume layout extending [`base_template`].
pub fn index_template() -> &'static str {
    include_str!("../template/index.html")
}

/// Example resume document matching the fields [`index_template`] reads.
pub fn sample_data() -> &'static str {
    include_str!("../data.yaml")
}

/// Smallest document the bundled layout renders meaningfully.
pub fn minimal_data() -> &'static str {
    "name: Jane Doe\nsummary: Builds <%fast%> things.\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_extends_base() {
        assert!(index_template().contains(r#"{% extends "base.html" %}"#));
        assert!(base_template().contains("{% block content %}"));
    }

    #[test]
    fn sample_data_parses() {
        for (name, text) in [("sample", sample_data()), ("minimal", minimal_data())] {
            let data = crate::data::parse_yaml(text);
            assert!(data.is_ok(), "'{}' should parse: {:?}", name, data.err());
        }
    }
}
