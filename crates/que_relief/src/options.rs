//! Directive options.

use que_carton::CompactString;
use serde::{Deserialize, Serialize};

/// Reserved attribute names and interpolation delimiters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DirectiveOptions {
    /// Conditional-presence attribute (default: `show-if`)
    pub show_if: CompactString,
    /// Click-bound attribute (default: `on-click`)
    pub on_click: CompactString,
    /// Interpolation delimiters (default: `{{` and `}}`)
    pub delimiters: (CompactString, CompactString),
}

impl Default for DirectiveOptions {
    fn default() -> Self {
        Self {
            show_if: CompactString::const_new("show-if"),
            on_click: CompactString::const_new("on-click"),
            delimiters: (CompactString::const_new("{{"), CompactString::const_new("}}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let options: DirectiveOptions =
            serde_json::from_str(r#"{ "onClick": "@click" }"#).unwrap();
        assert_eq!(options.on_click, "@click");
        assert_eq!(options.show_if, "show-if");
        assert_eq!(options.delimiters.0, "{{");
    }
}
