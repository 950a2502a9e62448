//! Configuration file loading for que.
//!
//! Reads `que.config.json` from the current working directory, or from an
//! explicit path. Also provides the JSON Schema for editor autocompletion.

use std::path::Path;

use que_relief::DirectiveOptions;
use que_stage::{Methods, MountOptions, Store};
use serde::{Deserialize, Serialize};

/// Default config file name
pub const CONFIG_FILE: &str = "que.config.json";

/// Top-level que configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueConfig {
    /// JSON Schema reference (for editor autocompletion).
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Selector of the element to mount onto.
    pub selector: String,

    /// Directive attribute names and interpolation delimiters.
    pub directives: DirectiveOptions,

    /// Only re-run directives that read the changed field.
    pub track_dependencies: bool,
}

impl Default for QueConfig {
    fn default() -> Self {
        Self {
            schema: None,
            selector: "#app".to_string(),
            directives: DirectiveOptions::default(),
            track_dependencies: false,
        }
    }
}

impl QueConfig {
    pub fn mount_options(&self, data: Store, methods: Methods) -> MountOptions {
        MountOptions::new(data)
            .with_methods(methods)
            .with_directives(self.directives.clone())
            .with_dependency_tracking(self.track_dependencies)
    }
}

/// Load `que.config.json` from the given directory (or CWD if None).
pub fn load_config(dir: Option<&Path>) -> QueConfig {
    let base = dir
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    load_config_file(&base.join(CONFIG_FILE))
}

/// Load a config file. A missing file yields the defaults; an unreadable
/// or malformed one is reported and also yields the defaults.
pub fn load_config_file(path: &Path) -> QueConfig {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file");
        return QueConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse config");
                QueConfig::default()
            }
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read config");
            QueConfig::default()
        }
    }
}

/// JSON Schema for `que.config.json`.
pub const QUE_CONFIG_SCHEMA: &str = r##"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Que Configuration",
  "description": "Configuration file for que - reactive templating micro-framework",
  "type": "object",
  "properties": {
    "$schema": {
      "type": "string",
      "description": "JSON Schema reference for editor autocompletion"
    },
    "selector": {
      "type": "string",
      "description": "Selector of the element to mount onto: a tag name followed by #id and .class parts",
      "default": "#app",
      "examples": ["#app", "main.page", "div#root"]
    },
    "directives": {
      "type": "object",
      "description": "Directive attribute names and interpolation delimiters",
      "properties": {
        "showIf": {
          "type": "string",
          "description": "Attribute holding a conditional-presence expression",
          "default": "show-if"
        },
        "onClick": {
          "type": "string",
          "description": "Attribute holding a click-bound method call",
          "default": "on-click"
        },
        "delimiters": {
          "type": "array",
          "description": "Opening and closing interpolation delimiters",
          "items": { "type": "string", "minLength": 1 },
          "minItems": 2,
          "maxItems": 2,
          "default": ["{{", "}}"]
        }
      },
      "additionalProperties": false
    },
    "trackDependencies": {
      "type": "boolean",
      "description": "Only re-run directives that read the changed field",
      "default": false
    }
  },
  "additionalProperties": false
}"##;
