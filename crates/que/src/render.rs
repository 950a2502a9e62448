//! Render pipeline: parse a template, mount it, apply steps, serialize.

use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;

use que_carton::CompactString;
use que_relief::Value;
use que_stage::{mount, Component, Document, HostTree, Methods, Store};

use crate::builtins::builtin_methods;
use crate::config::QueConfig;
use crate::error::RenderError;

/// An interaction applied after mounting
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// `set:<field>=<json>`
    Set { field: CompactString, value: Value },
    /// `click:<selector>`
    Click(String),
    /// `call:<expression>`
    Call(String),
}

impl FromStr for Step {
    type Err = RenderError;

    fn from_str(step: &str) -> Result<Self, Self::Err> {
        let Some((kind, rest)) = step.split_once(':') else {
            return Err(RenderError::step(step, "expected `set:`, `click:` or `call:`"));
        };
        match kind {
            "set" => {
                let Some((field, json)) = rest.split_once('=') else {
                    return Err(RenderError::step(step, "expected `set:<field>=<json>`"));
                };
                let field = field.trim();
                if !que_carton::is_word(field) {
                    return Err(RenderError::step(step, "field name must be a bare word"));
                }
                let value: serde_json::Value = serde_json::from_str(json)
                    .map_err(|e| RenderError::step(step, e.to_string()))?;
                Ok(Self::Set {
                    field: CompactString::from(field),
                    value: Value::from(value),
                })
            }
            "click" => Ok(Self::Click(rest.trim().to_string())),
            "call" => Ok(Self::Call(rest.trim().to_string())),
            _ => Err(RenderError::step(step, format!("unknown step kind `{kind}`"))),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set { field, value } => write!(f, "set:{field}={}", value.to_json()),
            Self::Click(selector) => write!(f, "click:{selector}"),
            Self::Call(expression) => write!(f, "call:{expression}"),
        }
    }
}

/// Mount `template` with the built-in methods, apply `steps` in order and
/// return the resulting HTML
pub fn render(
    template: &str,
    data: Store,
    config: &QueConfig,
    steps: &[Step],
) -> Result<String, RenderError> {
    render_with(template, data, builtin_methods(), config, steps)
}

/// [`render`] with an explicit method table
pub fn render_with(
    template: &str,
    data: Store,
    methods: Methods,
    config: &QueConfig,
    steps: &[Step],
) -> Result<String, RenderError> {
    let doc = Rc::new(RefCell::new(Document::parse(template)));
    let options = config.mount_options(data, methods);
    let component = mount(Rc::clone(&doc), &config.selector, options)?
        .ok_or_else(|| RenderError::MountTargetMissing(config.selector.clone()))?;

    for step in steps {
        apply(&component, step)?;
        tracing::debug!(%step, "applied step");
    }

    let html = doc.borrow().to_html();
    Ok(html)
}

fn apply(component: &Component<Document>, step: &Step) -> Result<(), RenderError> {
    match step {
        Step::Set { field, value } => {
            component.store().set(field, value.clone())?;
        }
        Step::Click(selector) => {
            let node = component
                .host()
                .borrow()
                .query_selector(selector)
                .ok_or_else(|| RenderError::step(step.to_string(), "no element matches"))?;
            if component.click(node)?.is_none() {
                tracing::warn!(%selector, "element has no click binding");
            }
        }
        Step::Call(expression) => {
            component.dispatch(expression)?;
        }
    }
    Ok(())
}

/// Read a UTF-8 file
pub fn read_file(path: &Path) -> Result<String, RenderError> {
    std::fs::read_to_string(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load initial fields from a JSON object file
pub fn load_data(path: &Path) -> Result<Store, RenderError> {
    let content = read_file(path)?;
    let data: serde_json::Value =
        serde_json::from_str(&content).map_err(|source| RenderError::Json {
            context: path.display().to_string(),
            source,
        })?;
    Ok(Store::from_json(data))
}
