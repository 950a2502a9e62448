//! Text interpolation templates.

use que_armature::{split_template, TemplatePart};
use que_carton::CompactString;
use que_relief::FieldRef;

use crate::dependencies::Dependencies;
use crate::scope::Scope;

#[derive(Debug, Clone, PartialEq)]
enum Part {
    Text(CompactString),
    Field(FieldRef),
}

/// Compiled interpolation: literal text with field placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    parts: Vec<Part>,
    dependencies: Dependencies,
}

/// Compile `text` if it holds at least one placeholder
pub fn compile_template(text: &str, open: &str, close: &str) -> Option<Template> {
    let mut dependencies = Dependencies::Empty;
    let parts: Vec<Part> = split_template(text, open, close)
        .into_iter()
        .map(|part| match part {
            TemplatePart::Text(text) => Part::Text(text.into()),
            TemplatePart::Field(name) => {
                dependencies.insert(name);
                Part::Field(FieldRef::new(name))
            }
        })
        .collect();

    if matches!(dependencies, Dependencies::Empty) {
        return None;
    }
    Some(Template {
        parts,
        dependencies,
    })
}

impl Template {
    /// Render against live state; missing fields render as `undefined`
    pub fn render<S: Scope + ?Sized>(&self, scope: &S) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Field(field) => out.push_str(&scope.field(field.name()).to_string()),
            }
        }
        out
    }

    /// Template-literal form, e.g. `` `Hello ${context.name}!` ``
    pub fn to_source(&self) -> String {
        let mut out = String::from("`");
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(&text.replace('`', "\\`")),
                Part::Field(field) => {
                    out.push_str("${");
                    out.push_str(&field.to_string());
                    out.push('}');
                }
            }
        }
        out.push('`');
        out
    }

    /// Fields the template reads
    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_scope::TestScope;
    use que_relief::Value;

    #[test]
    fn test_render_and_update() {
        let template = compile_template("Hello {{name}}!", "{{", "}}").unwrap();
        let scope = TestScope::with(&[("name", "Max".into())]);
        assert_eq!(template.render(&scope), "Hello Max!");
        scope.set("name", "Lee");
        assert_eq!(template.render(&scope), "Hello Lee!");
    }

    #[test]
    fn test_render_is_idempotent() {
        let template = compile_template("{{count}} items", "{{", "}}").unwrap();
        let scope = TestScope::with(&[("count", Value::from(3))]);
        let first = template.render(&scope);
        assert_eq!(template.render(&scope), first);
        assert_eq!(first, "3 items");
    }

    #[test]
    fn test_missing_field() {
        let template = compile_template("[{{ghost}}]", "{{", "}}").unwrap();
        assert_eq!(template.render(&TestScope::default()), "[undefined]");
    }

    #[test]
    fn test_no_placeholder() {
        assert!(compile_template("plain text", "{{", "}}").is_none());
        assert!(compile_template("{{ spaced }}", "{{", "}}").is_none());
    }

    #[test]
    fn test_source_and_dependencies() {
        let template = compile_template("{{first}} `{{last}}`", "{{", "}}").unwrap();
        insta::assert_snapshot!(
            template.to_source(),
            @r"`${context.first} \`${context.last}\``"
        );
        assert_eq!(
            template.dependencies().sorted_fields(),
            Some(vec!["first", "last"])
        );
    }
}
