//! Methods available to templates rendered by the CLI.
//!
//! Each takes the target field name as a quoted first argument, e.g.
//! `on-click="toggle('open')"`.

use que_carton::CompactString;
use que_relief::{EvalError, EvalResult, Value};
use que_stage::{Context, Methods};

/// `toggle`, `assign`, `increment` and `decrement`
pub fn builtin_methods() -> Methods {
    Methods::new()
        .with("toggle", toggle)
        .with("assign", assign)
        .with("increment", increment)
        .with("decrement", decrement)
}

fn field_name(method: &str, args: &[Value]) -> EvalResult<CompactString> {
    match args.first() {
        Some(Value::String(name)) if !name.is_empty() => Ok(name.clone()),
        _ => Err(EvalError::method(
            method,
            "expected a quoted field name as the first argument",
        )),
    }
}

/// Flip a field's truthiness
fn toggle(ctx: &Context, args: &[Value]) -> EvalResult {
    let field = field_name("toggle", args)?;
    let next = !ctx.store().get(&field).is_truthy();
    ctx.store().set(&field, next)?;
    Ok(Value::Bool(next))
}

/// Write the second argument into a field
fn assign(ctx: &Context, args: &[Value]) -> EvalResult {
    let field = field_name("assign", args)?;
    let value = args.get(1).cloned().unwrap_or_default();
    ctx.store().set(&field, value.clone())?;
    Ok(value)
}

fn increment(ctx: &Context, args: &[Value]) -> EvalResult {
    step("increment", ctx, args, 1.0)
}

fn decrement(ctx: &Context, args: &[Value]) -> EvalResult {
    step("decrement", ctx, args, -1.0)
}

/// Add `sign * by` (default 1) to a numeric field; a missing field counts as 0
fn step(method: &str, ctx: &Context, args: &[Value], sign: f64) -> EvalResult {
    let field = field_name(method, args)?;
    let by = args.get(1).map_or(1.0, Value::to_number);
    let current = match ctx.store().get(&field) {
        Value::Undefined => 0.0,
        value => value.to_number(),
    };
    let next = current + sign * by;
    ctx.store().set(&field, next)?;
    Ok(Value::Number(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use que_atelier::Scope;
    use que_stage::Store;

    fn context(store: &Store) -> Context {
        Context::new(store.clone(), builtin_methods())
    }

    #[test]
    fn test_toggle() {
        let store = Store::new([("open", false)]);
        let ctx = context(&store);
        assert_eq!(ctx.call("toggle", &["open".into()]), Ok(Value::Bool(true)));
        assert_eq!(store.get("open"), Value::Bool(true));
        ctx.call("toggle", &["open".into()]).unwrap();
        assert_eq!(store.get("open"), Value::Bool(false));
    }

    #[test]
    fn test_counters() {
        let store = Store::new([("count", 2)]);
        let ctx = context(&store);
        assert_eq!(ctx.call("increment", &["count".into()]), Ok(Value::from(3)));
        assert_eq!(
            ctx.call("decrement", &["count".into(), Value::from(5)]),
            Ok(Value::from(-2))
        );
        assert_eq!(ctx.call("increment", &["fresh".into()]), Ok(Value::from(1)));
    }

    #[test]
    fn test_assign() {
        let store = Store::default();
        let ctx = context(&store);
        ctx.call("assign", &["name".into(), "Lee".into()]).unwrap();
        assert_eq!(store.get("name"), Value::from("Lee"));
    }

    #[test]
    fn test_field_name_required() {
        let ctx = context(&Store::default());
        assert!(matches!(
            ctx.call("toggle", &[]),
            Err(EvalError::Method { .. })
        ));
        assert!(matches!(
            ctx.call("increment", &[Value::from(1)]),
            Err(EvalError::Method { .. })
        ));
    }
}
