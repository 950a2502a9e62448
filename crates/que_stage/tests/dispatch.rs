//! Event dispatch: `on-click` bindings and `Component::dispatch`.

use std::cell::RefCell;
use std::rc::Rc;

use que_relief::{EvalError, Value};
use que_stage::{mount, Component, Document, HostTree, Methods, MountOptions, Store};

type Calls = Rc<RefCell<Vec<(String, Vec<Value>)>>>;

fn recording_methods(calls: &Calls) -> Methods {
    let greet_calls = Rc::clone(calls);
    let bump_calls = Rc::clone(calls);
    Methods::new()
        .with("greet", move |_, args| {
            greet_calls
                .borrow_mut()
                .push(("greet".to_string(), args.to_vec()));
            Ok(Value::from(format!(
                "Hello {}",
                args.first().cloned().unwrap_or_default()
            )))
        })
        .with("increment", move |ctx, args| {
            bump_calls
                .borrow_mut()
                .push(("increment".to_string(), args.to_vec()));
            let field = args.first().map(Value::to_string).unwrap_or_default();
            let next = ctx.store().get(&field).to_number() + 1.0;
            ctx.store().set(&field, next)?;
            Ok(Value::Number(next))
        })
}

fn setup(html: &str, data: Store) -> (Rc<RefCell<Document>>, Component<Document>, Calls) {
    let calls = Calls::default();
    let doc = Rc::new(RefCell::new(Document::parse(html)));
    let options = MountOptions::new(data).with_methods(recording_methods(&calls));
    let component = mount(Rc::clone(&doc), "#app", options).unwrap().unwrap();
    (doc, component, calls)
}

#[test]
fn test_dispatch_coerces_arguments() {
    let (_doc, component, calls) = setup(
        r#"<div id="app"></div>"#,
        Store::new([("who", "Lee")]),
    );
    assert_eq!(
        component.dispatch("greet('Ada', 3)"),
        Ok(Value::from("Hello Ada"))
    );
    assert_eq!(component.dispatch("greet(who)"), Ok(Value::from("Hello Lee")));
    assert_eq!(component.dispatch("greet"), Ok(Value::from("Hello undefined")));
    assert_eq!(
        *calls.borrow(),
        vec![
            ("greet".to_string(), vec![Value::from("Ada"), Value::from(3)]),
            ("greet".to_string(), vec![Value::from("Lee")]),
            ("greet".to_string(), vec![]),
        ]
    );
}

#[test]
fn test_dispatch_errors() {
    let (_doc, component, calls) = setup(r#"<div id="app"></div>"#, Store::default());
    assert_eq!(
        component.dispatch("missing('x')"),
        Err(EvalError::method_not_found("missing"))
    );
    assert!(matches!(
        component.dispatch("a && b"),
        Err(EvalError::Syntax { .. })
    ));
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_click_binding() {
    let (doc, component, calls) = setup(
        r#"<div id="app"><button id="go" on-click="increment('count')">+</button><span>{{count}}</span></div>"#,
        Store::new([("count", 0)]),
    );
    insta::assert_snapshot!(
        doc.borrow().to_html(),
        @r#"<div id="app"><button id="go">+</button><span>0</span></div>"#
    );

    let button = doc.borrow().query_selector("#go").unwrap();
    assert_eq!(component.click_targets(), vec![button]);
    assert_eq!(component.click(button), Ok(Some(Value::from(1))));
    assert_eq!(component.click(button), Ok(Some(Value::from(2))));
    assert_eq!(
        doc.borrow().to_html(),
        r#"<div id="app"><button id="go">+</button><span>2</span></div>"#
    );
    assert_eq!(calls.borrow().len(), 2);

    let span = doc.borrow().query_selector("span").unwrap();
    assert_eq!(component.click(span), Ok(None));
}

#[test]
fn test_clicks_do_not_bubble() {
    let (doc, component, calls) = setup(
        r#"<div id="app" on-click="greet('outer')"><b on-click="greet('inner')">x</b></div>"#,
        Store::default(),
    );
    let inner = doc.borrow().query_selector("b").unwrap();
    component.click(inner).unwrap();
    assert_eq!(
        *calls.borrow(),
        vec![("greet".to_string(), vec![Value::from("inner")])]
    );
}

#[test]
fn test_malformed_click_binding_is_skipped() {
    let (doc, component, _calls) = setup(
        r#"<div id="app"><button on-click="a && b">x</button></div>"#,
        Store::default(),
    );
    assert!(component.click_targets().is_empty());
    assert_eq!(
        doc.borrow().to_html(),
        r#"<div id="app"><button>x</button></div>"#
    );
}

#[test]
fn test_click_toggles_conditional() {
    let toggle = Methods::new().with("toggle", |ctx, args| {
        let field = args.first().map(Value::to_string).unwrap_or_default();
        let next = !ctx.store().get(&field).is_truthy();
        ctx.store().set(&field, next)?;
        Ok(Value::Bool(next))
    });
    let doc = Rc::new(RefCell::new(Document::parse(
        r#"<div id="app"><button on-click="toggle('open')">menu</button><nav show-if="open">items</nav></div>"#,
    )));
    let options = MountOptions::new(Store::new([("open", false)])).with_methods(toggle);
    let component = mount(Rc::clone(&doc), "#app", options).unwrap().unwrap();
    let button = component.click_targets()[0];

    assert_eq!(
        doc.borrow().to_html(),
        r#"<div id="app"><button>menu</button></div>"#
    );
    component.click(button).unwrap();
    assert_eq!(
        doc.borrow().to_html(),
        r#"<div id="app"><button>menu</button><nav show-if="open">items</nav></div>"#
    );
    component.click(button).unwrap();
    assert_eq!(
        doc.borrow().to_html(),
        r#"<div id="app"><button>menu</button></div>"#
    );
}
