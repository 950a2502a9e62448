//! End-to-end rendering of the templates under `demos/`.

use std::path::Path;

use que::render::load_data;
use que::{load_config_file, render, Step};

fn demo(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

fn run(steps: &[&str]) -> String {
    let config = load_config_file(&demo("que.config.json"));
    let template = std::fs::read_to_string(demo("clicker.html")).unwrap();
    let data = load_data(&demo("clicker.json")).unwrap();
    let steps: Vec<Step> = steps.iter().map(|s| s.parse().unwrap()).collect();
    let html = render(&template, data, &config, &steps).unwrap();
    html.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_initial_render() {
    insta::assert_snapshot!(run(&[]), @r#"
    <html>
    <body>
    <main id="app">
    <h1>Hello Max!</h1>
    <p show-if="!count">Nothing clicked yet.</p>
    <button id="more">More</button>
    <button id="reset">Reset</button>
    <button id="details">Details</button>
    </main>
    </body>
    </html>
    "#);
}

#[test]
fn test_clicks_and_streak() {
    insta::assert_snapshot!(
        run(&["click:#more", "click:#more", "click:#details", "set:name=\"Lee\""]),
        @r#"
    <html>
    <body>
    <main id="app">
    <h1>Hello Lee!</h1>
    <p show-if="count &gt; 0">You clicked 2 times.</p>
    <button id="more">More</button>
    <button id="reset">Reset</button>
    <button id="details">Details</button><section show-if="open &amp;&amp; count &gt;= 2">
    <p>Lee is on a streak.</p>
    </section>
    </main>
    </body>
    </html>
    "#
    );
}

#[test]
fn test_reset() {
    let html = run(&["call:increment('count')", "click:#reset"]);
    assert!(html.contains("Nothing clicked yet."));
    assert!(!html.contains("You clicked"));
}
