//! Integration tests for `mm render`.

mod common;

use common::{CHAIN_JSON, TestEnv};
use predicates::prelude::*;

#[test]
fn test_render_to_stdout() {
    let env = TestEnv::new();
    env.write("map.json", CHAIN_JSON);

    env.mm()
        .args(["render", "map.json", "--ticks", "10"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<svg"))
        .stdout(predicate::str::contains("xmlns=\"http://www.w3.org/2000/svg\""))
        .stdout(predicate::str::contains("viewBox=\""))
        .stdout(predicate::str::contains("class=\"mindmap-connection\""))
        .stdout(predicate::str::contains("class=\"mindmap-subnodes\""))
        .stdout(predicate::str::contains("<ul><li>b1</li></ul>"));
}

#[test]
fn test_render_pinned_node_geometry() {
    let env = TestEnv::new();
    env.write("map.json", CHAIN_JSON);

    // Node c is pinned at (200, 50) with a 40x20 box.
    env.mm()
        .args(["render", "map.json", "--ticks", "25"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"class="mindmap-node" width="44" height="20" x="180" y="40""#,
        ))
        .stdout(predicate::str::contains(
            r#"class="mindmap-subnodes" width="4" height="0" x="220" y="50""#,
        ));
}

#[test]
fn test_render_to_file_reports_json() {
    let env = TestEnv::new();
    env.write("map.json", CHAIN_JSON);

    env.mm()
        .args(["render", "map.json", "-o", "out.svg", "--ticks", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""nodes":3"#))
        .stdout(predicate::str::contains(r#""connections":2"#))
        .stdout(predicate::str::contains(r#""ticks":5"#))
        .stdout(predicate::str::contains(r#""view_box":"#));

    let svg = std::fs::read_to_string(env.path().join("out.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<path").count(), 2);
    assert_eq!(svg.matches("<foreignObject").count(), 6);
}

#[test]
fn test_render_human_output() {
    let env = TestEnv::new();
    env.write("map.json", CHAIN_JSON);

    env.mm()
        .args(["-H", "render", "map.json", "-o", "out.svg", "--ticks", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rendered out.svg"))
        .stdout(predicate::str::contains("3 nodes, 2 connections, 3 ticks"));
}

#[test]
fn test_render_scale_clamped_by_config() {
    let env = TestEnv::new();
    env.write("map.json", CHAIN_JSON);

    env.mm()
        .args([
            "render", "map.json", "-o", "out.svg", "--ticks", "1", "--scale", "9", "--set",
            "zoom.max-scale=2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""transform":"translate(0,0) scale(2)""#,
        ));

    let svg = std::fs::read_to_string(env.path().join("out.svg")).unwrap();
    assert_eq!(svg.matches(r#"transform="translate(0,0) scale(2)""#).count(), 2);
}

#[test]
fn test_render_drag_moves_node() {
    let env = TestEnv::new();
    env.write("map.json", CHAIN_JSON);

    // a is 80x40, so dropping it at (-500, 300) puts its box at (-540, 280).
    env.mm()
        .args(["render", "map.json", "--ticks", "5", "--drag", "a=-500,300"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"class="mindmap-node" width="84" height="40" x="-540" y="280""#,
        ));
}

#[test]
fn test_render_zero_ticks_with_drag() {
    let env = TestEnv::new();
    env.write("map.json", CHAIN_JSON);

    env.mm()
        .args(["render", "map.json", "-o", "out.svg", "--ticks", "0", "--drag", "a=-500,300"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""ticks":1"#));

    let svg = std::fs::read_to_string(env.path().join("out.svg")).unwrap();
    assert_eq!(svg.matches(" d=\"M ").count(), 2);
    assert!(svg.contains(r#"class="mindmap-node" width="84" height="40" x="-540" y="280""#));
}

#[test]
fn test_render_drag_unknown_node_fails() {
    let env = TestEnv::new();
    env.write("map.json", CHAIN_JSON);

    env.mm()
        .args(["render", "map.json", "--drag", "zzz=1,1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("zzz"));
}

#[test]
fn test_render_invalid_drag_argument() {
    let env = TestEnv::new();
    env.write("map.json", CHAIN_JSON);

    env.mm()
        .args(["-H", "render", "map.json", "--drag", "a:1,1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Invalid input"));
}

#[test]
fn test_render_missing_input() {
    let env = TestEnv::new();

    env.mm()
        .args(["render", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#"{"error":"#))
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn test_render_dangling_connection() {
    let env = TestEnv::new();
    env.write(
        "bad.json",
        r#"{"nodes": [{"id": "a"}], "connections": [{"source": "a", "target": "ghost"}]}"#,
    );

    env.mm()
        .args(["-H", "render", "bad.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn test_render_empty_document() {
    let env = TestEnv::new();
    env.write("empty.json", "{}");

    env.mm()
        .args(["render", "empty.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"viewBox="0 0 0 0""#));
}
