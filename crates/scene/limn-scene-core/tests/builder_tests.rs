use serde_json::json;

use limn_scene_core::{compile, BuildOptions, Node, SceneError};

fn scene() -> serde_json::Value {
    json!({
        "svg": {
            "width": 800,
            "height": 600,
            "viewbox": {"x": 0, "y": 0, "width": 800, "height": 600},
            "defs": [
                {"linearGradient": {
                    "id": "glow",
                    "x1": 0, "y1": 0, "x2": 1, "y2": 0,
                    "children": [
                        {"stop": {"offset": 0, "stopColor": "#ff0000"}},
                        {"stop": {"offset": 1, "stopColor": "#0000ff"}}
                    ]
                }}
            ],
            "children": [
                {"rect": {
                    "id": "hero",
                    "width": 100, "height": 50, "fill": "url(#glow)",
                    "events": [
                        {"event": "click", "target": "self", "duration": 300.0,
                         "ease": "easeOutQuad", "prop": [{"width": 200}, {"width": 100}]},
                        {"event": "refresh", "target": "window", "duration": 100.0,
                         "prop": [{"opacity": 0.5}]}
                    ]
                }},
                {"circle": {
                    "r": 5,
                    "loop": {"name": "pulse", "children": [
                        {"duration": 200.0, "ease": "easeInOutSine", "prop": {"r": 10}},
                        {"duration": 200.0, "prop": {"r": 5}}
                    ]}
                }}
            ]
        }
    })
}

/// it should compile the tree with defs ahead of regular children
#[test]
fn tree_shape() {
    let compiled = compile(&scene(), BuildOptions::lenient()).unwrap();
    let root = &compiled.document.root;
    assert_eq!(root.tag, "svg");
    assert!(root.id.starts_with("svg-"));
    assert_eq!(root.attrs.get("viewBox").unwrap(), "0 0 800 600");
    assert_eq!(root.children.len(), 3);
    assert_eq!(root.children[0].tag, "defs");
    assert_eq!(root.children[1].tag, "rect");
    assert_eq!(root.children[2].tag, "circle");

    let gradient = &root.children[0].children[0];
    assert!(gradient.id.starts_with("linearGradient-"));
    assert!(gradient.id.ends_with("-glow"));
    assert_eq!(gradient.children.len(), 2);
    assert_eq!(gradient.children[0].tag, "stop");
    assert_eq!(gradient.children[0].attrs.get("stop-color").unwrap(), "#ff0000");
}

/// it should substitute authored references with generated ids
#[test]
fn reference_resolution() {
    let compiled = compile(&scene(), BuildOptions::lenient()).unwrap();
    let root = &compiled.document.root;
    let gradient_id = root.children[0].children[0].id.clone();
    let rect = &root.children[1];
    assert_eq!(rect.attrs.get("fill").unwrap(), &format!("url(#{gradient_id})"));
}

/// it should register events under their declared scopes
#[test]
fn event_wiring() {
    let compiled = compile(&scene(), BuildOptions::lenient()).unwrap();
    let rect_id = compiled.document.root.children[1].id.clone();
    let registry = &compiled.registry;

    assert!(registry.dispatch.win.contains(&"refresh".to_string()));
    assert!(registry
        .dispatch
        .self_
        .iter()
        .any(|b| b.event == "click" && b.target == rect_id));

    let clicks = registry.entries("click");
    assert_eq!(clicks.len(), 1);
    assert_eq!(clicks[0].owner_id, rect_id);
    assert_eq!(clicks[0].cursor, 0);
    assert_eq!(clicks[0].props.len(), 2);
    assert_eq!(clicks[0].ease, "easeOutQuad");
    assert_eq!(clicks[0].duration, 300.0);
}

/// it should wire loops as one synthetic window event per step
#[test]
fn loop_wiring() {
    let compiled = compile(&scene(), BuildOptions::lenient()).unwrap();
    let circle_id = compiled.document.root.children[2].id.clone();
    let lp = compiled.registry.loops.get("pulse").unwrap();
    assert!(lp.start);
    assert!(lp.status);
    assert!(!lp.started);
    assert_eq!(lp.index, 0);
    assert_eq!(lp.events.len(), 2);

    for event in &lp.events {
        assert!(event.starts_with("loop"));
        assert!(compiled.registry.dispatch.win.contains(event));
        let entries = compiled.registry.entries(event);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].owner_id, circle_id);
        assert_eq!(entries[0].props.len(), 1);
    }
}

/// it should resolve references inside registered property sets
#[test]
fn props_reference_resolution() {
    let desc = json!({"svg": {
        "defs": [{"linearGradient": {"id": "glow"}}],
        "children": [{"rect": {
            "events": [{"event": "paint", "target": "self", "duration": 10.0,
                        "prop": [{"fill": "url(#glow)"}]}]
        }}]
    }});
    let compiled = compile(&desc, BuildOptions::strict()).unwrap();
    let gradient_id = compiled.document.root.children[0].children[0].id.clone();
    let entry = &compiled.registry.entries("paint")[0];
    let fill = entry.props[0].get("fill").unwrap().as_str().unwrap();
    assert_eq!(fill, format!("url(#{gradient_id})"));
}

/// it should honor element targets declared by defs children
#[test]
fn defs_child_element_target() {
    let desc = json!({"svg": {
        "defs": [{"linearGradient": {"id": "g", "children": [
            {"stop": {"offset": 0, "events": [
                {"event": "hover", "target": "#hero", "duration": 50.0,
                 "prop": [{"stopOpacity": 0.1}]}
            ]}}
        ]}}],
        "children": [{"rect": {"id": "hero"}}]
    }});
    let compiled = compile(&desc, BuildOptions::strict()).unwrap();
    let stop_id = compiled.document.root.children[0].children[0].children[0].id.clone();
    let rect_id = compiled.document.root.children[1].id.clone();

    let binding = compiled
        .registry
        .dispatch
        .elm
        .iter()
        .find(|b| b.event == "hover")
        .unwrap();
    assert_eq!(binding.target, rect_id);

    let entries = compiled.registry.entries("hover");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].owner_id, stop_id);
}

/// it should drop element targets on scene-level nodes
#[test]
fn scene_element_target_dropped() {
    let desc = json!({"svg": {"children": [
        {"rect": {"id": "a", "events": [
            {"event": "poke", "target": "#b", "duration": 10.0, "prop": [{"width": 1}]}
        ]}},
        {"rect": {"id": "b"}}
    ]}});
    let compiled = compile(&desc, BuildOptions::strict()).unwrap();
    assert!(compiled.registry.dispatch.elm.is_empty());
    assert!(compiled.registry.entries("poke").is_empty());
    assert!(!compiled.registry.dispatch.win.iter().any(|e| e == "poke"));
}

/// it should drop unknown tags leniently and error strictly
#[test]
fn unknown_tag_policy() {
    let desc = json!({"svg": {"children": [{"marquee": {"width": 1}}, {"rect": {}}]}});
    let lenient = compile(&desc, BuildOptions::lenient()).unwrap();
    assert_eq!(lenient.document.root.children.len(), 1);
    assert_eq!(lenient.document.root.children[0].tag, "rect");

    let err = compile(&desc, BuildOptions::strict()).unwrap_err();
    assert!(matches!(err, SceneError::UnknownTag(tag) if tag == "marquee"));
}

/// it should reject an unknown root tag under either policy
#[test]
fn unknown_root() {
    let desc = json!({"video": {}});
    assert!(matches!(
        compile(&desc, BuildOptions::lenient()),
        Err(SceneError::UnknownTag(_))
    ));
    assert!(matches!(
        compile(&desc, BuildOptions::strict()),
        Err(SceneError::UnknownTag(_))
    ));
}

/// it should police unknown properties per policy
#[test]
fn unknown_property_policy() {
    let desc = json!({"svg": {"children": [{"rect": {"volume": 11, "width": 5}}]}});
    let lenient = compile(&desc, BuildOptions::lenient()).unwrap();
    let rect = &lenient.document.root.children[0];
    assert_eq!(rect.attrs.get("width").unwrap(), "5");
    assert!(!rect.attrs.contains_key("volume"));

    let err = compile(&desc, BuildOptions::strict()).unwrap_err();
    assert!(matches!(err, SceneError::UnknownProperty { prop, .. } if prop == "volume"));
}

/// it should reject malformed property values under either policy
#[test]
fn malformed_value_always_errors() {
    let bad_path = json!({"svg": {"children": [
        {"path": {"d": [{"bogus": {"x": 1}}]}}
    ]}});
    assert!(matches!(
        compile(&bad_path, BuildOptions::lenient()),
        Err(SceneError::InvalidValue { .. })
    ));
    assert!(matches!(
        compile(&bad_path, BuildOptions::strict()),
        Err(SceneError::InvalidValue { .. })
    ));

    let bad_transform = json!({"svg": {"children": [
        {"rect": {"transform": {"rotate": "sideways"}}}
    ]}});
    assert!(matches!(
        compile(&bad_transform, BuildOptions::lenient()),
        Err(SceneError::InvalidValue { .. })
    ));
    assert!(matches!(
        compile(&bad_transform, BuildOptions::strict()),
        Err(SceneError::InvalidValue { .. })
    ));
}

/// it should let the first duplicate id win leniently and error strictly
#[test]
fn duplicate_id_policy() {
    let desc = json!({"svg": {"children": [
        {"rect": {"id": "twin"}},
        {"circle": {"id": "twin"}},
        {"use": {"href": "#twin"}}
    ]}});
    let lenient = compile(&desc, BuildOptions::lenient()).unwrap();
    let rect_id = lenient.document.root.children[0].id.clone();
    let href = lenient.document.root.children[2].attrs.get("href").unwrap();
    assert_eq!(href, &format!("#{rect_id}"));

    assert!(matches!(
        compile(&desc, BuildOptions::strict()),
        Err(SceneError::DuplicateId(id)) if id == "twin"
    ));
}

/// it should filter gradient children down to stops
#[test]
fn gradient_child_policy() {
    let desc = json!({"svg": {"defs": [
        {"linearGradient": {"id": "g", "children": [
            {"rect": {"width": 1}},
            {"stop": {"offset": 0}}
        ]}}
    ]}});
    let lenient = compile(&desc, BuildOptions::lenient()).unwrap();
    let gradient = &lenient.document.root.children[0].children[0];
    assert_eq!(gradient.children.len(), 1);
    assert_eq!(gradient.children[0].tag, "stop");

    let err = compile(&desc, BuildOptions::strict()).unwrap_err();
    assert!(matches!(err, SceneError::UnknownDefChild { .. }));
}

/// it should build full scene nodes under open defs containers
#[test]
fn clip_path_holds_scene_nodes() {
    let desc = json!({"svg": {
        "defs": [{"clipPath": {"id": "cut", "children": [
            {"rect": {"width": 10, "height": 10}}
        ]}}],
        "children": [{"g": {"clipPath": "url(#cut)"}}]
    }});
    let compiled = compile(&desc, BuildOptions::strict()).unwrap();
    let clip = &compiled.document.root.children[0].children[0];
    assert!(clip.id.starts_with("clipPath-"));
    assert_eq!(clip.children[0].tag, "rect");
    assert_eq!(clip.children[0].attrs.get("width").unwrap(), "10");

    let group = &compiled.document.root.children[1];
    assert_eq!(group.attrs.get("clip-path").unwrap(), &format!("url(#{})", clip.id));
}

/// it should route innerHTML into the text body
#[test]
fn text_body() {
    let desc = json!({"svg": {"children": [
        {"text": {"x": 10, "y": 20, "innerHTML": "Hello"}}
    ]}});
    let compiled = compile(&desc, BuildOptions::strict()).unwrap();
    let text = &compiled.document.root.children[0];
    assert_eq!(text.text.as_deref(), Some("Hello"));
    assert_eq!(text.attrs.get("x").unwrap(), "10");
}

/// it should keep every generated id unique across the tree
#[test]
fn unique_ids() {
    fn walk(node: &Node, out: &mut Vec<String>) {
        out.push(node.id.clone());
        for child in &node.children {
            walk(child, out);
        }
    }
    let compiled = compile(&scene(), BuildOptions::lenient()).unwrap();
    let mut ids = Vec::new();
    walk(&compiled.document.root, &mut ids);
    let count = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), count);
}
