//! Per-tag property whitelists.
//!
//! The builder only applies properties named here; anything else on a node
//! description is rejected (strict) or skipped (lenient). Defs containers
//! carry their own tables, and each def tag additionally constrains which
//! child tags it accepts.

/// Properties accepted on regular scene elements, by tag.
pub fn element_props(tag: &str) -> Option<&'static [&'static str]> {
    Some(match tag {
        "svg" => &[
            "clipPath",
            "mask",
            "filter",
            "dataId",
            "dataClass",
            "width",
            "height",
            "x",
            "y",
            "viewbox",
            "viewport",
            "opacity",
        ],
        "g" => &[
            "clipPath",
            "mask",
            "filter",
            "dataId",
            "dataClass",
            "width",
            "height",
            "transform",
            "stroke",
            "strokeWidth",
            "strokeOpacity",
            "strokeDasharray",
            "opacity",
        ],
        "rect" => &[
            "clipPath",
            "mask",
            "filter",
            "dataId",
            "dataClass",
            "width",
            "height",
            "x",
            "y",
            "rx",
            "ry",
            "fill",
            "fillOpacity",
            "fillRule",
            "opacity",
            "transform",
            "stroke",
            "strokeWidth",
            "strokeOpacity",
            "strokeDasharray",
        ],
        "circle" => &[
            "clipPath",
            "mask",
            "filter",
            "dataId",
            "dataClass",
            "cx",
            "cy",
            "r",
            "fill",
            "fillOpacity",
            "fillRule",
            "opacity",
            "transform",
            "stroke",
            "strokeWidth",
            "strokeOpacity",
            "strokeDasharray",
        ],
        "ellipse" => &[
            "clipPath",
            "mask",
            "filter",
            "dataId",
            "dataClass",
            "cx",
            "cy",
            "rx",
            "ry",
            "fill",
            "fillOpacity",
            "fillRule",
            "opacity",
            "transform",
            "stroke",
            "strokeWidth",
            "strokeOpacity",
            "strokeDasharray",
        ],
        // "marker-end" (kebab) is the accepted key here, unlike the other
        // marker-capable tags.
        "line" => &[
            "clipPath",
            "mask",
            "filter",
            "dataId",
            "dataClass",
            "x1",
            "x2",
            "y1",
            "y2",
            "opacity",
            "transform",
            "stroke",
            "strokeWidth",
            "strokeOpacity",
            "strokeDasharray",
            "markerStart",
            "markerMid",
            "marker-end",
        ],
        "polyline" => &[
            "clipPath",
            "mask",
            "filter",
            "dataId",
            "dataClass",
            "points",
            "opacity",
            "transform",
            "stroke",
            "strokeWidth",
            "strokeOpacity",
            "strokeDasharray",
            "fill",
            "fillOpacity",
            "fillRule",
            "markerStart",
            "markerMid",
            "markerEnd",
        ],
        "polygon" => &[
            "clipPath",
            "mask",
            "filter",
            "dataId",
            "dataClass",
            "points",
            "opacity",
            "transform",
            "stroke",
            "strokeWidth",
            "strokeOpacity",
            "strokeDasharray",
            "markerStart",
            "markerMid",
            "markerEnd",
        ],
        "text" => &[
            "clipPath",
            "mask",
            "filter",
            "dataId",
            "dataClass",
            "innerHTML",
            "x",
            "y",
            "anchor",
            "fontFamily",
            "textLength",
            "lengthAdjust",
            "fontSize",
            "fill",
            "fillOpacity",
            "fillRule",
            "opacity",
            "transform",
            "stroke",
            "strokeWidth",
            "strokeOpacity",
            "strokeDasharray",
        ],
        "image" => &[
            "clipPath",
            "mask",
            "filter",
            "dataId",
            "dataClass",
            "width",
            "height",
            "x",
            "y",
            "src",
            "transform",
            "stroke",
            "strokeWidth",
            "strokeOpacity",
            "strokeDasharray",
        ],
        "a" => &["clipPath", "mask", "filter", "dataId", "dataClass", "href", "target"],
        "use" => &[
            "clipPath",
            "mask",
            "filter",
            "dataId",
            "dataClass",
            "href",
            "x",
            "y",
            "fill",
            "fillOpacity",
            "fillRule",
            "opacity",
            "stroke",
            "strokeWidth",
            "strokeOpacity",
            "strokeDasharray",
        ],
        "path" => &[
            "clipPath",
            "mask",
            "filter",
            "dataId",
            "dataClass",
            "d",
            "fill",
            "fillOpacity",
            "fillRule",
            "opacity",
            "stroke",
            "strokeWidth",
            "strokeOpacity",
            "strokeDasharray",
        ],
        _ => return None,
    })
}

/// Properties accepted on defs containers, by tag. The `id` entries are
/// inert (reserved keys are split off before the whitelist is consulted).
pub fn def_props(tag: &str) -> Option<&'static [&'static str]> {
    Some(match tag {
        "linearGradient" => &[
            "dataId",
            "dataClass",
            "id",
            "x1",
            "x2",
            "y1",
            "y2",
            "spreadMethod",
            "gradientTransform",
            "gradientUnits",
        ],
        "radialGradient" => &[
            "dataId",
            "dataClass",
            "id",
            "cx",
            "cy",
            "fx",
            "fy",
            "r",
            "spreadMethod",
            "gradientTransform",
            "gradientUnits",
        ],
        "pattern" => &[
            "dataId",
            "dataClass",
            "id",
            "x",
            "y",
            "width",
            "height",
            "patternUnits",
            "patternTransform",
        ],
        "clipPath" => &["dataId", "dataClass", "id"],
        "mask" => &["dataId", "dataClass", "id", "x", "y", "width", "height"],
        "filter" => &["dataId", "dataClass", "id", "x", "y", "width", "height"],
        _ => return None,
    })
}

/// Which child tags a defs container accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefChildRule {
    /// Children are ordinary scene nodes, built through the regular path.
    Any,
    /// Only the named tags, each with its own property whitelist.
    Named(&'static [(&'static str, &'static [&'static str])]),
}

const STOP_PROPS: &[&str] = &["dataId", "dataClass", "offset", "stopColor", "stopOpacity"];

const FILTER_CHILDREN: &[(&str, &[&str])] = &[
    ("feGaussianBlur", &["dataId", "dataClass", "in", "stdDeviation", "result"]),
    ("feOffset", &["dataId", "dataClass", "in", "dx", "dy", "result"]),
    ("feColorMatrix", &["dataId", "dataClass", "in", "type", "values", "result"]),
    ("feBlend", &["dataId", "dataClass", "in", "in2"]),
    ("feMerge", &["dataId", "dataClass", "in"]),
];

pub fn def_children(def_tag: &str) -> Option<DefChildRule> {
    Some(match def_tag {
        "linearGradient" | "radialGradient" => DefChildRule::Named(&[("stop", STOP_PROPS)]),
        "pattern" | "clipPath" | "mask" => DefChildRule::Any,
        "filter" => DefChildRule::Named(FILTER_CHILDREN),
        _ => return None,
    })
}

/// Lookup inside a [`DefChildRule::Named`] table.
pub fn named_child_props(rule: DefChildRule, tag: &str) -> Option<&'static [&'static str]> {
    match rule {
        DefChildRule::Any => None,
        DefChildRule::Named(table) => table
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, props)| *props),
    }
}
