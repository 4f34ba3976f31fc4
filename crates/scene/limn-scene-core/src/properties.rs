//! Property serialization.
//!
//! Descriptions speak in camelCase property names with typed values; the
//! document speaks in SVG attributes. [`serialize_property`] maps one to the
//! other: most keys are a straight rename, a few (`viewbox`, `viewport`,
//! `transform`, `d`) assemble structured values into attribute text, and
//! `innerHTML` lands in the node body instead of an attribute.

use serde_json::Value;

use limn_api_core::path::{self, command_letter, params_for, PathSegment};

use crate::error::SceneError;

/// Where a serialized property lands on the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Attr { name: &'static str, value: String },
    Text(String),
}

impl Applied {
    fn attr(name: &'static str, value: String) -> Option<Self> {
        Some(Applied::Attr { name, value })
    }
}

/// Serialize one property. `Ok(None)` means the property produced nothing
/// (unknown key, or a structured value missing its required fields).
pub fn serialize_property(key: &str, value: &Value) -> Result<Option<Applied>, SceneError> {
    let attr = |name: &'static str| -> Result<Option<Applied>, SceneError> {
        Ok(Applied::attr(name, scalar_text(key, value)?))
    };

    match key {
        "dataId" => attr("data-id"),
        "dataClass" => attr("data-class"),
        "width" => attr("width"),
        "height" => attr("height"),
        "x" => attr("x"),
        "y" => attr("y"),
        "x1" => attr("x1"),
        "y1" => attr("y1"),
        "x2" => attr("x2"),
        "y2" => attr("y2"),
        "rx" => attr("rx"),
        "ry" => attr("ry"),
        "cx" => attr("cx"),
        "cy" => attr("cy"),
        "fx" => attr("fx"),
        "fy" => attr("fy"),
        "dx" => attr("dx"),
        "dy" => attr("dy"),
        "r" => attr("r"),
        "points" => attr("points"),
        "fill" => attr("fill"),
        "fillOpacity" => attr("fill-opacity"),
        "fillRule" => attr("fill-rule"),
        "opacity" => attr("opacity"),
        "viewbox" => viewbox(key, value),
        "viewport" => viewport(key, value),
        "stroke" => attr("stroke"),
        "strokeWidth" => attr("stroke-width"),
        "strokeOpacity" => attr("stroke-opacity"),
        "strokeDasharray" => attr("stroke-dasharray"),
        // Gradient and pattern transforms write the plain transform
        // attribute, same as elements.
        "transform" | "gradientTransform" | "patternTransform" => {
            Ok(Applied::attr("transform", transform_text(key, value)?))
        }
        "markerStart" => attr("marker-start"),
        "markerMid" => attr("marker-mid"),
        "markerEnd" | "marker-end" => attr("marker-end"),
        "innerHTML" => Ok(Some(Applied::Text(scalar_text(key, value)?))),
        "anchor" => attr("text-anchor"),
        "fontFamily" => attr("font-family"),
        "fontSize" => attr("font-size"),
        "textLength" => attr("textLength"),
        "lengthAdjust" => attr("lengthAdjust"),
        "src" => attr("xlink:href"),
        "href" => attr("href"),
        "target" => attr("target"),
        "d" => Ok(Applied::attr("d", path_text(key, value)?)),
        "gradientUnits" => attr("gradientUnits"),
        "patternUnits" => attr("patternUnits"),
        "spreadMethod" => attr("spreadMethod"),
        "offset" => attr("offset"),
        "stopColor" => attr("stop-color"),
        "stopOpacity" => attr("stop-opacity"),
        "in" => attr("in"),
        "in2" => attr("in2"),
        "stdDeviation" => attr("stdDeviation"),
        "result" => attr("result"),
        "values" => attr("values"),
        "type" => attr("type"),
        "filter" => attr("filter"),
        "flag" => attr("flag"),
        "mask" => attr("mask"),
        "clipPath" => attr("clip-path"),
        _ => Ok(None),
    }
}

/// Attribute text for a scalar value. Structured values are only legal for
/// the keys that assemble them.
fn scalar_text(key: &str, value: &Value) -> Result<String, SceneError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(number_text(n)),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(SceneError::InvalidValue { prop: key.to_string() }),
    }
}

fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// `{x, y, width, height}` to `viewBox="x y w h"`. Anything short of all
/// four fields is skipped.
fn viewbox(key: &str, value: &Value) -> Result<Option<Applied>, SceneError> {
    let Value::Object(map) = value else {
        return Err(SceneError::InvalidValue { prop: key.to_string() });
    };
    let fields = ["x", "y", "width", "height"]
        .iter()
        .map(|f| map.get(*f))
        .collect::<Option<Vec<_>>>();
    match fields {
        Some(fields) => {
            let parts = fields
                .into_iter()
                .map(|v| scalar_text(key, v))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Applied::attr("viewBox", parts.join(" ")))
        }
        None => Ok(None),
    }
}

/// `{x: left|middle|right, y: ..., type: meet|slice|none}` to
/// `preserveAspectRatio`. Unrecognized keywords contribute nothing; an empty
/// alignment skips the attribute entirely.
fn viewport(key: &str, value: &Value) -> Result<Option<Applied>, SceneError> {
    let Value::Object(map) = value else {
        return Err(SceneError::InvalidValue { prop: key.to_string() });
    };
    let mut aspect = String::new();
    if let Some(Value::String(x)) = map.get("x") {
        match x.as_str() {
            "left" => aspect.push_str("xMin"),
            "middle" => aspect.push_str("xMid"),
            "right" => aspect.push_str("xMax"),
            _ => {}
        }
    }
    if let Some(Value::String(y)) = map.get("y") {
        match y.as_str() {
            "left" => aspect.push_str("YMin"),
            "middle" => aspect.push_str("YMid"),
            "right" => aspect.push_str("YMax"),
            _ => {}
        }
    }
    if aspect.is_empty() {
        return Ok(None);
    }
    if let Some(Value::String(t)) = map.get("type") {
        match t.as_str() {
            "meet" => aspect.push_str(" meet"),
            "slice" => aspect.push_str(" slice"),
            "none" => aspect.push_str(" none"),
            _ => {}
        }
    }
    Ok(Applied::attr("preserveAspectRatio", aspect))
}

/// Transform map to attribute text: scalar clauses render `name(v)`, array
/// clauses `name(a,b,c)`, joined with spaces in declaration order.
fn transform_text(key: &str, value: &Value) -> Result<String, SceneError> {
    let Value::Object(map) = value else {
        return Err(SceneError::InvalidValue { prop: key.to_string() });
    };
    let mut clauses = Vec::with_capacity(map.len());
    for (name, args) in map {
        match args {
            Value::Number(n) => clauses.push(format!("{name}({})", number_text(n))),
            Value::Array(items) => {
                let parts = items
                    .iter()
                    .map(|v| scalar_text(key, v))
                    .collect::<Result<Vec<_>, _>>()?;
                clauses.push(format!("{name}({})", parts.join(",")));
            }
            _ => return Err(SceneError::InvalidValue { prop: key.to_string() }),
        }
    }
    Ok(clauses.join(" "))
}

/// Path segment list to attribute text. Segments are maps with a single
/// command key (long name or single letter) whose value names each
/// parameter; parameters are matched up positionally before encoding.
fn path_text(key: &str, value: &Value) -> Result<String, SceneError> {
    let Value::Array(segments) = value else {
        return Err(SceneError::InvalidValue { prop: key.to_string() });
    };
    let mut decoded = Vec::with_capacity(segments.len());
    for segment in segments {
        let Value::Object(map) = segment else {
            return Err(SceneError::InvalidValue { prop: key.to_string() });
        };
        let Some((name, body)) = map.iter().next() else {
            return Err(SceneError::InvalidValue { prop: key.to_string() });
        };
        let cmd = if name.chars().count() > 1 {
            command_letter(name).ok_or_else(|| SceneError::InvalidValue { prop: key.to_string() })?
        } else {
            name.chars().next().unwrap_or_default()
        };
        let names = params_for(cmd).ok_or_else(|| SceneError::InvalidValue { prop: key.to_string() })?;
        let mut params = Vec::with_capacity(names.len());
        for param in names {
            let v = body
                .as_object()
                .and_then(|m| m.get(*param))
                .and_then(Value::as_f64)
                .ok_or_else(|| SceneError::InvalidValue { prop: key.to_string() })?;
            params.push(v);
        }
        decoded.push(PathSegment::new(cmd, params)?);
    }
    Ok(path::encode(&decoded))
}
