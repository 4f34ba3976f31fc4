//! Per-property interpolation tracks.
//!
//! A task snapshots each animated attribute when it spawns and compiles the
//! snapshot together with the target value into a track. Rendering a track
//! at an elapsed time yields the serialized attribute string to write back.
//! The begin side never drifts: every frame eases from the same spawn
//! snapshot, including path data.

use limn_api_core::color::{self, Rgb};
use limn_api_core::matrix::{Decomposed, Matrix};
use limn_api_core::number::split_unit;
use limn_api_core::path::{self, PathSegment};
use limn_api_core::transform;
use serde_json::Value;

use crate::easing::Easing;
use crate::error::AnimError;

/// Tweened slots on one path segment: `(slot, begin, end)` triples into the
/// segment's parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPatch {
    pub index: usize,
    pub tweens: Vec<(usize, f64, f64)>,
}

/// One animated `transform` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformTween {
    /// Plain clause: every argument eases independently. `begin` is padded
    /// or truncated to the target arity at build time.
    Args {
        name: String,
        begin: Vec<f64>,
        end: Vec<f64>,
    },
    /// `matrix(...)` eases component-wise through its decomposition and
    /// recomposes on render.
    Matrix { begin: Decomposed, end: Decomposed },
}

/// Clause tweens in target order. The rendered attribute contains exactly
/// these clauses; anything else in the original `transform` is dropped.
pub type TransformTrack = Vec<TransformTween>;

/// Compiled interpolation state for one attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum PropTrack {
    /// Unit-suffixed or bare numeric attribute. A bare snapshot renders a
    /// bare number; a suffixed snapshot renders the eased value with the
    /// target's suffix.
    Scalar {
        begin: f64,
        end: f64,
        begin_bare: bool,
        end_suffix: String,
    },
    /// Hex color, eased per channel with clamping.
    Color { begin: Rgb, end: Rgb },
    Transform(TransformTrack),
    /// Path data: the full snapshot plus the patches tweened inside it.
    Path {
        segments: Vec<PathSegment>,
        patches: Vec<PathPatch>,
    },
}

impl PropTrack {
    /// Compile one animated property. `current` is the attribute value at
    /// spawn (`None` when the element carries no such attribute), `target`
    /// the value from the property set.
    pub fn build(key: &str, current: Option<&str>, target: &Value) -> Result<Self, AnimError> {
        match key {
            "transform" => build_transform(current, target),
            "d" => build_path(key, current, target),
            _ => build_plain(key, current, target),
        }
    }

    /// Replace the end side from a new target, keeping the spawn snapshot
    /// as the begin side. Depend functions re-derive targets on viewport
    /// changes; the track keeps easing from where the animation started.
    pub fn retarget(&mut self, key: &str, target: &Value) -> Result<(), AnimError> {
        match self {
            PropTrack::Scalar {
                end, end_suffix, ..
            } => {
                let raw = plain_target(key, target)?;
                let unit = split_unit(&raw).map_err(|source| AnimError::Track {
                    prop: key.to_string(),
                    source,
                })?;
                *end = unit.value;
                *end_suffix = unit.suffix;
            }
            PropTrack::Color { end, .. } => {
                let raw = plain_target(key, target)?;
                *end = Rgb::parse(&raw).map_err(|source| AnimError::Track {
                    prop: key.to_string(),
                    source,
                })?;
            }
            PropTrack::Transform(clauses) => {
                *clauses = retarget_transform(clauses, target)?;
            }
            PropTrack::Path { segments, patches } => {
                *patches = build_patches(segments, key, target)?;
            }
        }
        Ok(())
    }

    /// Serialize the track at elapsed time `t` of duration `d`.
    pub fn render(&self, easing: Easing, t: f64, d: f64) -> String {
        match self {
            PropTrack::Scalar {
                begin,
                end,
                begin_bare,
                end_suffix,
            } => {
                let value = easing.apply(t, *begin, end - begin, d);
                if *begin_bare {
                    value.to_string()
                } else {
                    format!("{value}{end_suffix}")
                }
            }
            PropTrack::Color { begin, end } => {
                let ch = |b: u8, e: u8| easing.apply(t, f64::from(b), f64::from(e) - f64::from(b), d);
                Rgb::from_eased(
                    ch(begin.r, end.r),
                    ch(begin.g, end.g),
                    ch(begin.b, end.b),
                )
                .to_hex()
            }
            PropTrack::Transform(clauses) => {
                let mut out = String::new();
                for clause in clauses {
                    if !out.is_empty() {
                        out.push(' ');
                    }
                    match clause {
                        TransformTween::Args { name, begin, end } => {
                            out.push_str(name);
                            out.push('(');
                            for (i, (b, e)) in begin.iter().zip(end).enumerate() {
                                if i > 0 {
                                    out.push(',');
                                }
                                out.push_str(&easing.apply(t, *b, e - b, d).to_string());
                            }
                            out.push(')');
                        }
                        TransformTween::Matrix { begin, end } => {
                            let lerp = |b: f64, e: f64| easing.apply(t, b, e - b, d);
                            let eased = Decomposed {
                                translate: [
                                    lerp(begin.translate[0], end.translate[0]),
                                    lerp(begin.translate[1], end.translate[1]),
                                ],
                                scale: [
                                    lerp(begin.scale[0], end.scale[0]),
                                    lerp(begin.scale[1], end.scale[1]),
                                ],
                                skew_x: lerp(begin.skew_x, end.skew_x),
                                skew_y: lerp(begin.skew_y, end.skew_y),
                                rotate: lerp(begin.rotate, end.rotate),
                            };
                            out.push_str(&eased.to_matrix().to_string());
                        }
                    }
                }
                out
            }
            PropTrack::Path { segments, patches } => {
                let mut eased = segments.clone();
                for patch in patches {
                    if let Some(seg) = eased.get_mut(patch.index) {
                        for (slot, begin, end) in &patch.tweens {
                            if let Some(param) = seg.params.get_mut(*slot) {
                                *param = easing.apply(t, *begin, end - begin, d);
                            }
                        }
                    }
                }
                path::encode(&eased)
            }
        }
    }
}

/// Target values for plain attributes come in as JSON strings or numbers.
fn plain_target(key: &str, target: &Value) -> Result<String, AnimError> {
    match target {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(AnimError::BadTarget {
            prop: key.to_string(),
        }),
    }
}

fn build_plain(key: &str, current: Option<&str>, target: &Value) -> Result<PropTrack, AnimError> {
    // A missing attribute animates from zero.
    let snapshot = current.unwrap_or("0");
    let raw = plain_target(key, target)?;
    if color::is_hex(snapshot) {
        let begin = Rgb::parse(snapshot).map_err(|source| AnimError::Track {
            prop: key.to_string(),
            source,
        })?;
        let end = Rgb::parse(&raw).map_err(|source| AnimError::Track {
            prop: key.to_string(),
            source,
        })?;
        Ok(PropTrack::Color { begin, end })
    } else {
        let begin = split_unit(snapshot).map_err(|source| AnimError::Track {
            prop: key.to_string(),
            source,
        })?;
        let end = split_unit(&raw).map_err(|source| AnimError::Track {
            prop: key.to_string(),
            source,
        })?;
        Ok(PropTrack::Scalar {
            begin: begin.value,
            end: end.value,
            begin_bare: begin.suffix.is_empty(),
            end_suffix: end.suffix,
        })
    }
}

/// Clause argument list from a target value: a number is a one-arg clause,
/// an array of numbers an n-arg clause.
fn clause_args(value: &Value) -> Option<Vec<f64>> {
    match value {
        Value::Number(n) => n.as_f64().map(|v| vec![v]),
        Value::Array(items) => items.iter().map(Value::as_f64).collect(),
        _ => None,
    }
}

fn matrix_end(value: &Value) -> Result<Decomposed, AnimError> {
    let args = clause_args(value).ok_or_else(|| AnimError::BadTarget {
        prop: "transform".to_string(),
    })?;
    let matrix = Matrix::from_args(&args).map_err(|source| AnimError::Track {
        prop: "transform".to_string(),
        source,
    })?;
    Ok(matrix.decompose())
}

fn build_transform(current: Option<&str>, target: &Value) -> Result<PropTrack, AnimError> {
    let clauses = target.as_object().ok_or_else(|| AnimError::BadTarget {
        prop: "transform".to_string(),
    })?;
    let existing = match current {
        Some(s) if !s.trim().is_empty() => {
            transform::decode(s).map_err(|source| AnimError::Track {
                prop: "transform".to_string(),
                source,
            })?
        }
        _ => Vec::new(),
    };

    let mut track = TransformTrack::with_capacity(clauses.len());
    for (name, value) in clauses {
        if name == "matrix" {
            let end = matrix_end(value)?;
            // A clause absent from the snapshot starts at identity.
            let begin = match existing.iter().find(|f| f.name == *name) {
                Some(f) => Matrix::from_args(&f.args)
                    .map_err(|source| AnimError::Track {
                        prop: "transform".to_string(),
                        source,
                    })?
                    .decompose(),
                None => Matrix::identity().decompose(),
            };
            track.push(TransformTween::Matrix { begin, end });
        } else {
            let end = clause_args(value).ok_or_else(|| AnimError::BadTarget {
                prop: format!("transform.{name}"),
            })?;
            let mut begin = existing
                .iter()
                .find(|f| f.name == *name)
                .map(|f| f.args.clone())
                .unwrap_or_default();
            // Clauses absent from the snapshot start at zero.
            begin.resize(end.len(), 0.0);
            track.push(TransformTween::Args {
                name: name.clone(),
                begin,
                end,
            });
        }
    }
    Ok(PropTrack::Transform(track))
}

fn retarget_transform(current: &TransformTrack, target: &Value) -> Result<TransformTrack, AnimError> {
    let clauses = target.as_object().ok_or_else(|| AnimError::BadTarget {
        prop: "transform".to_string(),
    })?;
    let mut next = TransformTrack::with_capacity(clauses.len());
    for (name, value) in clauses {
        if name == "matrix" {
            let end = matrix_end(value)?;
            let begin = current
                .iter()
                .find_map(|c| match c {
                    TransformTween::Matrix { begin, .. } => Some(*begin),
                    _ => None,
                })
                .unwrap_or_else(|| Matrix::identity().decompose());
            next.push(TransformTween::Matrix { begin, end });
        } else {
            let end = clause_args(value).ok_or_else(|| AnimError::BadTarget {
                prop: format!("transform.{name}"),
            })?;
            let mut begin = current
                .iter()
                .find_map(|c| match c {
                    TransformTween::Args { name: n, begin, .. } if n == name => {
                        Some(begin.clone())
                    }
                    _ => None,
                })
                .unwrap_or_default();
            begin.resize(end.len(), 0.0);
            next.push(TransformTween::Args {
                name: name.clone(),
                begin,
                end,
            });
        }
    }
    Ok(next)
}

fn build_patches(
    segments: &[PathSegment],
    key: &str,
    target: &Value,
) -> Result<Vec<PathPatch>, AnimError> {
    let list = target.as_array().ok_or_else(|| AnimError::BadTarget {
        prop: key.to_string(),
    })?;
    let mut patches = Vec::with_capacity(list.len());
    for raw in list {
        let obj = raw.as_object().ok_or_else(|| AnimError::BadTarget {
            prop: key.to_string(),
        })?;
        let index = obj
            .get("index")
            .and_then(Value::as_u64)
            .ok_or_else(|| AnimError::BadTarget {
                prop: key.to_string(),
            })? as usize;
        let seg = segments.get(index).ok_or(AnimError::PatchIndex(index))?;
        let names = path::params_for(seg.cmd).ok_or_else(|| AnimError::BadTarget {
            prop: key.to_string(),
        })?;
        let values = obj
            .get("value")
            .and_then(Value::as_object)
            .ok_or_else(|| AnimError::BadTarget {
                prop: key.to_string(),
            })?;
        let mut tweens = Vec::with_capacity(values.len());
        for (pname, pval) in values {
            let slot = names
                .iter()
                .position(|n| n == pname)
                .ok_or_else(|| AnimError::BadTarget {
                    prop: format!("{key}[{index}].{pname}"),
                })?;
            let end = pval.as_f64().ok_or_else(|| AnimError::BadTarget {
                prop: format!("{key}[{index}].{pname}"),
            })?;
            let begin = seg
                .params
                .get(slot)
                .copied()
                .ok_or(AnimError::PatchIndex(index))?;
            tweens.push((slot, begin, end));
        }
        patches.push(PathPatch { index, tweens });
    }
    Ok(patches)
}

fn build_path(key: &str, current: Option<&str>, target: &Value) -> Result<PropTrack, AnimError> {
    let raw = current.ok_or_else(|| AnimError::MissingAttr {
        prop: key.to_string(),
    })?;
    let segments = path::decode(raw).map_err(|source| AnimError::Track {
        prop: key.to_string(),
        source,
    })?;
    let patches = build_patches(&segments, key, target)?;
    Ok(PropTrack::Path { segments, patches })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    /// it should ease a suffixed scalar and keep the target's suffix
    #[test]
    fn scalar_keeps_target_suffix() {
        let track = PropTrack::build("width", Some("10px"), &json!("30px")).unwrap();
        assert_eq!(track.render(Easing::Linear, 50.0, 100.0), "20px");
        assert_eq!(track.render(Easing::Linear, 100.0, 100.0), "30px");
    }

    /// it should render a bare number when the snapshot had no suffix
    #[test]
    fn scalar_bare_snapshot_renders_bare() {
        let track = PropTrack::build("x", Some("0"), &json!("100%")).unwrap();
        assert_eq!(track.render(Easing::Linear, 25.0, 100.0), "25");
    }

    /// it should animate a missing attribute from zero
    #[test]
    fn missing_attribute_starts_at_zero() {
        let track = PropTrack::build("y", None, &json!(80)).unwrap();
        assert_eq!(track.render(Easing::Linear, 50.0, 100.0), "40");
    }

    /// it should ease hex colors per channel
    #[test]
    fn color_eases_per_channel() {
        let track = PropTrack::build("fill", Some("#000000"), &json!("#ff0000")).unwrap();
        assert_eq!(track.render(Easing::Linear, 50.0, 100.0), "#7f0000");
        assert_eq!(track.render(Easing::Linear, 100.0, 100.0), "#ff0000");
    }

    /// it should expand three-digit snapshots before easing
    #[test]
    fn color_expands_short_hex() {
        let track = PropTrack::build("stroke", Some("#fff"), &json!("#000")).unwrap();
        assert_eq!(track.render(Easing::Linear, 0.0, 100.0), "#ffffff");
    }

    /// it should reject a color target over a missing attribute
    #[test]
    fn color_target_needs_a_snapshot() {
        let err = PropTrack::build("fill", None, &json!("#ff0000")).unwrap_err();
        assert!(matches!(err, AnimError::Track { .. }), "got {err:?}");
    }

    /// it should render exactly the targeted transform clauses
    #[test]
    fn transform_renders_target_clauses() {
        let track = PropTrack::build(
            "transform",
            Some("rotate(0) skewX(10)"),
            &json!({ "rotate": 90, "translate": [0, 40] }),
        )
        .unwrap();
        assert_eq!(
            track.render(Easing::Linear, 50.0, 100.0),
            "rotate(45) translate(0,20)"
        );
    }

    /// it should start missing clauses at zero
    #[test]
    fn transform_missing_clause_starts_at_zero() {
        let track = PropTrack::build("transform", None, &json!({ "translate": [10, 10] })).unwrap();
        assert_eq!(track.render(Easing::Linear, 0.0, 100.0), "translate(0,0)");
    }

    /// it should ease matrix clauses through their decomposition
    #[test]
    fn matrix_eases_decomposed() {
        let track = PropTrack::build(
            "transform",
            Some("matrix(1, 0, 0, 1, 0, 0)"),
            &json!({ "matrix": [2, 0, 0, 2, 10, 0] }),
        )
        .unwrap();
        let mid = track.render(Easing::Linear, 50.0, 100.0);
        assert!(mid.starts_with("matrix("), "got {mid}");
        let m = Matrix::parse(&mid).unwrap();
        assert_relative_eq!(m.a, 1.5, epsilon = 1e-9);
        assert_relative_eq!(m.b, 0.0, epsilon = 1e-9);
        assert_relative_eq!(m.c, 0.0, epsilon = 1e-9);
        assert_relative_eq!(m.d, 1.5, epsilon = 1e-9);
        assert_relative_eq!(m.tx, 5.0, epsilon = 1e-9);
        assert_relative_eq!(m.ty, 0.0, epsilon = 1e-9);
    }

    /// it should tween named path parameters against a stable snapshot
    #[test]
    fn path_patches_named_params() {
        let target = json!([ { "index": 1, "value": { "x": 30, "y": 50 } } ]);
        let track = PropTrack::build("d", Some("M0,0 L10,10"), &target).unwrap();
        assert_eq!(track.render(Easing::Linear, 50.0, 100.0), "M0,0 L20,30");
        // The snapshot does not drift between renders.
        assert_eq!(track.render(Easing::Linear, 50.0, 100.0), "M0,0 L20,30");
    }

    /// it should reject a patch index past the end of the path
    #[test]
    fn path_patch_index_out_of_range() {
        let target = json!([ { "index": 9, "value": { "x": 1 } } ]);
        let err = PropTrack::build("d", Some("M0,0"), &target).unwrap_err();
        assert!(matches!(err, AnimError::PatchIndex(9)));
    }

    /// it should refuse to animate path data that is not there
    #[test]
    fn path_needs_an_attribute() {
        let err = PropTrack::build("d", None, &json!([])).unwrap_err();
        assert!(matches!(err, AnimError::MissingAttr { .. }));
    }

    /// it should swap end values on retarget and keep begins
    #[test]
    fn retarget_keeps_begin_side() {
        let mut track = PropTrack::build("width", Some("10"), &json!(30)).unwrap();
        track.retarget("width", &json!(110)).unwrap();
        assert_eq!(track.render(Easing::Linear, 50.0, 100.0), "60");
    }

    /// it should rebuild path patches from the pristine snapshot on retarget
    #[test]
    fn retarget_path_from_snapshot() {
        let target = json!([ { "index": 0, "value": { "x": 10 } } ]);
        let mut track = PropTrack::build("d", Some("M0,0"), &target).unwrap();
        track
            .retarget("d", &json!([ { "index": 0, "value": { "y": 8 } } ]))
            .unwrap();
        assert_eq!(track.render(Easing::Linear, 50.0, 100.0), "M0,4");
    }
}
