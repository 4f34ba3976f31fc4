//! The two-phase compiler.
//!
//! Phase one walks the description, validates tags against the rule tables,
//! assigns every surviving node its generated id, and records the authored
//! id to generated id mapping. Phase two builds the tree: properties are
//! serialized, `#reference` tokens are substituted from the mapping, and
//! events and loops are wired into the registry.
//!
//! Validation is policy-driven: strict surfaces unknown tags, properties
//! and bad values as errors; lenient drops the offending piece and keeps
//! going. Structural problems in the description itself (a non-string id,
//! a non-array `children`) are errors under either policy.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::BuildOptions;
use crate::descriptor::{EventBinding, EventTarget, LoopDeclaration, NodeDesc, PropSet};
use crate::document::{Document, Node};
use crate::error::SceneError;
use crate::ids::IdGen;
use crate::properties::{serialize_property, Applied};
use crate::registry::{DispatchBinding, LoopState, Registry, RegistryEntry};
use crate::rules::{self, DefChildRule};

/// Compilation output: the attributed tree and the wiring around it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledScene {
    pub document: Document,
    pub registry: Registry,
}

/// Compile a scene description.
pub fn compile(value: &Value, options: BuildOptions) -> Result<CompiledScene, SceneError> {
    let desc = NodeDesc::from_value(value)?;
    if rules::element_props(&desc.tag).is_none() {
        // The root must be buildable regardless of policy; there is no
        // scene to fall back to.
        return Err(SceneError::UnknownTag(desc.tag.clone()));
    }

    let mut ids = IdGen::new();
    let mut refs = HashMap::new();
    let planned = plan_known(&desc, options, &mut ids, &mut refs)?;

    let mut builder = Builder {
        options,
        ids,
        refs,
        registry: Registry::default(),
    };
    let root = builder.build_node(&planned)?;
    Ok(CompiledScene {
        document: Document::new(root),
        registry: builder.registry,
    })
}

struct Planned<'a> {
    desc: &'a NodeDesc,
    id: String,
    children: Vec<Planned<'a>>,
    defs: Vec<PlannedDef<'a>>,
}

struct PlannedDef<'a> {
    desc: &'a NodeDesc,
    id: String,
    children: Vec<PlannedDefChild<'a>>,
}

enum PlannedDefChild<'a> {
    /// A whitelisted child of a named-rule container; stays flat.
    Named {
        desc: &'a NodeDesc,
        id: String,
        props: &'static [&'static str],
    },
    /// A full scene node under an open container.
    Tree(Planned<'a>),
}

fn plan_node<'a>(
    desc: &'a NodeDesc,
    options: BuildOptions,
    ids: &mut IdGen,
    refs: &mut HashMap<String, String>,
) -> Result<Option<Planned<'a>>, SceneError> {
    if rules::element_props(&desc.tag).is_none() {
        if options.is_strict() {
            return Err(SceneError::UnknownTag(desc.tag.clone()));
        }
        return Ok(None);
    }
    plan_known(desc, options, ids, refs).map(Some)
}

fn plan_known<'a>(
    desc: &'a NodeDesc,
    options: BuildOptions,
    ids: &mut IdGen,
    refs: &mut HashMap<String, String>,
) -> Result<Planned<'a>, SceneError> {
    let id = ids.generate(&desc.tag, desc.id.as_deref());
    if let Some(author) = &desc.id {
        record_ref(refs, author, &id, options)?;
    }

    let mut defs = Vec::with_capacity(desc.defs.len());
    for def in &desc.defs {
        if let Some(planned) = plan_def(def, options, ids, refs)? {
            defs.push(planned);
        }
    }

    let mut children = Vec::with_capacity(desc.children.len());
    for child in &desc.children {
        if let Some(planned) = plan_node(child, options, ids, refs)? {
            children.push(planned);
        }
    }

    Ok(Planned {
        desc,
        id,
        children,
        defs,
    })
}

fn plan_def<'a>(
    desc: &'a NodeDesc,
    options: BuildOptions,
    ids: &mut IdGen,
    refs: &mut HashMap<String, String>,
) -> Result<Option<PlannedDef<'a>>, SceneError> {
    let Some(rule) = rules::def_children(&desc.tag) else {
        if options.is_strict() {
            return Err(SceneError::UnknownTag(desc.tag.clone()));
        }
        return Ok(None);
    };

    let id = ids.generate(&desc.tag, desc.id.as_deref());
    if let Some(author) = &desc.id {
        record_ref(refs, author, &id, options)?;
    }

    let mut children = Vec::with_capacity(desc.children.len());
    for child in &desc.children {
        match rule {
            DefChildRule::Any => {
                if let Some(planned) = plan_node(child, options, ids, refs)? {
                    children.push(PlannedDefChild::Tree(planned));
                }
            }
            DefChildRule::Named(_) => match rules::named_child_props(rule, &child.tag) {
                Some(props) => {
                    // Authored ids on named children are not referenceable.
                    let child_id = ids.generate(&child.tag, None);
                    children.push(PlannedDefChild::Named {
                        desc: child,
                        id: child_id,
                        props,
                    });
                }
                None => {
                    if options.is_strict() {
                        return Err(SceneError::UnknownDefChild {
                            def: desc.tag.clone(),
                            child: child.tag.clone(),
                        });
                    }
                }
            },
        }
    }

    Ok(Some(PlannedDef { desc, id, children }))
}

fn record_ref(
    refs: &mut HashMap<String, String>,
    author: &str,
    generated: &str,
    options: BuildOptions,
) -> Result<(), SceneError> {
    if refs.contains_key(author) {
        if options.is_strict() {
            return Err(SceneError::DuplicateId(author.to_string()));
        }
        // First declaration wins; later ones keep their generated id but
        // are not referenceable.
        return Ok(());
    }
    refs.insert(author.to_string(), generated.to_string());
    Ok(())
}

struct Builder {
    options: BuildOptions,
    ids: IdGen,
    refs: HashMap<String, String>,
    registry: Registry,
}

impl Builder {
    fn build_node(&mut self, planned: &Planned) -> Result<Node, SceneError> {
        let desc = planned.desc;
        let mut node = Node::new(desc.tag.clone(), planned.id.clone());
        let allowed = rules::element_props(&desc.tag).unwrap_or_default();
        self.apply_props(&mut node, &desc.props, allowed, &desc.tag)?;

        if !planned.defs.is_empty() {
            let defs_id = self.ids.generate("defs", None);
            let mut container = Node::new("defs", defs_id);
            for def in &planned.defs {
                container.children.push(self.build_def(def)?);
            }
            node.children.push(container);
        }

        for child in &planned.children {
            node.children.push(self.build_node(child)?);
        }

        if let Some(lp) = &desc.r#loop {
            self.wire_loop(lp, &planned.id);
        }
        self.wire_events(&desc.events, &planned.id, false);
        Ok(node)
    }

    fn build_def(&mut self, planned: &PlannedDef) -> Result<Node, SceneError> {
        let desc = planned.desc;
        let mut node = Node::new(desc.tag.clone(), planned.id.clone());
        let allowed = rules::def_props(&desc.tag).unwrap_or_default();
        self.apply_props(&mut node, &desc.props, allowed, &desc.tag)?;

        for child in &planned.children {
            match child {
                PlannedDefChild::Tree(tree) => node.children.push(self.build_node(tree)?),
                PlannedDefChild::Named { desc, id, props } => {
                    let mut built = Node::new(desc.tag.clone(), id.clone());
                    self.apply_props(&mut built, &desc.props, props, &desc.tag)?;
                    self.wire_events(&desc.events, id, true);
                    node.children.push(built);
                }
            }
        }
        Ok(node)
    }

    fn apply_props(
        &mut self,
        node: &mut Node,
        props: &[(String, Value)],
        allowed: &'static [&'static str],
        tag: &str,
    ) -> Result<(), SceneError> {
        for (key, value) in props {
            if !allowed.contains(&key.as_str()) {
                if self.options.is_strict() {
                    return Err(SceneError::UnknownProperty {
                        tag: tag.to_string(),
                        prop: key.clone(),
                    });
                }
                continue;
            }
            match serialize_property(key, value) {
                Ok(Some(Applied::Attr { name, value })) => {
                    let resolved = resolve_refs(&value, &self.refs);
                    node.attrs.insert(name.to_string(), resolved);
                }
                Ok(Some(Applied::Text(text))) => {
                    node.text = Some(resolve_refs(&text, &self.refs));
                }
                Ok(None) => {}
                // Unknown keys are a policy question; malformed values are
                // errors in both modes.
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Register a node's event bindings. Scene-level bindings only listen
    /// on the window or the node itself; element targets are honored for
    /// defs children alone.
    fn wire_events(&mut self, events: &[EventBinding], owner: &str, defs_child: bool) {
        for binding in events {
            let registered = match &binding.target {
                EventTarget::Window => {
                    self.registry.dispatch.push_win(&binding.event);
                    true
                }
                EventTarget::Owner => {
                    self.registry.dispatch.self_.push(DispatchBinding {
                        event: binding.event.clone(),
                        target: owner.to_string(),
                    });
                    true
                }
                EventTarget::Element(reference) => {
                    if defs_child {
                        let target = self.resolve_target(reference);
                        self.registry.dispatch.elm.push(DispatchBinding {
                            event: binding.event.clone(),
                            target,
                        });
                        true
                    } else {
                        false
                    }
                }
            };
            if registered {
                let props = binding.prop.iter().map(|set| self.resolve_props(set)).collect();
                self.registry.insert_event(
                    &binding.event,
                    RegistryEntry {
                        owner_id: owner.to_string(),
                        cursor: 0,
                        duration: binding.duration,
                        ease: binding.ease.clone(),
                        delay: binding.delay,
                        props,
                    },
                );
            }
        }
    }

    /// Register a loop: one synthetic window event per step, plus the run
    /// state under the loop's name. A redeclared name replaces the earlier
    /// loop.
    fn wire_loop(&mut self, lp: &LoopDeclaration, owner: &str) {
        let name = lp.name.clone().unwrap_or_else(|| self.ids.handle());
        let mut events = Vec::with_capacity(lp.children.len());
        for step in &lp.children {
            let loop_id = self.ids.loop_event();
            self.registry.dispatch.push_win(&loop_id);
            self.registry.insert_event(
                &loop_id,
                RegistryEntry {
                    owner_id: owner.to_string(),
                    cursor: 0,
                    duration: step.duration,
                    ease: step.ease.clone(),
                    delay: step.delay,
                    props: vec![self.resolve_props(&step.prop)],
                },
            );
            events.push(loop_id);
        }
        self.registry.loops.insert(
            name,
            LoopState {
                start: lp.start,
                status: true,
                started: false,
                events,
                index: 0,
            },
        );
    }

    fn resolve_target(&self, reference: &str) -> String {
        let bare = reference.strip_prefix('#').unwrap_or(reference);
        match self.refs.get(bare) {
            Some(generated) => generated.clone(),
            None => bare.to_string(),
        }
    }

    fn resolve_props(&self, set: &PropSet) -> PropSet {
        set.iter()
            .map(|(key, value)| (key.clone(), self.resolve_value(value)))
            .collect()
    }

    fn resolve_value(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(resolve_refs(s, &self.refs)),
            Value::Array(items) => {
                Value::Array(items.iter().map(|v| self.resolve_value(v)).collect())
            }
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.resolve_value(v)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

/// Substitute `#author` reference tokens with generated ids. A token is `#`
/// followed by the longest run of id characters; unmapped tokens pass
/// through untouched.
fn resolve_refs(text: &str, refs: &HashMap<String, String>) -> String {
    if refs.is_empty() || !text.contains('#') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('#') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let end = after
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
            .map(|(i, _)| i)
            .unwrap_or(after.len());
        let token = &after[..end];
        out.push('#');
        match refs.get(token) {
            Some(generated) if !token.is_empty() => out.push_str(generated),
            _ => out.push_str(token),
        }
        rest = &after[end..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(a, b)| ((*a).to_string(), (*b).to_string()))
            .collect()
    }

    /// it should substitute whole-value and embedded references
    #[test]
    fn reference_tokens() {
        let map = refs(&[("hero", "rect-ab12-hero")]);
        assert_eq!(resolve_refs("#hero", &map), "#rect-ab12-hero");
        assert_eq!(resolve_refs("url(#hero)", &map), "url(#rect-ab12-hero)");
        assert_eq!(resolve_refs("url(#other)", &map), "url(#other)");
    }

    /// it should munch the longest id run before substituting
    #[test]
    fn longest_token_wins() {
        let map = refs(&[("a", "x"), ("a-b", "rect-1")]);
        assert_eq!(resolve_refs("#a-b", &map), "#rect-1");
        assert_eq!(resolve_refs("#a)", &map), "#x)");
    }

    /// it should leave bare and trailing hashes alone
    #[test]
    fn stray_hashes() {
        let map = refs(&[("hero", "g-1")]);
        assert_eq!(resolve_refs("#", &map), "#");
        assert_eq!(resolve_refs("a # b #hero", &map), "a # b #g-1");
    }
}
