//! The compiled node tree.
//!
//! A [`Document`] is what compilation produces: a tree of attributed nodes
//! with generated ids. Queries and writes are attribute-level and id-keyed;
//! the animation layer drives the tree exclusively through this surface.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One element: generated id, tag, attributes in application order, optional
/// text body, children in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub tag: String,
    #[serde(default)]
    pub attrs: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: impl Into<String>, id: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            tag: tag.into(),
            attrs: IndexMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    fn remove_child(&mut self, id: &str) -> bool {
        if let Some(pos) = self.children.iter().position(|c| c.id == id) {
            self.children.remove(pos);
            return true;
        }
        self.children.iter_mut().any(|c| c.remove_child(id))
    }

    fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        out.push_str(" id=\"");
        escape_into(out, &self.id);
        out.push('"');
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_into(out, value);
            out.push('"');
        }
        if self.text.is_none() && self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            escape_into(out, text);
        }
        for child in &self.children {
            child.write_into(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn escape_into(out: &mut String, s: &str) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// A data-id / data-class query result: the element's generated id plus the
/// requested attributes (`None` where the element lacks one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementInfo {
    pub id: String,
    pub attrs: IndexMap<String, Option<String>>,
}

/// The compiled tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub root: Node,
}

impl Document {
    pub fn new(root: Node) -> Self {
        Document { root }
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.root.find(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.root.find_mut(id)
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn attr(&self, id: &str, name: &str) -> Option<&str> {
        self.get(id)?.attrs.get(name).map(String::as_str)
    }

    /// Write one attribute. Returns false when the element is gone.
    pub fn set_attr(&mut self, id: &str, name: &str, value: &str) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.attrs.insert(name.to_string(), value.to_string());
                true
            }
            None => false,
        }
    }

    /// Raw attribute writes, no property rules applied.
    pub fn set_attrs(&mut self, id: &str, attrs: &[(&str, &str)]) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                for (name, value) in attrs {
                    node.attrs.insert((*name).to_string(), (*value).to_string());
                }
                true
            }
            None => false,
        }
    }

    /// Detach an element and its subtree. The root is not removable.
    pub fn remove(&mut self, id: &str) -> bool {
        self.root.remove_child(id)
    }

    /// First element whose `data-id` matches, with the requested attributes.
    pub fn info_by_data_id(&self, data_id: &str, properties: &[&str]) -> Option<ElementInfo> {
        let mut found = None;
        preorder(&self.root, &mut |node| {
            if found.is_none() && node.attrs.get("data-id").map(String::as_str) == Some(data_id) {
                found = Some(info_of(node, properties));
            }
        });
        found
    }

    /// Every element whose `data-class` matches, in document order.
    pub fn info_by_data_class(&self, class: &str, properties: &[&str]) -> Vec<ElementInfo> {
        let mut found = Vec::new();
        preorder(&self.root, &mut |node| {
            if node.attrs.get("data-class").map(String::as_str) == Some(class) {
                found.push(info_of(node, properties));
            }
        });
        found
    }

    /// Render the tree as SVG text.
    pub fn write_svg(&self) -> String {
        let mut out = String::new();
        self.root.write_into(&mut out);
        out
    }
}

fn preorder(node: &Node, visit: &mut impl FnMut(&Node)) {
    visit(node);
    for child in &node.children {
        preorder(child, visit);
    }
}

fn info_of(node: &Node, properties: &[&str]) -> ElementInfo {
    let attrs = properties
        .iter()
        .map(|p| ((*p).to_string(), node.attrs.get(*p).cloned()))
        .collect();
    ElementInfo {
        id: node.id.clone(),
        attrs,
    }
}
