//! Generated element identifiers.
//!
//! Every compiled node gets `<tag>-<rand4>`, or `<tag>-<rand4>-<authorId>`
//! when the description supplied its own id. Generated ids stay unique for
//! the lifetime of the compiled document.

use std::collections::HashSet;

use uuid::Uuid;

#[derive(Debug, Default)]
pub struct IdGen {
    issued: HashSet<String>,
}

impl IdGen {
    pub fn new() -> Self {
        Self::default()
    }

    fn rand4() -> String {
        Uuid::new_v4().simple().to_string()[..4].to_string()
    }

    /// Issue a fresh element id. Collisions in the four-char random space
    /// re-draw until unique.
    pub fn generate(&mut self, tag: &str, author: Option<&str>) -> String {
        loop {
            let rand = Self::rand4();
            let id = match author {
                Some(a) => format!("{tag}-{rand}-{a}"),
                None => format!("{tag}-{rand}"),
            };
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Synthetic event ids for loop steps: `loop<rand4>`.
    pub fn loop_event(&mut self) -> String {
        loop {
            let id = format!("loop{}", Self::rand4());
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Bare four-char handle (defaulted loop names, animation ids).
    pub fn handle(&mut self) -> String {
        loop {
            let id = Self::rand4();
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}
