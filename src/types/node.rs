use serde::{Deserialize, Serialize};

use super::is_false;

/// Host-independent renderable tree.
///
/// The card renderer produces this structure instead of touching a rendering
/// host directly; an adapter (the browser DOM one, or a test walking the
/// tree) materializes it. Text nodes serialize as bare strings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Node {
    Text(String),
    Element(ElementNode),
}

impl Node {
    /// Shorthand for a bare text node.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    #[must_use]
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Self::Element(e) => Some(e),
            Self::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
        match self {
            Self::Element(e) => Some(e),
            Self::Text(_) => None,
        }
    }
}

impl From<ElementNode> for Node {
    fn from(e: ElementNode) -> Self {
        Self::Element(e)
    }
}

/// An element in the renderable tree: tag, classes, attributes, children.
///
/// `hidden` is the only field mutated after rendering (the search filter
/// toggles it); everything else is write-once.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
}

impl ElementNode {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Append a class (builder style).
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Append an attribute (builder style).
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Append a child node (builder style).
    #[must_use]
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a text child (builder style).
    #[must_use]
    pub fn text(mut self, s: impl Into<String>) -> Self {
        self.children.push(Node::Text(s.into()));
        self
    }

    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// The space-joined class attribute value.
    #[must_use]
    pub fn class_attr(&self) -> String {
        self.classes.join(" ")
    }

    /// Set or replace an attribute in place.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name.to_string(), value));
        }
    }

    #[must_use]
    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated text of all descendant text nodes, in document order.
    #[must_use]
    pub fn visible_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }
}
