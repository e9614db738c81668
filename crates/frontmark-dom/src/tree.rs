//! Display tree access.
//!
//! The upgrader needs three operations from the tree it runs over: find
//! elements by class, read their text, and replace their outer markup.
//! [`HtmlTree`] provides them over an html5ever DOM.

use std::rc::Rc;

use html5ever::tendril::TendrilSink;
use html5ever::{
    parse_document, serialize, serialize::SerializeOpts, serialize::TraversalScope, ParseOpts,
};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// Errors that can occur when working with a display tree.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("Node is not attached to the tree")]
    Detached,

    #[error("HTML serialization failed: {0}")]
    Serialize(#[from] std::io::Error),

    #[error("Serialized HTML is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A mutable tree of rendered HTML.
pub trait DisplayTree {
    /// Handle to a node of this tree.
    type Node;

    /// All elements carrying `class`, in document order.
    fn query_class(&self, class: &str) -> Vec<Self::Node>;

    /// Concatenated text of `node` and its descendants.
    fn text_content(&self, node: &Self::Node) -> String;

    /// Replace `node`, including its own tag, with the nodes parsed from `markup`.
    fn replace_outer_html(&mut self, node: &Self::Node, markup: &str) -> Result<(), TreeError>;
}

/// An HTML document parsed with html5ever.
///
/// The tree is `Rc` based and stays on the thread that built it.
pub struct HtmlTree {
    // Owns the nodes `body` points into.
    _dom: RcDom,
    body: Handle,
}

impl HtmlTree {
    /// Parse an HTML document or fragment.
    ///
    /// Fragments end up in the body of the implied document.
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
        let body = find_element(&dom.document, "body").unwrap_or_else(|| dom.document.clone());

        Self { _dom: dom, body }
    }

    /// Serialize the body content back to HTML.
    pub fn to_html(&self) -> Result<String, TreeError> {
        let mut output = Vec::new();

        let opts = SerializeOpts {
            traversal_scope: TraversalScope::ChildrenOnly(None),
            ..Default::default()
        };

        let serializable = SerializableHandle::from(self.body.clone());
        serialize(&mut output, &serializable, opts)?;

        Ok(String::from_utf8(output)?)
    }
}

impl DisplayTree for HtmlTree {
    type Node = Handle;

    fn query_class(&self, class: &str) -> Vec<Handle> {
        let mut found = Vec::new();
        collect_by_class(&self.body, class, &mut found);
        found
    }

    fn text_content(&self, node: &Handle) -> String {
        let mut text = String::new();
        collect_text(node, &mut text);
        text
    }

    fn replace_outer_html(&mut self, node: &Handle, markup: &str) -> Result<(), TreeError> {
        let weak = node.parent.take().ok_or(TreeError::Detached)?;
        let Some(parent) = weak.upgrade() else {
            return Err(TreeError::Detached);
        };

        let mut siblings = parent.children.borrow_mut();
        let Some(index) = siblings.iter().position(|child| Rc::ptr_eq(child, node)) else {
            node.parent.set(Some(weak));
            return Err(TreeError::Detached);
        };

        let replacement = parse_fragment_nodes(markup);
        for new_node in &replacement {
            new_node.parent.set(Some(Rc::downgrade(&parent)));
        }
        siblings.splice(index..=index, replacement);

        Ok(())
    }
}

/// Parse `markup` and detach the resulting body children.
fn parse_fragment_nodes(markup: &str) -> Vec<Handle> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(markup);

    match find_element(&dom.document, "body") {
        Some(body) => body.children.take(),
        None => Vec::new(),
    }
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { ref name, .. } = handle.data {
        if &*name.local == tag {
            return Some(handle.clone());
        }
    }

    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

fn has_class(handle: &Handle, class: &str) -> bool {
    match handle.data {
        NodeData::Element { ref attrs, .. } => attrs.borrow().iter().any(|attr| {
            &*attr.name.local == "class" && attr.value.split_whitespace().any(|c| c == class)
        }),
        _ => false,
    }
}

fn collect_by_class(handle: &Handle, class: &str, found: &mut Vec<Handle>) {
    for child in handle.children.borrow().iter() {
        if has_class(child, class) {
            found.push(child.clone());
        }
        collect_by_class(child, class, found);
    }
}

fn collect_text(handle: &Handle, text: &mut String) {
    if let NodeData::Text { ref contents } = handle.data {
        text.push_str(&contents.borrow());
    }

    for child in handle.children.borrow().iter() {
        collect_text(child, text);
    }
}
