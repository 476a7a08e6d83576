//! Retained render tree helpers
//!
//! The applicator never talks to a browser. It mutates a retained tree of
//! `markup5ever_rcdom` nodes: reference-counted handles with `RefCell` children and weak parent
//! links, the same structure html5ever builds when parsing. Anything that can hold classes,
//! attributes and ordered children can stand in for the host's visual tree, and the tree can
//! always be serialized back to HTML for inspection.
//!
//! All helpers are total: asking a text node for its classes returns an empty list, setting an
//! attribute on a non-element is a no-op.

use crate::error::BackdropError;
use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute, LocalName,
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Create an HTML element with attributes
pub fn element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
pub fn text(contents: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(contents.to_string().into()),
        },
    })
}

/// Tag name of an element, `None` for other node kinds.
pub fn tag_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(|w| w.upgrade());
    node.parent.set(weak);
    parent
}

/// Append `child` as the last child of `parent`, detaching it from any previous parent.
pub fn append(parent: &Handle, child: Handle) {
    detach(&child);
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Insert `child` as the first child of `parent`, detaching it from any previous parent.
pub fn prepend(parent: &Handle, child: Handle) {
    detach(&child);
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().insert(0, child);
}

/// Remove `node` from its parent. No-op for detached nodes.
pub fn detach(node: &Handle) {
    if let Some(parent) = parent(node) {
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, node));
    }
    node.parent.set(None);
}

/// A node is connected when its topmost ancestor is a document node.
pub fn is_connected(node: &Handle) -> bool {
    let mut current = node.clone();
    while let Some(up) = parent(&current) {
        current = up;
    }
    matches!(current.data, NodeData::Document)
}

pub fn attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

pub fn set_attr(node: &Handle, name: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs = attrs.borrow_mut();
        if let Some(existing) = attrs.iter_mut().find(|a| &*a.name.local == name) {
            existing.value = value.to_string().into();
        } else {
            attrs.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(name)),
                value: value.to_string().into(),
            });
        }
    }
}

pub fn remove_attr(node: &Handle, name: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        attrs.borrow_mut().retain(|a| &*a.name.local != name);
    }
}

/// Class list in attribute order.
pub fn classes(node: &Handle) -> Vec<String> {
    attr(node, "class")
        .map(|raw| raw.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn has_class(node: &Handle, class: &str) -> bool {
    classes(node).iter().any(|c| c == class)
}

pub fn add_class(node: &Handle, class: &str) {
    let mut list = classes(node);
    if !list.iter().any(|c| c == class) {
        list.push(class.to_string());
        write_classes(node, &list);
    }
}

pub fn remove_class(node: &Handle, class: &str) {
    remove_classes(node, [class]);
}

/// Remove every listed class; drops the attribute once the list is empty.
pub fn remove_classes<I, S>(node: &Handle, to_remove: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let to_remove: Vec<S> = to_remove.into_iter().collect();
    let list = classes(node);
    let kept: Vec<String> = list
        .iter()
        .filter(|c| !to_remove.iter().any(|r| r.as_ref() == c.as_str()))
        .cloned()
        .collect();
    if kept.len() != list.len() {
        write_classes(node, &kept);
    }
}

fn write_classes(node: &Handle, list: &[String]) {
    if list.is_empty() {
        remove_attr(node, "class");
    } else {
        set_attr(node, "class", &list.join(" "));
    }
}

/// Replace the whole inline style with the given declarations, in order.
pub fn set_style(node: &Handle, declarations: &[(&str, String)]) {
    let style = declarations
        .iter()
        .map(|(property, value)| format!("{property}: {value};"))
        .collect::<Vec<_>>()
        .join(" ");
    set_attr(node, "style", &style);
}

/// Read one declaration back from the inline style.
pub fn style_property(node: &Handle, property: &str) -> Option<String> {
    let style = attr(node, "style")?;
    split_declarations(&style).into_iter().find_map(|decl| {
        let (name, value) = decl.split_once(':')?;
        (name.trim() == property).then(|| value.trim().to_string())
    })
}

/// Split on `;` outside quotes and parentheses.
fn split_declarations(style: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (idx, ch) in style.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, ch) {
            (Some(_), '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&style[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&style[start..]);
    parts.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

/// Element children only.
pub fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| matches!(child.data, NodeData::Element { .. }))
        .cloned()
        .collect()
}

pub fn find_child_with_class(node: &Handle, class: &str) -> Option<Handle> {
    node.children
        .borrow()
        .iter()
        .find(|child| has_class(child, class))
        .cloned()
}

/// Pre-order traversal of `node` and everything below it.
pub fn descendants(node: &Handle) -> Vec<Handle> {
    let mut out = Vec::new();
    let mut stack = vec![node.clone()];
    while let Some(current) = stack.pop() {
        for child in current.children.borrow().iter().rev() {
            stack.push(child.clone());
        }
        out.push(current);
    }
    out
}

/// Concatenated text below `node`.
pub fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    for n in descendants(node) {
        if let NodeData::Text { contents } = &n.data {
            out.push_str(&contents.borrow());
        }
    }
    out
}

/// Serialize `node` (including itself) to HTML.
pub fn to_html(node: &Handle) -> Result<String, BackdropError> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    let serializable = SerializableHandle::from(node.clone());
    serialize(&mut output, &serializable, opts)
        .map_err(|e| BackdropError::Render(format!("HTML serialization failed: {e}")))?;

    String::from_utf8(output)
        .map_err(|e| BackdropError::Render(format!("UTF-8 conversion failed: {e}")))
}
