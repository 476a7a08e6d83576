//! Markdown rendering pipeline
//!
//! Stands in for the host's document renderer. Top-level Markdown blocks become elements in a
//! fresh view container; fenced code blocks whose info string names the backdrop fence become
//! empty render targets and are handed back as [`PendingBlock`]s, in document order, for the
//! coordinator to process.
//!
//! # Library Choice
//!
//! `comrak` does the Markdown parsing; only the top level of its AST is walked. Every emitted
//! element carries `data-line` (the 1-based source line) so a layout can place it.

use crate::dom;
use crate::host::workspace::CONTAINER_CLASS;
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use markup5ever_rcdom::Handle;

/// A backdrop block found while rendering, waiting for the coordinator
#[derive(Debug, Clone)]
pub struct PendingBlock {
    /// Raw block text between the fences
    pub text: String,
    /// Empty element the block renders into
    pub target: Handle,
    /// 1-based line of the opening fence
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub container: Handle,
    pub blocks: Vec<PendingBlock>,
}

/// Render `source` into a new view container.
pub fn render_markdown(source: &str, fence: &str) -> RenderedDocument {
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = parse_document(&arena, source, &options);

    let container = dom::element("div", vec![("class", CONTAINER_CLASS)]);
    let mut blocks = Vec::new();

    for node in root.children() {
        let data = node.data.borrow();
        let line = data.sourcepos.start.line;
        let line_attr = line.to_string();

        let element = match &data.value {
            NodeValue::Heading(heading) => {
                let tag = format!("h{}", heading.level.min(6));
                with_text(&tag, &line_attr, &collect_text(node))
            }
            NodeValue::Paragraph => with_text("p", &line_attr, &collect_text(node)),
            NodeValue::CodeBlock(code_block) if is_fence(&code_block.info, fence) => {
                let class = format!("block-language-{fence}");
                let target = dom::element(
                    "div",
                    vec![("class", class.as_str()), ("data-line", line_attr.as_str())],
                );
                blocks.push(PendingBlock {
                    text: code_block.literal.clone(),
                    target: target.clone(),
                    line,
                });
                target
            }
            NodeValue::CodeBlock(code_block) => {
                let pre = dom::element("pre", vec![("data-line", line_attr.as_str())]);
                let code = dom::element("code", vec![]);
                dom::append(&code, dom::text(&code_block.literal));
                dom::append(&pre, code);
                pre
            }
            NodeValue::List(list) => {
                let tag = match list.list_type {
                    ListType::Ordered => "ol",
                    ListType::Bullet => "ul",
                };
                let list_el = dom::element(tag, vec![("data-line", line_attr.as_str())]);
                for item in node.children() {
                    dom::append(&list_el, with_text("li", "", &collect_text(item)));
                }
                list_el
            }
            NodeValue::ThematicBreak => dom::element("hr", vec![("data-line", line_attr.as_str())]),
            _ => with_text("div", &line_attr, &collect_text(node)),
        };
        dom::append(&container, element);
    }

    log::debug!("rendered document with {} backdrop blocks", blocks.len());
    RenderedDocument { container, blocks }
}

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.front_matter_delimiter = Some("---".to_string());
    options
}

fn is_fence(info: &str, fence: &str) -> bool {
    info.split_whitespace().next() == Some(fence)
}

fn with_text(tag: &str, line: &str, contents: &str) -> Handle {
    let attrs = if line.is_empty() {
        vec![]
    } else {
        vec![("data-line", line)]
    };
    let element = dom::element(tag, attrs);
    if !contents.is_empty() {
        dom::append(&element, dom::text(contents));
    }
    element
}

/// Plain text of a node, with breaks folded to spaces.
fn collect_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut output = String::new();
    collect_text_into(node, &mut output);
    output.trim().to_string()
}

fn collect_text_into<'a>(node: &'a AstNode<'a>, output: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => output.push_str(text),
        NodeValue::Code(code) => output.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => output.push(' '),
        NodeValue::Paragraph if !output.is_empty() => {
            output.push(' ');
            for child in node.children() {
                collect_text_into(child, output);
            }
        }
        _ => {
            for child in node.children() {
                collect_text_into(child, output);
            }
        }
    }
}
