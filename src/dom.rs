//! Static DOM snapshot of the host page.
//!
//! The document is parsed once with html5ever and converted into an
//! id-addressed node arena. Nodes are never created or destroyed afterwards;
//! the only mutations the crate performs are attribute writes (`src`, inline
//! `style`). Ids stay valid for the life of the [`Document`], which makes
//! them safe to hand to event listeners.

use crate::error::ParseError;
use crate::error::Result;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::Handle;
use markup5ever_rcdom::NodeData;
use markup5ever_rcdom::RcDom;
use std::path::Path;
use url::Url;

/// Stable identifier of a node within a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Payload of a single DOM node.
#[derive(Debug, Clone)]
pub enum DomNodeKind {
  Document,
  Element {
    tag_name: String,
    attributes: Vec<(String, String)>,
  },
  Text {
    content: String,
  },
}

/// One node in the arena: payload plus tree links.
#[derive(Debug, Clone)]
pub struct DomNode {
  pub kind: DomNodeKind,
  pub parent: Option<NodeId>,
  pub children: Vec<NodeId>,
}

impl DomNode {
  pub fn is_element(&self) -> bool {
    matches!(self.kind, DomNodeKind::Element { .. })
  }

  pub fn tag_name(&self) -> Option<&str> {
    match &self.kind {
      DomNodeKind::Element { tag_name, .. } => Some(tag_name),
      _ => None,
    }
  }
}

/// A parsed page held as a flat node arena rooted at node 0.
#[derive(Debug, Clone)]
pub struct Document {
  nodes: Vec<DomNode>,
}

impl Document {
  /// Parse an HTML string into a document snapshot.
  ///
  /// html5ever recovers from malformed markup the way browsers do, so the
  /// only inputs rejected outright are empty/whitespace-only strings.
  pub fn parse_html(html: &str) -> Result<Document> {
    if html.trim().is_empty() {
      return Err(ParseError::EmptyDocument.into());
    }

    let opts = ParseOpts {
      tree_builder: TreeBuilderOpts {
        scripting_enabled: false,
        ..Default::default()
      },
      ..Default::default()
    };
    let rcdom = parse_document(RcDom::default(), opts)
      .from_utf8()
      .read_from(&mut html.as_bytes())?;

    let mut nodes = Vec::new();
    nodes.push(DomNode {
      kind: DomNodeKind::Document,
      parent: None,
      children: Vec::new(),
    });
    convert_children(&mut nodes, &rcdom.document, NodeId(0));

    if nodes.len() == 1 {
      return Err(
        ParseError::InvalidHtml {
          message: "document has no content".to_string(),
        }
        .into(),
      );
    }

    Ok(Document { nodes })
  }

  pub fn root(&self) -> NodeId {
    NodeId(0)
  }

  pub fn node(&self, id: NodeId) -> &DomNode {
    &self.nodes[id.0]
  }

  pub fn tag_name(&self, id: NodeId) -> Option<&str> {
    self.node(id).tag_name()
  }

  /// Attribute lookup by case-insensitive name.
  pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
    match &self.node(id).kind {
      DomNodeKind::Element { attributes, .. } => attributes
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str()),
      _ => None,
    }
  }

  /// Replace or insert an attribute. No-op on non-element nodes.
  pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
    if let DomNodeKind::Element { attributes, .. } = &mut self.nodes[id.0].kind {
      if let Some(entry) = attributes.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        entry.1 = value.to_string();
      } else {
        attributes.push((name.to_string(), value.to_string()));
      }
    }
  }

  /// Check if this element carries a specific class.
  pub fn has_class(&self, id: NodeId, class: &str) -> bool {
    self
      .get_attribute(id, "class")
      .is_some_and(|attr| attr.split_ascii_whitespace().any(|c| c == class))
  }

  /// Hide an element by forcing `display: none` in its inline style.
  ///
  /// The node stays in the tree; other inline declarations are preserved.
  pub fn hide(&mut self, id: NodeId) {
    let mut declarations: Vec<String> = self
      .get_attribute(id, "style")
      .map(|style| {
        style
          .split(';')
          .map(str::trim)
          .filter(|decl| !decl.is_empty())
          .filter(|decl| !declaration_is_display(decl))
          .map(str::to_string)
          .collect()
      })
      .unwrap_or_default();
    declarations.push("display: none".to_string());
    self.set_attribute(id, "style", &declarations.join("; "));
  }

  /// True when the element's inline style sets `display: none`.
  pub fn is_hidden(&self, id: NodeId) -> bool {
    self.get_attribute(id, "style").is_some_and(|style| {
      style.split(';').map(str::trim).any(|decl| {
        declaration_is_display(decl)
          && decl
            .split(':')
            .nth(1)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("none"))
      })
    })
  }

  /// Element ids carrying `class`, in DOM (pre-order) order.
  pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
    self.collect_elements(|doc, id| doc.has_class(id, class))
  }

  /// Element ids with the given tag name, in DOM (pre-order) order.
  pub fn elements_with_tag(&self, tag: &str) -> Vec<NodeId> {
    self.collect_elements(|doc, id| {
      doc
        .tag_name(id)
        .is_some_and(|name| name.eq_ignore_ascii_case(tag))
    })
  }

  fn collect_elements<F>(&self, matches: F) -> Vec<NodeId>
  where
    F: Fn(&Document, NodeId) -> bool,
  {
    let mut out = Vec::new();
    let mut stack = vec![self.root()];
    while let Some(id) = stack.pop() {
      if self.node(id).is_element() && matches(self, id) {
        out.push(id);
      }
      for &child in self.node(id).children.iter().rev() {
        stack.push(child);
      }
    }
    out
  }
}

fn declaration_is_display(decl: &str) -> bool {
  decl
    .split(':')
    .next()
    .is_some_and(|prop| prop.trim().eq_ignore_ascii_case("display"))
}

fn convert_children(nodes: &mut Vec<DomNode>, handle: &Handle, parent: NodeId) {
  for child in handle.children.borrow().iter() {
    match &child.data {
      NodeData::Element { name, attrs, .. } => {
        let attributes = attrs
          .borrow()
          .iter()
          .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
          .collect();
        let id = push_node(
          nodes,
          DomNodeKind::Element {
            tag_name: name.local.to_string(),
            attributes,
          },
          parent,
        );
        convert_children(nodes, child, id);
      }
      NodeData::Text { contents } => {
        push_node(
          nodes,
          DomNodeKind::Text {
            content: contents.borrow().to_string(),
          },
          parent,
        );
      }
      // Comments, doctypes, and processing instructions carry no script-visible state.
      _ => {}
    }
  }
}

fn push_node(nodes: &mut Vec<DomNode>, kind: DomNodeKind, parent: NodeId) -> NodeId {
  let id = NodeId(nodes.len());
  nodes.push(DomNode {
    kind,
    parent: Some(parent),
    children: Vec::new(),
  });
  nodes[parent.0].children.push(id);
  id
}

/// Join a reference URL against a base, normalizing directory file:// bases.
pub fn resolve_against_base(base: &str, reference: &str) -> Option<String> {
  let mut base_candidate = base.to_string();
  if base_candidate.starts_with("file://") {
    let path = &base_candidate["file://".len()..];
    if Path::new(path).is_dir() && !base_candidate.ends_with('/') {
      base_candidate.push('/');
    }
  }

  let base_url = Url::parse(&base_candidate)
    .or_else(|_| {
      Url::from_file_path(&base_candidate).map_err(|()| url::ParseError::RelativeUrlWithoutBase)
    })
    .ok()?;

  base_url.join(reference).ok().map(|u| u.to_string())
}
