//! Host page: document snapshot, event registry, and per-image load ledger.
//!
//! The page is the single-threaded "browser side" the script runs against.
//! It owns everything the script can observe: the DOM, the listener set, the
//! console, and each image's load outcome. Events are delivered one at a
//! time and handlers run to completion; there is no preemption and nothing
//! to lock.

use crate::console::Console;
use crate::dom::Document;
use crate::dom::NodeId;
use crate::events::EventKind;
use crate::events::EventRegistry;
use crate::events::Handler;
use std::collections::HashMap;
use std::rc::Rc;

/// Load outcome of one image, owned by the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
  /// No outcome recorded yet.
  #[default]
  Pending,
  /// The resource loaded; the element's `complete` flag reads true.
  Complete,
  /// The resource failed to fetch or decode.
  Failed,
}

/// One page view: state vanishes when the page is dropped.
pub struct Page {
  pub document: Document,
  pub events: EventRegistry,
  load_states: HashMap<NodeId, LoadState>,
  console: Rc<dyn Console>,
  ready_fired: bool,
}

impl Page {
  pub fn new(document: Document, console: Rc<dyn Console>) -> Page {
    Page {
      document,
      events: EventRegistry::new(),
      load_states: HashMap::new(),
      console,
      ready_fired: false,
    }
  }

  /// Write one line to the page's console.
  pub fn log(&self, line: &str) {
    self.console.log(line);
  }

  /// Bind a handler on the document-ready event.
  pub fn on_ready(&mut self, handler: Handler) {
    let root = self.document.root();
    self.events.bind(root, EventKind::Ready, handler);
  }

  /// Fire the ready event. Runs at most once per page view.
  pub fn ready(&mut self) {
    if self.ready_fired {
      return;
    }
    self.ready_fired = true;
    let root = self.document.root();
    self.dispatch(root, EventKind::Ready);
  }

  /// The element's `complete` flag as the environment reports it right now.
  ///
  /// Whether this reads true or false at ready-time depends on caching and
  /// timing; the diagnostic scan logs whatever value is current.
  pub fn is_complete(&self, node: NodeId) -> bool {
    self.load_state(node) == LoadState::Complete
  }

  pub fn load_state(&self, node: NodeId) -> LoadState {
    self.load_states.get(&node).copied().unwrap_or_default()
  }

  /// Record a successful load and deliver the node's load event.
  pub fn complete_image(&mut self, node: NodeId) {
    self.load_states.insert(node, LoadState::Complete);
    self.dispatch(node, EventKind::Load);
  }

  /// Record a failed load and deliver the node's load-error event.
  ///
  /// Delivering to a node whose listeners were already removed is a no-op,
  /// which is what makes a failing placeholder a terminal state rather than
  /// a cascade.
  pub fn fail_image(&mut self, node: NodeId) {
    self.load_states.insert(node, LoadState::Failed);
    self.dispatch(node, EventKind::Error);
  }

  /// Deliver one event: handlers run in bind order, to completion.
  ///
  /// The listener list is snapshotted first and each id is re-checked before
  /// its handler runs, so listeners removed mid-event are skipped.
  pub fn dispatch(&mut self, node: NodeId, kind: EventKind) {
    let snapshot = self.events.snapshot(node, kind);
    for (id, handler) in snapshot {
      if !self.events.is_bound(node, kind, id) {
        continue;
      }
      handler(self, node);
    }
  }
}
