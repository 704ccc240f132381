//! Single-threaded event model.
//!
//! Listeners are stored per (node, event kind) with stable ids. Dispatch
//! (on [`crate::page::Page`]) snapshots the listener list and re-checks each
//! id before invoking it, so a handler that unbinds its own element mid-event
//! finishes its current invocation and never runs again. There is no
//! delegation: a listener covers exactly the node it was bound to.

use crate::dom::NodeId;
use crate::page::Page;
use std::collections::HashMap;
use std::rc::Rc;

/// Event kinds the host delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
  /// Document parsed; delivered once to the document root.
  Ready,
  /// An image resource finished loading.
  Load,
  /// An image resource failed to fetch or decode.
  Error,
}

/// Stable identifier of one bound listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Callback invoked with the page and the event's target node.
pub type Handler = Rc<dyn Fn(&mut Page, NodeId)>;

/// Per-(node, kind) listener lists.
#[derive(Default)]
pub struct EventRegistry {
  next_listener: u64,
  listeners: HashMap<(NodeId, EventKind), Vec<(ListenerId, Handler)>>,
}

impl EventRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Bind a handler; listeners fire in bind order.
  pub fn bind(&mut self, node: NodeId, kind: EventKind, handler: Handler) -> ListenerId {
    self.next_listener += 1;
    let id = ListenerId(self.next_listener);
    self
      .listeners
      .entry((node, kind))
      .or_default()
      .push((id, handler));
    id
  }

  /// Remove every listener bound to `node`, across all event kinds.
  pub fn unbind_all(&mut self, node: NodeId) {
    self.listeners.retain(|(target, _), _| *target != node);
  }

  /// Number of listeners currently bound to `node`, across all event kinds.
  pub fn listener_count(&self, node: NodeId) -> usize {
    self
      .listeners
      .iter()
      .filter(|((target, _), _)| *target == node)
      .map(|(_, list)| list.len())
      .sum()
  }

  pub(crate) fn is_bound(&self, node: NodeId, kind: EventKind, id: ListenerId) -> bool {
    self
      .listeners
      .get(&(node, kind))
      .is_some_and(|list| list.iter().any(|(bound, _)| *bound == id))
  }

  pub(crate) fn snapshot(&self, node: NodeId, kind: EventKind) -> Vec<(ListenerId, Handler)> {
    self.listeners.get(&(node, kind)).cloned().unwrap_or_default()
  }
}
