//! The thumbnail fallback initializer.
//!
//! Reproduces the page script's observable behavior. Once the document is
//! ready, every element carrying the thumbnail class gets a one-shot
//! load-error handler, and each element's `complete` flag is logged in DOM
//! order. On error the handler hides the element, unbinds every listener on
//! it (itself included), then swaps `src` to the placeholder asset.
//!
//! Only elements present at ready-time are covered; nothing is delegated to
//! elements inserted later. Elements without the class are never touched.

use crate::dom::NodeId;
use crate::events::EventKind;
use crate::events::Handler;
use crate::page::Page;
use std::rc::Rc;

/// CSS class selecting the images this script covers.
pub const THUMBNAIL_CLASS: &str = "thumbnail";

/// Fallback asset substituted when a thumbnail fails to load.
pub const PLACEHOLDER_SRC: &str = "/static/youtube/missing.png";

/// Register the initializer on the page's ready event.
///
/// The single entry point of the script: call once per page view, then fire
/// [`Page::ready`]. There is no teardown.
pub fn install(page: &mut Page) {
  let handler: Handler = Rc::new(|page, _| on_ready(page));
  page.on_ready(handler);
}

fn on_ready(page: &mut Page) {
  page.log("proc1");

  // Snapshot the thumbnail set once; binding and the diagnostic scan must
  // agree on the same ready-time membership.
  let thumbnails = page.document.elements_with_class(THUMBNAIL_CLASS);

  for &node in &thumbnails {
    let handler: Handler = Rc::new(apply_fallback);
    page.events.bind(node, EventKind::Error, handler);
  }

  for &node in &thumbnails {
    let complete = page.is_complete(node);
    page.log(&complete.to_string());
  }
}

/// One-shot load-error handler.
///
/// Unbinding happens before the `src` swap: if the placeholder itself fails
/// to load, the error event finds no listener and the element stays hidden
/// with the placeholder path, an accepted terminal state.
fn apply_fallback(page: &mut Page, node: NodeId) {
  page.log("proc");
  page.document.hide(node);
  page.events.unbind_all(node);
  page.document.set_attribute(node, "src", PLACEHOLDER_SRC);
}
