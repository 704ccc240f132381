pub mod console;
pub mod dom;
pub mod error;
pub mod events;
pub mod page;
pub mod script;

pub use console::{Console, RecordingConsole, StderrConsole};
pub use dom::{Document, DomNode, DomNodeKind, NodeId};
pub use error::{Error, Result};
pub use events::{EventKind, EventRegistry, Handler, ListenerId};
pub use page::{LoadState, Page};
pub use script::{install, PLACEHOLDER_SRC, THUMBNAIL_CLASS};
