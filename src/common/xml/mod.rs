//! XML utilities: escaping, a small owned element tree and an indented
//! document writer.

mod element;
mod escape;
mod writer;

pub use element::{Descendants, Element, Node, XmlDocument};
pub use escape::{escape_xml, resolve_entity, unescape_xml};
pub use writer::XmlWriter;
