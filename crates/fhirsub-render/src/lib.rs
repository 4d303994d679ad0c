pub mod kind;
pub mod render;

pub use kind::ResourceKind;
pub use render::{Node, RenderContext, render};
