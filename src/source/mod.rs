mod event;
mod observer;
#[allow(clippy::module_inception)]
mod source;

pub use event::*;
pub use observer::*;
pub use source::*;
