mod error;
mod lookup;
mod mockup;
mod parse;
mod router;
mod union;

pub use error::*;
pub use lookup::*;
pub use mockup::*;
pub use parse::*;
pub use router::*;
pub use union::*;
