mod lifecycle;
mod request;
mod response;

pub use lifecycle::*;
pub use request::*;
pub use response::*;
