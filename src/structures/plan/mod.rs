mod leg;
mod place;
mod route;
mod transport;

pub use leg::*;
pub use place::*;
pub use route::*;
pub use transport::*;
