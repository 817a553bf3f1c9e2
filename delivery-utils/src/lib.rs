mod json;
pub use json::*;
mod store;
pub use store::*;
