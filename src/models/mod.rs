pub mod github;
pub mod pull_request;
pub mod registry;

pub use github::*;
pub use pull_request::*;
pub use registry::*;
