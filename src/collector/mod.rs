pub mod pipeline;
pub mod title;

pub use pipeline::{persist, Collector, DEPENDABOT_AUTHORS, SECURITY_LABEL};
pub use title::{determine_update_type, DependabotTitleParser, TitleParser};
