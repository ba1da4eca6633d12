pub mod loader;
pub mod monthly;
pub mod partition;
pub mod report;
pub mod stats;

pub use loader::{load, load_with, LoadOptions, CUTOVER_TIMESTAMP};
pub use monthly::{monthly_counts, MonthlyCounts};
pub use partition::{partition, LibrarySets, PartitionKind, Partitions};
pub use report::{libraries_report, prs_report, SectionReport};
pub use stats::{basic_stats, grouped_stats, BasicStats, GroupedStats, LibraryMean};
