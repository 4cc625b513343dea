pub mod aggregate;
pub mod exec;
pub mod fetch;
pub mod output;

pub use aggregate::{aggregate_commits, aggregate_repository, tally_commits, Aggregation};
pub use exec::{exec, run_pipeline, HeatmapReport};
pub use fetch::{enumerate_repositories, fetch_commits};
pub use output::{build_output, output_json, output_ndjson, output_summary, write_ndjson, write_svg};
