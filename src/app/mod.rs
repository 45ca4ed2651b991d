pub mod cli;
pub mod command_handlers;
pub mod report;

pub use cli::{parse_cli_args, CliCommand, CliOptions, OutputFormat};
pub use command_handlers::{probe_endpoints, run_cli, CliOutput, UNKNOWN_EXIT_CODE};
pub use report::{render_json, render_text, EndpointReport, ProbeReport};
