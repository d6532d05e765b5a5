//! Greeter CLI.
//!
//! Declares the `Iam` resource, registers the greeter module, builds the
//! schedule and runs it once. Output goes through `tracing`.
//!
//! # Usage
//!
//! ```bash
//! greeter [pretty|compact|json]
//! ```
//!
//! `RUST_LOG` overrides the default filter, e.g.
//! `RUST_LOG=ordo_system=debug,greeter=info greeter compact`.

use std::process::ExitCode;

use example::{Greeter, run_once};
use ordo_core::{TracingConfig, TracingFormat};
use ordo_system::resource::Resources;

fn main() -> ExitCode {
    let format = match std::env::args().nth(1).as_deref() {
        None | Some("pretty") => TracingFormat::Pretty,
        Some("compact") => TracingFormat::Compact,
        Some("json") => TracingFormat::Json,
        Some(other) => {
            eprintln!("Error: unknown format `{other}`");
            eprintln!("Usage: greeter [pretty|compact|json]");
            return ExitCode::FAILURE;
        }
    };

    let mut config = TracingConfig::new().with_format(format);
    if let Ok(filter) = std::env::var("RUST_LOG") {
        config = config.with_env_filter(filter);
    }

    let mut resources = Resources::new();
    if let Err(e) = config.install(&mut resources) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let greeter = Greeter::declare(&mut resources);
    match run_once(&greeter, &resources) {
        Ok(scheduler) => {
            tracing::info!(order = ?scheduler.schedule().names(), "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "greeter failed");
            ExitCode::FAILURE
        }
    }
}
