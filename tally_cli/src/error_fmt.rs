//! Human-readable error descriptions and structured JSON error formatting.

use tally_core::error::{BuildError, TallyError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingWeightSource => {
                "What happened: No weight source was provided to the station.\nLikely causes: The weighing platform simulator failed to initialize or was not wired into the builder.\nHow to fix: Ensure a weight source is created successfully and passed via with_scale(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid station configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See README for a sample."
            ),
        };
    }

    if let Some(te) = err.downcast_ref::<TallyError>() {
        return match te {
            TallyError::EmptyCount => {
                "What happened: A partial capture was requested while the live count is 0.\nLikely causes: No crossings were applied since the last capture, or the tally was zeroed.\nHow to fix: Wait for at least one inbound crossing before capturing.".to_string()
            }
            TallyError::EmptyPartials => {
                "What happened: Finalize was requested with no captured partials.\nLikely causes: The run ended before any partial was captured.\nHow to fix: Capture at least one partial (lower capture.partial_every or raise --crossings), then finalize.".to_string()
            }
            TallyError::InvalidState(what) => format!(
                "What happened: The operation is not allowed in the current session state ({what}).\nLikely causes: A finalize is pending confirmation, or the session has not started.\nHow to fix: Confirm or cancel the pending finalize first."
            ),
            TallyError::Timeout => {
                "What happened: The weight sample timed out.\nLikely causes: The weighing platform is unresponsive, or weight.sample_timeout_ms is too low.\nHow to fix: Check the platform and consider raising weight.sample_timeout_ms in the config.".to_string()
            }
            TallyError::Scale(msg) => format!(
                "What happened: The weighing platform reported an error ({msg}).\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // Generic fallback
    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable name for a typed error, used as the JSON "reason" field.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(te) = err.downcast_ref::<TallyError>() {
        return match te {
            TallyError::EmptyCount => "EmptyCount",
            TallyError::EmptyPartials => "EmptyPartials",
            TallyError::InvalidState(_) => "InvalidState",
            TallyError::Scale(_) => "Scale",
            TallyError::Timeout => "Timeout",
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return "Build";
    }
    "Error"
}

/// Map typed errors to stable exit codes; everything else returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(te) = err.downcast_ref::<TallyError>() {
        return match te {
            TallyError::EmptyPartials => 3,
            TallyError::EmptyCount => 4,
            TallyError::Timeout => 5,
            TallyError::InvalidState(_) => 6,
            TallyError::Scale(_) => 7,
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    json!({ "reason": reason_name(err), "message": humanize(err) }).to_string()
}
