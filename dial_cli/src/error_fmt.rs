//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use dial_core::error::{BuildError, DialError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingConnector => {
                "What happened: No controller connector was provided to the control loop.\nLikely causes: The connector failed to initialize or was not wired into the builder.\nHow to fix: Ensure a connector is created successfully and passed via with_connector(...).".to_string()
            }
            BuildError::MissingTargets => {
                "What happened: No target source was provided to the control loop.\nLikely causes: Neither random nor calendar targets were wired into the builder.\nHow to fix: Pass a target source via with_targets(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See README for a sample."
            ),
        };
    }

    if let Some(de) = err.downcast_ref::<DialError>() {
        if let DialError::ConnectExhausted { attempts } = de {
            return format!(
                "What happened: Cannot connect to the machine after {attempts} attempts; exiting.\nLikely causes: The machine is powered off, not on wifi, or the board is wedged and needs a reset.\nHow to fix: Check power and network, press RESET on the board, then rerun. Raise connection.initial_attempts if the link is just slow to come up."
            );
        }
        // Transient losses are recovered inside the loop; anything else
        // surfacing here is unexpected.
        return format!(
            "What happened: {de}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
        );
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("no controller address") {
        return "What happened: No controller address was given.\nLikely causes: The address flag was omitted and [connection].address is not set in the config.\nHow to fix: Pass --smart-machine-domain / --robot-address, or set [connection].address in the TOML.".to_string();
    }

    if lower.contains("initial_attempts")
        || lower.contains("homing_pulses")
        || lower.contains("must not be empty")
    {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: Out-of-range values under [connection] or [control].\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Structured error for `--json` mode.
pub fn to_json(err: &eyre::Report) -> serde_json::Value {
    serde_json::json!({
        "error": err.to_string(),
        "help": humanize(err),
    })
}
