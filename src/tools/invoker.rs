//! Subprocess invocation of catalog tools.
//!
//! Invocation never errors out of the loop: a tool's own non-zero exit is a
//! normal observation, and failures of the invocation itself (missing
//! executable, timeout) come back as observations with a sentinel exit code.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::catalog::ToolSpec;
use crate::tools::normalize::NormalizedArgs;

/// Exit code reported when the invocation itself failed.
pub const INVOCATION_FAILED: i32 = -1;

/// Captured result of one tool execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl Observation {
    /// An observation describing a failure of the invocation machinery
    /// itself (unknown tool, bad arguments, spawn failure, timeout).
    pub fn invocation_failure(message: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: message.into(),
            exit_code: INVOCATION_FAILED,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Build the argv for a tool call: the script path, then `option value`
/// pairs in the spec's declared argument order. Unset arguments are omitted.
pub fn build_command_line(spec: &ToolSpec, args: &NormalizedArgs) -> Vec<String> {
    let mut argv = Vec::with_capacity(1 + 2 * args.len());
    argv.push(spec.script_path.clone());
    for arg in &spec.arguments {
        if let Some(value) = args.get(&arg.name) {
            argv.push(arg.option.clone());
            argv.push(value.clone());
        }
    }
    argv
}

/// Run the tool as a child process with a bounded wait.
pub async fn invoke(spec: &ToolSpec, args: &NormalizedArgs, timeout: Duration) -> Observation {
    let argv = build_command_line(spec, args);
    tracing::debug!(tool = %spec.name, command = ?argv, "invoking tool");

    let mut command = Command::new(&argv[0]);
    command
        .args(&argv[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            return Observation::invocation_failure(format!(
                "failed to execute '{}': {}",
                spec.script_path, e
            ));
        }
    };

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => Observation {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            // A signal-terminated child has no code; report the sentinel.
            exit_code: output.status.code().unwrap_or(INVOCATION_FAILED),
        },
        Ok(Err(e)) => Observation::invocation_failure(format!(
            "failed to collect output from '{}': {}",
            spec.script_path, e
        )),
        Err(_) => Observation::invocation_failure(format!(
            "tool '{}' timed out after {}s",
            spec.name,
            timeout.as_secs()
        )),
    }
}
