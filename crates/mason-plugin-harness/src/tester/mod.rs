//! The plugin tester: one request/response exchange per subprocess.
//!
//! [`PluginTester`] spawns the plugin executable for each call, writes the
//! encoded request to its stdin, closes the pipe, and collects stdout and
//! stderr while polling for exit under a timeout. Each call is an isolated
//! unit of work; no state is shared between exchanges beyond the
//! monotonically increasing request identifier.

use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use mason_plugin_protocol::{
    Request, Response, Target, Workspace, decode_line, encode_line, method,
};

use crate::error::HarnessError;
use crate::fixtures;

/// Tracing target for harness subprocess operations.
const TESTER_TARGET: &str = "mason_plugin_harness::tester";

/// Default exchange timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Poll interval while waiting for the plugin process to exit.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Drives a compiled plugin executable through the wire protocol.
///
/// The request identifier starts at 1 and increments on every call,
/// whether or not the call succeeds.
#[derive(Debug)]
pub struct PluginTester {
    executable: PathBuf,
    timeout_secs: u64,
    next_id: i64,
}

impl PluginTester {
    /// Creates a tester for the given plugin executable with the default
    /// five-second timeout.
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            next_id: 1,
        }
    }

    /// Overrides the exchange timeout.
    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Returns the plugin executable path.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Returns the identifier the next request will carry.
    #[must_use]
    pub const fn next_request_id(&self) -> i64 {
        self.next_id
    }

    /// Sends one request and returns the plugin's result payload.
    ///
    /// Spawns a fresh subprocess for the exchange, enforcing the timeout
    /// over the whole spawn-write-read-exit cycle.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Timeout`] when no exchange completes in
    /// time, [`HarnessError::NonZeroExit`] with captured stderr when the
    /// process fails, [`HarnessError::InvalidResponse`] when the output
    /// line is missing or unparseable, and [`HarnessError::Rpc`] when the
    /// plugin answered with an in-protocol error.
    pub fn send_request(
        &mut self,
        method_name: &str,
        params: Option<Map<String, Value>>,
    ) -> Result<Value, HarnessError> {
        let id = self.next_id;
        self.next_id += 1;

        let request = params.map_or_else(
            || Request::new(id, method_name),
            |map| Request::with_params(id, method_name, map),
        );
        let line = encode_line(&request).map_err(|source| HarnessError::Encode { source })?;

        debug!(
            target: TESTER_TARGET,
            executable = %self.executable.display(),
            method = method_name,
            id,
            "sending request to plugin"
        );

        let output = exchange(&self.executable, &line, self.timeout_secs)?;
        interpret(id, output)
    }

    /// Calls `plugin.info` and returns the metadata object.
    ///
    /// # Errors
    ///
    /// Propagates any [`HarnessError`] from [`Self::send_request`].
    pub fn test_info(&mut self) -> Result<Value, HarnessError> {
        self.send_request(method::INFO, None)
    }

    /// Calls `build.pre_hook` with the given or default fixtures.
    ///
    /// # Errors
    ///
    /// Propagates any [`HarnessError`] from [`Self::send_request`].
    pub fn test_pre_hook(
        &mut self,
        target: Option<Target>,
        workspace: Option<Workspace>,
    ) -> Result<Value, HarnessError> {
        let params = fixtures::pre_hook_params(
            &target.unwrap_or_else(fixtures::test_target),
            &workspace.unwrap_or_else(fixtures::test_workspace),
        )?;
        self.send_request(method::PRE_HOOK, Some(params))
    }

    /// Calls `build.post_hook` with the given call fixture.
    ///
    /// # Errors
    ///
    /// Propagates any [`HarnessError`] from [`Self::send_request`].
    pub fn test_post_hook(&mut self, call: PostHookCall) -> Result<Value, HarnessError> {
        let params = fixtures::post_hook_params(
            &call.target,
            &call.workspace,
            &call.outputs,
            call.success,
            call.duration_ms,
        )?;
        self.send_request(method::POST_HOOK, Some(params))
    }

    /// Calls `artifact.process` with the given or default fixtures.
    ///
    /// # Errors
    ///
    /// Propagates any [`HarnessError`] from [`Self::send_request`].
    pub fn test_artifact_process(
        &mut self,
        artifacts: Option<Vec<Value>>,
        config: Option<Map<String, Value>>,
    ) -> Result<Value, HarnessError> {
        let mut params = Map::new();
        params.insert(
            String::from("artifacts"),
            Value::Array(artifacts.unwrap_or_else(fixtures::test_artifacts)),
        );
        params.insert(
            String::from("config"),
            Value::Object(config.unwrap_or_default()),
        );
        self.send_request(method::ARTIFACT_PROCESS, Some(params))
    }

    /// Asserts that the plugin's metadata matches the expectations.
    ///
    /// `None` fields are not checked; `capabilities` is checked as a
    /// superset, not an exact match.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Assertion`] on mismatch, or any exchange
    /// error from fetching the metadata.
    pub fn assert_info(
        &mut self,
        name: Option<&str>,
        version: Option<&str>,
        capabilities: &[&str],
    ) -> Result<(), HarnessError> {
        let info = self.test_info()?;

        if let Some(expected) = name {
            let actual = info.get("name").and_then(Value::as_str).unwrap_or("");
            if actual != expected {
                return Err(HarnessError::assertion(format!(
                    "expected plugin name '{expected}', got '{actual}'"
                )));
            }
        }

        if let Some(expected) = version {
            let actual = info.get("version").and_then(Value::as_str).unwrap_or("");
            if actual != expected {
                return Err(HarnessError::assertion(format!(
                    "expected plugin version '{expected}', got '{actual}'"
                )));
            }
        }

        let declared: Vec<&str> = info
            .get("capabilities")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        for capability in capabilities {
            if !declared.contains(capability) {
                return Err(HarnessError::assertion(format!(
                    "missing capability '{capability}'; declared: {declared:?}"
                )));
            }
        }

        Ok(())
    }

    /// Runs a quick smoke test: metadata plus every declared build hook.
    ///
    /// # Errors
    ///
    /// Returns the first exchange or assertion failure encountered.
    pub fn smoke_test(&mut self) -> Result<(), HarnessError> {
        let info = self.test_info()?;
        let declared: Vec<String> = info
            .get("capabilities")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        if declared.iter().any(|c| c == method::PRE_HOOK) {
            let result = self.test_pre_hook(None, None)?;
            assert_hook_success(&result)?;
        }
        if declared.iter().any(|c| c == method::POST_HOOK) {
            let result = self.test_post_hook(PostHookCall::default())?;
            assert_hook_success(&result)?;
        }
        Ok(())
    }
}

/// Parameter object for post-hook calls, defaulting to the standard
/// fixtures: one `bin/app` output, a successful one-second build.
#[derive(Debug, Clone)]
pub struct PostHookCall {
    target: Target,
    workspace: Workspace,
    outputs: Vec<String>,
    success: bool,
    duration_ms: u64,
}

impl Default for PostHookCall {
    fn default() -> Self {
        Self {
            target: fixtures::test_target(),
            workspace: fixtures::test_workspace(),
            outputs: fixtures::test_outputs(),
            success: true,
            duration_ms: 1000,
        }
    }
}

impl PostHookCall {
    /// Creates a call with the default fixtures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the target.
    #[must_use]
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Overrides the workspace.
    #[must_use]
    pub fn with_workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = workspace;
        self
    }

    /// Overrides the output artifact paths.
    #[must_use]
    pub fn with_outputs(mut self, outputs: Vec<String>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Overrides the build success flag.
    #[must_use]
    pub const fn with_success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    /// Overrides the build duration in milliseconds.
    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Asserts that a hook result's success flag is true.
///
/// # Errors
///
/// Returns [`HarnessError::Assertion`] when the flag is absent or false.
pub fn assert_hook_success(result: &Value) -> Result<(), HarnessError> {
    if result.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(());
    }
    let logs = result.get("logs").cloned().unwrap_or(Value::Null);
    Err(HarnessError::assertion(format!(
        "hook did not report success; logs: {logs}"
    )))
}

/// Asserts that the joined hook log lines contain every given substring.
///
/// # Errors
///
/// Returns [`HarnessError::Assertion`] naming the first missing pattern.
pub fn assert_hook_logs_contain(result: &Value, patterns: &[&str]) -> Result<(), HarnessError> {
    let joined = result
        .get("logs")
        .and_then(Value::as_array)
        .map(|lines| {
            lines
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<&str>>()
                .join("\n")
        })
        .unwrap_or_default();

    for pattern in patterns {
        if !joined.contains(pattern) {
            return Err(HarnessError::assertion(format!(
                "pattern '{pattern}' not found in logs:\n{joined}"
            )));
        }
    }
    Ok(())
}

/// Collected output of one plugin subprocess exchange.
struct ProcessOutput {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

/// Spawns the plugin, writes one request line, and collects its output,
/// all under the timeout.
///
/// The stdin write runs on a helper thread so a plugin that never reads
/// its input cannot block the exchange past the deadline: killing the
/// child on timeout closes the pipe and unblocks the writer.
fn exchange(executable: &Path, line: &str, timeout_secs: u64) -> Result<ProcessOutput, HarnessError> {
    let started = Instant::now();

    let mut child = Command::new(executable)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| HarnessError::Spawn {
            executable: executable.to_path_buf(),
            source: Arc::new(source),
        })?;

    let stdin_rx = spawn_writer(child.stdin.take(), line);
    let stdout_rx = spawn_reader(child.stdout.take());
    let stderr_rx = spawn_reader(child.stderr.take());

    let status = wait_for_exit(&mut child, started, timeout_secs)?;
    check_write(&stdin_rx)?;
    let stdout = collect_stream(&stdout_rx, "stdout")?;
    let stderr = collect_stream(&stderr_rx, "stderr")?;

    debug!(
        target: TESTER_TARGET,
        ?status,
        stdout_bytes = stdout.len(),
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "plugin exchange finished"
    );

    Ok(ProcessOutput {
        status,
        stdout,
        stderr,
    })
}

/// Writes the request line to the child's stdin on a helper thread and
/// closes the pipe afterwards.
fn spawn_writer(
    stream: Option<impl Write + Send + 'static>,
    line: &str,
) -> mpsc::Receiver<std::io::Result<()>> {
    let (sender, receiver) = mpsc::channel();
    let payload = format!("{line}\n");
    if let Some(mut stdin) = stream {
        thread::spawn(move || {
            let outcome = stdin
                .write_all(payload.as_bytes())
                .and_then(|()| stdin.flush());
            drop(sender.send(outcome));
            // Stdin drops here, closing the pipe to signal no more input.
        });
    }
    receiver
}

/// Checks the writer thread's outcome after the child has exited.
///
/// A broken pipe means the child stopped reading before the request was
/// fully written; the exit status carries the verdict in that case.
fn check_write(receiver: &mpsc::Receiver<std::io::Result<()>>) -> Result<(), HarnessError> {
    match receiver.recv_timeout(POLL_INTERVAL.saturating_mul(20)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(source)) if source.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Ok(Err(source)) => Err(HarnessError::Io {
            source: Arc::new(source),
        }),
        Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => Ok(()),
    }
}

/// Reads a child stream to the end on a helper thread.
fn spawn_reader(stream: Option<impl Read + Send + 'static>) -> mpsc::Receiver<std::io::Result<String>> {
    let (sender, receiver) = mpsc::channel();
    if let Some(source) = stream {
        thread::spawn(move || {
            let mut buffer = String::new();
            let outcome = BufReader::new(source)
                .read_to_string(&mut buffer)
                .map(|_| buffer);
            drop(sender.send(outcome));
        });
    }
    receiver
}

/// Waits for the collected stream contents after the child has exited.
///
/// A read that is still blocked at this point means something (typically
/// a grandchild process) inherited the pipe and kept it open; that is
/// reported rather than mistaken for a plugin that wrote nothing.
fn collect_stream(
    receiver: &mpsc::Receiver<std::io::Result<String>>,
    stream_name: &str,
) -> Result<String, HarnessError> {
    match receiver.recv_timeout(POLL_INTERVAL.saturating_mul(20)) {
        Ok(Ok(contents)) => Ok(contents),
        Ok(Err(source)) => Err(HarnessError::Io {
            source: Arc::new(source),
        }),
        Err(RecvTimeoutError::Timeout) => Err(HarnessError::Io {
            source: Arc::new(std::io::Error::other(format!(
                "plugin {stream_name} pipe still open after exit; output could not be collected"
            ))),
        }),
        Err(RecvTimeoutError::Disconnected) => Ok(String::new()),
    }
}

/// Polls the child until it exits, killing it when the timeout elapses.
fn wait_for_exit(
    child: &mut Child,
    started: Instant,
    timeout_secs: u64,
) -> Result<ExitStatus, HarnessError> {
    let timeout = Duration::from_secs(timeout_secs);
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if started.elapsed() > timeout {
                    warn!(
                        target: TESTER_TARGET,
                        timeout_secs,
                        "plugin timed out, killing process"
                    );
                    drop(child.kill());
                    drop(child.wait());
                    return Err(HarnessError::Timeout { timeout_secs });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(source) => {
                return Err(HarnessError::Io {
                    source: Arc::new(source),
                });
            }
        }
    }
}

/// Interprets a finished exchange: exit status, then the response line.
fn interpret(expected_id: i64, output: ProcessOutput) -> Result<Value, HarnessError> {
    if !output.status.success() {
        return Err(HarnessError::NonZeroExit {
            status: output.status.code().unwrap_or(-1),
            stderr: output.stderr.trim().to_owned(),
        });
    }

    let first_line = output.stdout.lines().next().map(str::to_owned);
    let Some(line) = first_line else {
        return Err(HarnessError::InvalidResponse {
            raw: output.stdout,
            message: String::from("plugin produced no output on stdout"),
        });
    };

    let response: Response =
        decode_line(&line).map_err(|error| HarnessError::InvalidResponse {
            raw: line.clone(),
            message: error.to_string(),
        })?;

    // FIFO ordering makes identifier matching a safety net, not a pairing
    // requirement.
    if response.id() != expected_id {
        warn!(
            target: TESTER_TARGET,
            expected = expected_id,
            actual = response.id(),
            "response identifier does not match request"
        );
    }

    if let Some(error) = response.error() {
        return Err(HarnessError::Rpc {
            code: error.code(),
            message: error.message().to_owned(),
        });
    }

    Ok(response.result().cloned().unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests;
