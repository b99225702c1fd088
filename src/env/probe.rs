//! Bounded tool probes.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Upper bound for one presence probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs `<program> <arg>` and returns the first non-empty output line.
///
/// Not found, a nonzero exit, a timeout and any other failure all yield `None`.
pub fn probe(program: impl AsRef<Path>, arg: &str) -> Option<String> {
    probe_with_timeout(program.as_ref(), &[arg], PROBE_TIMEOUT)
}

/// Like [`probe`] with several arguments.
pub(crate) fn probe_args(program: impl AsRef<Path>, args: &[&str]) -> Option<String> {
    probe_with_timeout(program.as_ref(), args, PROBE_TIMEOUT)
}

fn probe_with_timeout(program: &Path, args: &[&str], timeout: Duration) -> Option<String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .ok()?;

    // Pipes are drained while waiting so verbose tools cannot fill them and stall.
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) | Err(_) => {
            let _ = child.kill();
            let _ = child.wait();
            log::debug!("probe of {} timed out", program.display());
            return None;
        }
    };

    if !status.success() {
        return None;
    }

    let mut output = collect(stdout);
    if output.trim().is_empty() {
        output = collect(stderr);
    }

    Some(
        output
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("available")
            .to_string(),
    )
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        let _ = pipe.read_to_end(&mut bytes);
        String::from_utf8_lossy(&bytes).into_owned()
    })
}

fn collect(reader: Option<JoinHandle<String>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

/// Locates `tool` on `PATH`.
pub fn which(tool: &str) -> Option<PathBuf> {
    which::which(tool).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_absent() {
        assert_eq!(probe("no-such-tool-for-probe-test", "--version"), None);
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_is_absent() {
        assert_eq!(probe("false", "--version"), None);
    }

    #[cfg(unix)]
    #[test]
    fn slow_program_times_out() {
        let started = std::time::Instant::now();
        let result = probe_with_timeout(Path::new("sleep"), &["5"], Duration::from_millis(200));
        assert_eq!(result, None);
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn output_larger_than_a_pipe_buffer_is_read() {
        let started = std::time::Instant::now();
        let result = probe_with_timeout(
            Path::new("sh"),
            &["-c", "echo tool 1.0; yes x | head -n 200000"],
            Duration::from_secs(5),
        );
        assert_eq!(result.as_deref(), Some("tool 1.0"));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn first_line_is_returned() {
        assert_eq!(probe("echo", "hello").as_deref(), Some("hello"));
    }
}
