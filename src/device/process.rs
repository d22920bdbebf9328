use std::{
    io::Read,
    process::{Child, Command as StdCommand, Stdio},
    thread,
    time::{Duration, Instant},
};

use crate::device::DeviceError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run `program` to completion and return its stdout. The child is killed once
/// `timeout` elapses.
pub fn run_with_timeout(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<Vec<u8>, DeviceError> {
    log::debug!("Executing {} {}", program, args.join(" "));

    let mut child = StdCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| DeviceError::Spawn {
            program: program.to_string(),
            source,
        })?;

    log::debug!("{} spawned (PID: {:?})", program, child.id());

    // Pipes are drained while the child runs.
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match wait_until(&mut child, Instant::now() + timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            log::warn!("{} still running after {:?}, killing it", program, timeout);
            let _ = child.kill();
            let _ = child.wait();
            return Err(DeviceError::Timeout {
                program: program.to_string(),
                timeout,
            });
        }
        Err(source) => {
            let _ = child.kill();
            return Err(DeviceError::Spawn {
                program: program.to_string(),
                source,
            });
        }
    };

    let stdout = stdout.join().unwrap_or_default();
    let stderr = stderr.join().unwrap_or_default();

    let exit_code = status.code().unwrap_or(-1);
    log::debug!("{} completed with exit code: {}", program, exit_code);
    if exit_code != 0 {
        return Err(DeviceError::Exit {
            program: program.to_string(),
            code: exit_code,
            stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
        });
    }

    Ok(stdout)
}

fn wait_until(
    child: &mut Child,
    deadline: Instant,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}
