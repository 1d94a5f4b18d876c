use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

type HitCounts = Arc<Mutex<BTreeMap<String, u64>>>;

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    hits: HitCounts,
}

impl ServerHandle {
    /// Requests served so far, keyed by path.
    pub fn hits(&self) -> Result<BTreeMap<String, u64>, String> {
        self.hits
            .lock()
            .map(|hits| hits.clone())
            .map_err(|err| format!("hit counter poisoned: {}", err))
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP server. `/fail` answers 500, every other path 200.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server() -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let hits: HitCounts = Arc::new(Mutex::new(BTreeMap::new()));
    let server_hits = Arc::clone(&hits);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let hits = Arc::clone(&server_hits);
                    thread::spawn(move || handle_client(stream, &hits));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
            hits,
        },
    ))
}

/// Like [`spawn_http_server`], but skips in sandboxes that forbid sockets.
///
/// # Errors
///
/// Returns an error for any other server setup failure.
pub fn spawn_http_server_or_skip() -> Result<Option<(String, ServerHandle)>, String> {
    match spawn_http_server() {
        Ok(result) => Ok(Some(result)),
        Err(err) if err.contains("Operation not permitted") => {
            eprintln!("Skipping e2e test: {}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn request_path(request: &[u8]) -> String {
    String::from_utf8_lossy(request)
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_owned()
}

fn handle_client(mut stream: TcpStream, hits: &HitCounts) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let mut buffer = [0u8; 2048];
    let Ok(read) = stream.read(&mut buffer) else {
        return;
    };
    let path = request_path(buffer.get(..read).unwrap_or_default());
    if let Ok(mut hits) = hits.lock() {
        let entry = hits.entry(path.clone()).or_insert(0);
        *entry = entry.saturating_add(1);
    }

    let response: &[u8] = if path == "/fail" {
        b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 4\r\nConnection: close\r\n\r\nFAIL"
    } else {
        b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK"
    };
    if stream.write_all(response).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

/// Run the `vuload` binary from `dir` and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_vuload<I, S>(dir: &Path, args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = vuload_bin()?;
    Command::new(bin)
        .args(args)
        .current_dir(dir)
        .env("VULOAD_LOG", "error")
        .env_remove("VULOAD_SEED")
        .output()
        .map_err(|err| format!("run vuload failed: {}", err))
}

fn vuload_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_vuload").map_or_else(
        || Err("CARGO_BIN_EXE_vuload missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}

pub fn describe(output: &Output) -> String {
    format!(
        "status: {}\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}
