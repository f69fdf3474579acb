mod backup;
mod config;
mod conflict;
mod db;
mod ipc;

use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn init_tracing(filter: &str) {
    // stdout carries responses; logs must stay on stderr.
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

// Can't reply without id; answer with a bare error line.
fn reply_bad_json(stdout: &mut io::Stdout, message: &str) {
    let reply = serde_json::json!({
        "ok": false,
        "error": { "code": "bad_json", "message": message }
    });
    let _ = writeln!(stdout, "{}", reply);
    let _ = stdout.flush();
}

fn main() {
    let cfg = config::Config::from_env();
    init_tracing(&cfg.log_filter);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "centerd starting");

    let mut state = ipc::AppState::default();
    if let Some(path) = cfg.workspace.as_ref() {
        if let Err(e) = state.open_workspace(path) {
            tracing::warn!(path = %path.display(), error = %e, "startup workspace not opened");
        }
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed");
                break;
            }
        }
        let line = match std::str::from_utf8(&buf) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "request line is not utf-8");
                reply_bad_json(&mut stdout, &e.to_string());
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable request line");
                reply_bad_json(&mut stdout, &e.to_string());
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    tracing::info!("stdin closed, centerd exiting");
}
