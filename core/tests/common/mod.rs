//! Shared fixtures: a live echo server on a random port.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use echo_server::Inspection;

/// Start the echo server in a background thread and return its base URL.
///
/// The listener is bound before this returns, so the first request cannot
/// race the server's startup.
pub fn spawn_echo_server() -> String {
    let std_listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            echo_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// One step of a scripted raw-socket response.
pub enum Step {
    Sleep(Duration),
    Write(&'static [u8]),
}

/// Start a raw TCP server that answers one request with `response` and
/// closes the connection.
pub fn spawn_raw_server(response: &'static [u8]) -> String {
    spawn_scripted_server(vec![Step::Write(response)])
}

/// Start a raw TCP server that reads one request head, then plays `script`
/// on the connection and closes it.
pub fn spawn_scripted_server(script: Vec<Step>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut seen = Vec::new();
        let mut buf = [0u8; 1024];
        while !seen.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            seen.extend_from_slice(&buf[..n]);
        }
        for step in script {
            let written = match step {
                Step::Sleep(pause) => {
                    thread::sleep(pause);
                    Ok(())
                }
                Step::Write(bytes) => stream.write_all(bytes).and_then(|_| stream.flush()),
            };
            // The client hung up after its deadline.
            if written.is_err() {
                return;
            }
        }
    });

    format!("http://{addr}")
}

/// Start a raw TCP server that accepts one connection and never reads from
/// it, holding it open for `hold`.
pub fn spawn_silent_server(hold: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        thread::sleep(hold);
        drop(stream);
    });

    format!("http://{addr}")
}

/// An address nothing is listening on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

pub fn inspection(body: &[u8]) -> Inspection {
    serde_json::from_slice(body).unwrap()
}
