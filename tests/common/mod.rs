use std::sync::mpsc::{self, Receiver};
use std::thread;

use tiny_http::{Header, Response, Server};

/// What the stand-in API saw for one request.
#[derive(Debug)]
pub struct Seen {
    pub url: String,
    pub content_type: Option<String>,
}

/// Serves `replies` in order, one per request, then shuts down.
pub fn serve(replies: Vec<(u16, &'static str)>) -> (String, Receiver<Seen>) {
    let server = Server::http("127.0.0.1:0").expect("bind test server");
    let base = format!("http://{}", server.server_addr());
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in replies {
            let Ok(req) = server.recv() else { return };
            let content_type = req
                .headers()
                .iter()
                .find(|h| h.field.equiv("Content-Type"))
                .map(|h| h.value.as_str().to_string());
            let _ = tx.send(Seen {
                url: req.url().to_string(),
                content_type,
            });
            let json = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                .expect("static header");
            let resp = Response::from_string(body)
                .with_status_code(status)
                .with_header(json);
            let _ = req.respond(resp);
        }
    });

    (base, rx)
}

/// A base URL nothing is listening on.
pub fn dead_base_url() -> String {
    let l = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = l.local_addr().expect("addr");
    drop(l);
    format!("http://{addr}")
}
