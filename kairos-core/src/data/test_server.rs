//! Local HTTP stub for exercising the Yahoo client without the network.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

type Route = dyn Fn(&str) -> (u16, String) + Send + Sync;

/// Serves every request by calling `route(path)` and records the paths hit.
pub(crate) struct StubServer {
    pub base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Bind an ephemeral port and serve until the test process exits.
    pub fn start<F>(route: F) -> Self
    where
        F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(Mutex::new(Vec::new()));
        let route: Arc<Route> = Arc::new(route);

        let recorded = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                serve(stream, route.as_ref(), &recorded);
            }
        });

        Self { base_url, hits }
    }

    /// Number of requests whose path starts with `prefix`.
    pub fn hits(&self, prefix: &str) -> usize {
        self.hits.lock().unwrap().iter().filter(|p| p.starts_with(prefix)).count()
    }
}

fn serve(stream: TcpStream, route: &Route, hits: &Mutex<Vec<String>>) {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    // Drain headers; requests are bodiless GETs.
    let mut line = String::new();
    while reader.read_line(&mut line).map(|n| n > 2).unwrap_or(false) {
        line.clear();
    }

    let target = request_line.split_whitespace().nth(1).unwrap_or("/");
    let path = target.split('?').next().unwrap_or(target).to_string();
    hits.lock().unwrap().push(path.clone());

    let (status, body) = route(&path);
    let response = format!(
        "HTTP/1.1 {status} STUB\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let mut stream = reader.into_inner();
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// Chart API body with one daily bar per close, starting 2024-01-02 14:30 UTC.
pub(crate) fn chart_body(closes: &[f64]) -> String {
    let timestamps: Vec<String> = (0..closes.len())
        .map(|i| (1_704_205_800 + i as i64 * 86_400).to_string())
        .collect();
    let join = |f: &dyn Fn(f64) -> f64| {
        closes.iter().map(|&c| f(c).to_string()).collect::<Vec<_>>().join(",")
    };
    format!(
        r#"{{"chart":{{"result":[{{"timestamp":[{}],"indicators":{{"quote":[{{"open":[{}],"high":[{}],"low":[{}],"close":[{}],"volume":[{}]}}]}}}}],"error":null}}}}"#,
        timestamps.join(","),
        join(&|c| c),
        join(&|c| c + 1.0),
        join(&|c| c - 1.0),
        join(&|c| c),
        vec!["1000"; closes.len()].join(",")
    )
}
