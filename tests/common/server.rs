//! Minimal HTTP server answering canned responses, one per connection.
use std::{
    io::{Read, Write},
    net::{TcpListener, TcpStream},
    thread::{self, JoinHandle},
};

#[derive(Debug)]
pub struct Exchange {
    pub request_line: String,
    pub body: String,
}

pub struct TestServer {
    pub url: String,
    handle: JoinHandle<Vec<Exchange>>,
}

impl TestServer {
    /// Serves `responses` in order, then stops accepting connections.
    pub fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Unable to bind test server");
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let mut exchanges = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().expect("accept failed");
                let exchange = read_request(&mut stream).expect("read failed");
                write_response(&mut stream, status, &body).expect("write failed");
                exchanges.push(exchange);
            }
            exchanges
        });

        Self { url, handle }
    }

    /// Waits for every response to be served and returns what was received.
    pub fn finish(self) -> Vec<Exchange> {
        self.handle.join().expect("test server panicked")
    }
}

/// A URL on which nothing is listening.
pub fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    url
}

fn read_request(stream: &mut TcpStream) -> std::io::Result<Exchange> {
    let mut data = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(position) = data.windows(4).position(|window| window == b"\r\n\r\n") {
            break position + 4;
        }
        let read = stream.read(&mut chunk)?;
        if read == 0 {
            break data.len();
        }
        data.extend_from_slice(&chunk[..read]);
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let read = stream.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..read]);
    }

    Ok(Exchange {
        request_line: head.lines().next().unwrap_or_default().to_string(),
        body: String::from_utf8_lossy(&data[header_end..]).to_string(),
    })
}

fn write_response(stream: &mut TcpStream, status: u16, body: &str) -> std::io::Result<()> {
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        _ => "Internal Server Error",
    };
    write!(
        stream,
        "HTTP/1.1 {status} {reason}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n{body}",
        body.len()
    )?;
    stream.flush()
}
