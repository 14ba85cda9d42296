//! Debug output must never contain the access key.
//!
//! Installs a process-wide capturing logger, so everything lives in one test.

use std::sync::{Arc, Mutex};

use ipstack_core::{
    ClientOption, HttpRequest, HttpResponse, IpstackClient, LookupOptions, Transport, TransportError,
};
use log::{Level, LevelFilter, Log, Metadata, Record};

static LOGGER: CaptureLogger = CaptureLogger {
    lines: Mutex::new(Vec::new()),
};

struct CaptureLogger {
    lines: Mutex<Vec<String>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if record.target() == "ipstack" {
            self.lines.lock().unwrap().push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

struct EchoTransport;

impl Transport for EchoTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        assert!(request.url.contains("access_key=super-secret-123"));
        Ok(HttpResponse {
            status: 200,
            headers: vec![("x-request-id".to_string(), "abc".to_string())],
            body: br#"{"ip":"1.1.1.1"}"#.to_vec(),
        })
    }
}

fn client(debug: bool) -> IpstackClient {
    IpstackClient::new(
        "super-secret-123",
        false,
        [
            ClientOption::Transport(Arc::new(EchoTransport)),
            ClientOption::Debug(debug),
        ],
    )
    .unwrap()
}

#[test]
fn debug_logging_redacts_access_key() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Debug);

    // Quiet client logs nothing.
    client(false).lookup("1.1.1.1", &[]).unwrap();
    assert!(LOGGER.lines.lock().unwrap().is_empty());

    let c = client(true);
    c.lookup("1.1.1.1", &[LookupOptions::new().fields("ip")]).unwrap();
    c.bulk_lookup(&["1.1.1.1"]).unwrap();
    c.requester_lookup().unwrap();

    let lines = LOGGER.lines.lock().unwrap().clone();
    assert_eq!(lines.len(), 4, "{lines:#?}");
    assert_eq!(
        lines[0],
        "HTTP request: http://api.ipstack.com/1.1.1.1?access_key=hidden&fields=ip"
    );
    assert!(lines[1].starts_with("HTTP GET:200 header:"), "{}", lines[1]);
    assert!(lines[1].contains("x-request-id"));
    assert!(lines[2].contains("not implemented"));
    assert!(lines[2].contains("limit 50"), "{}", lines[2]);
    assert!(lines[3].contains("not implemented"));
    for line in &lines {
        assert!(!line.contains("super-secret-123"), "key leaked: {line}");
    }
}
