//! HTTP conversion service
//!
//! `GET /` serves the upload page and `POST /convert?from=..&to=..&filename=..`
//! converts the raw request body. Routing is a pure function of method, URL
//! and body so it can be exercised without a socket.

mod page;

use std::collections::HashMap;
use std::io::Read;
use std::net::SocketAddr;

use tiny_http::{Header, Method, Request, Response, Server, StatusCode};
use tracing::{debug, error, info, warn};

use crate::cli::CliUtils;
use crate::conversion::{ConversionConfig, ConversionEngine};
use crate::error::{ConversionError, ConversionResult};
use crate::format::Format;

pub use page::INDEX_HTML;

const JSON_CONTENT_TYPE: &str = "application/json";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const DEFAULT_STEM: &str = "converted";

fn create_header(name: &[u8], value: &[u8]) -> Option<Header> {
    Header::from_bytes(name, value).ok()
}

/// Response produced by [`route`]
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: String,
    /// Suggested download name, sent as `Content-Disposition: attachment`
    pub filename: Option<String>,
    pub body: Vec<u8>,
}

impl Reply {
    fn html(body: &str) -> Self {
        Self {
            status: 200,
            content_type: HTML_CONTENT_TYPE.to_string(),
            filename: None,
            body: body.as_bytes().to_vec(),
        }
    }

    /// JSON `{"error": message}` with the given status
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        let message: String = message.into();
        let body = serde_json::json!({ "error": message }).to_string();
        Self {
            status,
            content_type: JSON_CONTENT_TYPE.to_string(),
            filename: None,
            body: body.into_bytes(),
        }
    }

    /// The `error` field of a JSON error body
    pub fn error_message(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_slice(&self.body).ok()?;
        value.get("error")?.as_str().map(str::to_string)
    }

    fn into_response(self) -> Response<std::io::Cursor<Vec<u8>>> {
        let mut response = Response::from_data(self.body).with_status_code(StatusCode(self.status));
        if let Some(h) = create_header(&b"Content-Type"[..], self.content_type.as_bytes()) {
            response = response.with_header(h);
        }
        if let Some(name) = self.filename {
            let disposition = format!("attachment; filename=\"{}\"", name);
            if let Some(h) = create_header(&b"Content-Disposition"[..], disposition.as_bytes()) {
                response = response.with_header(h);
            }
        }
        response
    }
}

/// Route one request
pub fn route(method: &Method, url: &str, body: &[u8], engine: &ConversionEngine) -> Reply {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));

    match (path, method) {
        ("/", Method::Get) | ("/index.html", Method::Get) => Reply::html(INDEX_HTML),
        ("/convert", Method::Post) => match parse_query(query) {
            Ok(params) => convert(&params, body, engine),
            Err(message) => Reply::error(400, message),
        },
        ("/", _) | ("/index.html", _) | ("/convert", _) => Reply::error(405, "Method not allowed."),
        _ => Reply::error(404, "Not found."),
    }
}

fn convert(params: &HashMap<String, String>, body: &[u8], engine: &ConversionEngine) -> Reply {
    let filename = params.get("filename").map(String::as_str).filter(|f| !f.is_empty());

    let output_format = match params.get("to") {
        Some(name) => match Format::from_name(name) {
            Ok(format) => format,
            Err(e) => return Reply::error(400, e.user_message()),
        },
        None => return Reply::error(400, "Missing output format."),
    };

    let input_format = match params.get("from") {
        Some(name) => match Format::from_name(name) {
            Ok(format) => format,
            Err(e) => return Reply::error(400, e.user_message()),
        },
        None => match filename.and_then(|f| Format::from_path(std::path::Path::new(f))) {
            Some(format) => format,
            None => return Reply::error(400, "Missing input format."),
        },
    };

    if body.is_empty() {
        return Reply::error(400, "No data provided.");
    }

    debug!(from = %input_format, to = %output_format, bytes = body.len(), "converting upload");
    match engine.convert_bytes(body, input_format, output_format) {
        Ok(data) => Reply {
            status: 200,
            content_type: data.mime_type().to_string(),
            filename: Some(format!(
                "{}.{}",
                download_stem(filename),
                output_format.extension()
            )),
            body: data.into_bytes(),
        },
        Err(e) => error_reply(&e),
    }
}

fn error_reply(error: &ConversionError) -> Reply {
    match error {
        ConversionError::InputTooLarge { .. } => Reply::error(413, error.user_message()),
        e if e.is_client_error() => {
            warn!(code = e.code(), error = %e, "conversion rejected");
            Reply::error(400, e.user_message())
        }
        e => {
            error!(code = e.code(), error = %e, "conversion failed");
            Reply::error(500, "Internal error during conversion.")
        }
    }
}

/// Decode a query string into a map; `+` decodes to a space
pub fn parse_query(query: &str) -> Result<HashMap<String, String>, String> {
    let mut params = HashMap::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key)?;
        let value = decode_component(value)?;
        params.insert(key, value);
    }
    Ok(params)
}

fn decode_component(raw: &str) -> Result<String, String> {
    urlencoding::decode(&raw.replace('+', " "))
        .map(|decoded| decoded.into_owned())
        .map_err(|_| format!("Invalid query parameter encoding: {}", raw))
}

/// Stem for the download name: the uploaded file's stem reduced to safe characters
pub fn download_stem(filename: Option<&str>) -> String {
    let Some(filename) = filename else {
        return DEFAULT_STEM.to_string();
    };
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let stem = match base.rfind('.') {
        Some(0) | None => base,
        Some(dot) => &base[..dot],
    };

    let cleaned: String = stem
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '_');

    if cleaned.is_empty() {
        DEFAULT_STEM.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Read a request body, refusing more than `limit` bytes
pub fn read_body(
    reader: &mut dyn Read,
    declared_length: Option<usize>,
    limit: usize,
) -> Result<Vec<u8>, Reply> {
    let too_large = || {
        Reply::error(
            413,
            format!(
                "Upload exceeds the {} limit.",
                CliUtils::format_file_size(limit as u64)
            ),
        )
    };

    if declared_length.is_some_and(|len| len > limit) {
        return Err(too_large());
    }

    let mut body = Vec::with_capacity(declared_length.unwrap_or(0));
    reader
        .take(limit as u64 + 1)
        .read_to_end(&mut body)
        .map_err(|e| Reply::error(400, format!("Failed to read request body: {}", e)))?;

    if body.len() > limit {
        return Err(too_large());
    }
    Ok(body)
}

/// Conversion service bound to a listening socket
pub struct ConversionServer {
    server: Server,
    engine: ConversionEngine,
}

impl ConversionServer {
    /// Bind to `addr` (e.g. `127.0.0.1:5000`; port 0 picks a free port)
    pub fn bind(addr: &str, config: ConversionConfig) -> ConversionResult<Self> {
        let server = Server::http(addr).map_err(|e| {
            ConversionError::configuration(format!("cannot listen on {}: {}", addr, e))
        })?;
        Ok(Self {
            server,
            engine: ConversionEngine::new(config),
        })
    }

    /// Address actually bound
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serve requests until the listener shuts down
    pub fn run(&self) {
        for request in self.server.incoming_requests() {
            self.handle(request);
        }
    }

    /// Stop a running [`run`](Self::run) loop
    pub fn unblock(&self) {
        self.server.unblock();
    }

    fn handle(&self, mut request: Request) {
        let method = request.method().clone();
        let url = request.url().to_string();
        let declared_length = request.body_length();

        let reply = match read_body(
            request.as_reader(),
            declared_length,
            self.engine.config().max_input_size,
        ) {
            Ok(body) => route(&method, &url, &body, &self.engine),
            Err(reply) => reply,
        };

        info!(method = %method, url = %url, status = reply.status, bytes = reply.body.len(), "handled request");
        if let Err(e) = request.respond(reply.into_response()) {
            warn!(error = %e, "failed to send response");
        }
    }
}

/// Bind and serve until the process is stopped
pub fn serve(addr: &str, config: ConversionConfig) -> ConversionResult<()> {
    let server = ConversionServer::bind(addr, config)?;
    match server.local_addr() {
        Some(bound) => info!("listening on http://{}/", bound),
        None => info!("listening on {}", addr),
    }
    server.run();
    Ok(())
}
