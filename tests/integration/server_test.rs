//! Integration tests for the HTTP conversion service over a real socket

#[cfg(test)]
mod server_tests {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::thread;

    use tabconv::conversion::ConversionConfig;
    use tabconv::server::ConversionServer;

    struct HttpReply {
        status: u16,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    }

    impl HttpReply {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        }

        fn text(&self) -> String {
            String::from_utf8_lossy(&self.body).into_owned()
        }
    }

    fn start(config: ConversionConfig) -> SocketAddr {
        let server = ConversionServer::bind("127.0.0.1:0", config).unwrap();
        let addr = server.local_addr().unwrap();
        thread::spawn(move || server.run());
        addr
    }

    fn request(addr: SocketAddr, method: &str, target: &str, body: &[u8]) -> HttpReply {
        let mut stream = TcpStream::connect(addr).unwrap();
        let head = format!(
            "{} {} HTTP/1.1\r\nHost: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            method,
            target,
            addr,
            body.len()
        );
        stream.write_all(head.as_bytes()).unwrap();
        // The server may answer and close before reading an oversized body
        let _ = stream.write_all(body);

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).unwrap();
        parse_reply(&raw)
    }

    fn parse_reply(raw: &[u8]) -> HttpReply {
        let split = raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("response has no header terminator");
        let head = String::from_utf8_lossy(&raw[..split]).into_owned();
        let mut lines = head.split("\r\n");

        let status_line = lines.next().unwrap();
        let status = status_line.split(' ').nth(1).unwrap().parse().unwrap();
        let headers = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();

        HttpReply {
            status,
            headers,
            body: raw[split + 4..].to_vec(),
        }
    }

    #[test]
    fn test_index_page_served() {
        let addr = start(ConversionConfig::upload());
        let reply = request(addr, "GET", "/", b"");

        assert_eq!(reply.status, 200);
        assert!(reply.header("Content-Type").unwrap().starts_with("text/html"));
        assert!(reply.text().contains("<form") || reply.text().contains("/convert"));
    }

    #[test]
    fn test_csv_upload_to_json() {
        let config = ConversionConfig::upload().with_indent_size(0).unwrap();
        let addr = start(config);
        let reply = request(
            addr,
            "POST",
            "/convert?from=csv&to=json&filename=people.csv",
            b"name,age\nAda,36\nLin,29\n",
        );

        assert_eq!(reply.status, 200);
        assert_eq!(reply.header("Content-Type"), Some("application/json"));
        assert_eq!(
            reply.header("Content-Disposition"),
            Some("attachment; filename=\"people.json\"")
        );
        assert_eq!(
            reply.text(),
            r#"[{"name":"Ada","age":"36"},{"name":"Lin","age":"29"}]"#
        );
    }

    #[test]
    fn test_json_upload_to_xlsx() {
        let addr = start(ConversionConfig::upload());
        let reply = request(addr, "POST", "/convert?from=json&to=xlsx", br#"[{"a": 1}]"#);

        assert_eq!(reply.status, 200);
        assert_eq!(
            reply.header("Content-Type"),
            Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
        );
        assert_eq!(
            reply.header("Content-Disposition"),
            Some("attachment; filename=\"converted.xlsx\"")
        );
        assert!(reply.body.starts_with(b"PK"));
    }

    #[test]
    fn test_unsupported_format_is_json_error() {
        let addr = start(ConversionConfig::upload());
        let reply = request(addr, "POST", "/convert?from=csv&to=yaml", b"a\n1\n");

        assert_eq!(reply.status, 400);
        assert_eq!(reply.header("Content-Type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_slice(&reply.body).unwrap();
        assert!(body["error"].as_str().unwrap().contains("yaml"));
    }

    #[test]
    fn test_empty_body_rejected() {
        let addr = start(ConversionConfig::upload());
        let reply = request(addr, "POST", "/convert?from=csv&to=json", b"");

        assert_eq!(reply.status, 400);
        let body: serde_json::Value = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(body["error"], "No data provided.");
    }

    #[test]
    fn test_oversized_upload_rejected() {
        let addr = start(ConversionConfig::upload().with_max_input_size(16));
        let reply = request(
            addr,
            "POST",
            "/convert?from=csv&to=json",
            b"name,age\nAda,36\nLin,29\nBo,41\n",
        );

        assert_eq!(reply.status, 413);
    }

    #[test]
    fn test_unknown_path_and_method() {
        let addr = start(ConversionConfig::upload());
        assert_eq!(request(addr, "GET", "/nope", b"").status, 404);
        assert_eq!(request(addr, "GET", "/convert", b"").status, 405);
    }
}
