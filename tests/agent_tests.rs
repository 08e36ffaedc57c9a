use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dailysum::agent::SummaryAgent;
use dailysum::config::Config;
use dailysum::error::AgentError;

// ─── Mock MCP server ──────────────────────────────────────────────────
//
// Serves canned JSON-RPC responses over one connection per request and
// counts session DELETEs. `tools/list` advertises nothing, so a run gets a
// fully established session and then fails -- exactly the state needed to
// observe the disconnect behavior.

fn spawn_mock_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind mock server");
    let addr = listener.local_addr().unwrap();
    let deletes = Arc::new(AtomicUsize::new(0));
    let counter = deletes.clone();

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let counter = counter.clone();
            std::thread::spawn(move || handle_request(&mut stream, &counter));
        }
    });

    (format!("http://{addr}/"), deletes)
}

fn handle_request(stream: &mut TcpStream, deletes: &AtomicUsize) {
    let Some(request) = read_request(stream) else {
        return;
    };

    let (status, extra_header, body) = if request.starts_with("DELETE") {
        deletes.fetch_add(1, Ordering::SeqCst);
        ("200 OK", "", String::new())
    } else if request.contains("\"method\":\"notifications/initialized\"") {
        ("202 Accepted", "", String::new())
    } else if request.contains("\"method\":\"initialize\"") {
        (
            "200 OK",
            "Mcp-Session-Id: mock-session\r\n",
            r#"{"jsonrpc":"2.0","id":1,"result":{"serverInfo":{"name":"mock"}}}"#.to_string(),
        )
    } else if request.contains("\"method\":\"tools/list\"") {
        (
            "200 OK",
            "",
            r#"{"jsonrpc":"2.0","id":2,"result":{"tools":[]}}"#.to_string(),
        )
    } else {
        ("404 Not Found", "", String::new())
    };

    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n{extra_header}\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
}

fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(header_end) = find_header_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.trim().eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                return Some(String::from_utf8_lossy(&buf).to_string());
            }
        }
    }
    (!buf.is_empty()).then(|| String::from_utf8_lossy(&buf).to_string())
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn test_config() -> Config {
    Config {
        github_token: "ghp_test".to_string(),
        model_id: "openai/gpt-4o-mini".to_string(),
        company: None,
    }
}

// ============================================================
// Cleanup releases an established session exactly once
// ============================================================

#[tokio::test]
async fn test_cleanup_disconnects_established_session_exactly_once() {
    let (url, deletes) = spawn_mock_server();
    let mut agent = SummaryAgent::with_endpoint(test_config(), &url);

    // The mock advertises no usable tools, so the run fails only after the
    // MCP session is fully established.
    let err = agent.run("summarize my activity").await.unwrap_err();
    assert!(matches!(err, AgentError::McpProtocol(_)));
    assert!(agent.is_ready());
    assert_eq!(deletes.load(Ordering::SeqCst), 0);

    agent.cleanup().await.unwrap();
    assert!(!agent.is_ready());
    assert_eq!(deletes.load(Ordering::SeqCst), 1);

    // A second cleanup must not disconnect again.
    agent.cleanup().await.unwrap();
    assert!(!agent.is_ready());
    assert_eq!(deletes.load(Ordering::SeqCst), 1);
}

// ============================================================
// Failed connects leave nothing to release
// ============================================================

#[tokio::test]
async fn test_unreachable_endpoint_leaves_agent_uninitialized() {
    // Bind then drop the listener: the port has nothing listening.
    let url = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}/", listener.local_addr().unwrap())
    };

    let mut agent = SummaryAgent::with_endpoint(test_config(), &url);

    let err = agent.run("summarize my activity").await.unwrap_err();
    assert!(matches!(err, AgentError::McpUnavailable { .. }));
    assert!(!agent.is_ready());

    // Cleanup after a failed connect is a no-op.
    agent.cleanup().await.unwrap();
    assert!(!agent.is_ready());
}
