use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Answers a single HTTP request with the given status and body, returning the
/// dictionary base url to use and the request head it received.
pub async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let n = socket.read(&mut buf).await.unwrap();
        let request = String::from_utf8_lossy(&buf[..n]).to_string();
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        request
    });
    (format!("http://{addr}/api/v2/entries/en"), handle)
}

pub fn entry(word: &str) -> String {
    serde_json::json!([{
        "word": word,
        "phonetic": "/wɜːd/",
        "meanings": [{
            "partOfSpeech": "noun",
            "definitions": [{ "definition": format!("The meaning of {word}.") }],
            "synonyms": []
        }]
    }])
    .to_string()
}
