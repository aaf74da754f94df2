use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, ClientBuilder};
use tracing::{debug, error};
use url::Url;

use crate::structs::{config::ChatConfig, errors::ChatError};

use super::{ChatRequest, ChatResponse};

/// Anything able to answer a chat message.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one message.
    ///
    /// `Ok` only for an OK status with a decodable body.
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError>;
}

/// The remote chat completion endpoint
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoint: Url,
}

impl HttpBackend {
    pub fn new(config: &ChatConfig) -> Result<Self, ChatError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = ClientBuilder::new().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder.build().map_err(ChatError::Client)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(ChatError::Unreachable)?;

        let status = response.status();
        debug!("Chat endpoint answered {status}");

        if status.is_success() {
            return response.json().await.map_err(ChatError::Decode);
        }

        // Error bodies are best-effort: a garbled one still counts as a server error
        let body: ChatResponse = response.json().await.unwrap_or_default();
        error!(
            "Chat endpoint returned {status}: {}",
            body.error.as_deref().unwrap_or("<no error message>")
        );

        Err(ChatError::Server {
            status: status.as_u16(),
            message: body.error,
        })
    }
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
        net::TcpListener,
    };

    use super::*;

    /// Answer a single request on a local port with a canned response
    async fn serve_once(status: &'static str, body: &'static str) -> HttpBackend {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(stream);

            // Headers, then exactly content-length bytes of body
            let mut length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).await.unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut request = vec![0; length];
            reader.read_exact(&mut request).await.unwrap();

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });

        HttpBackend::new(&ChatConfig {
            endpoint: Url::parse(&format!("http://{address}/chat")).unwrap(),
            timeout: Some(5),
        })
        .unwrap()
    }

    fn hello() -> ChatRequest {
        ChatRequest {
            message: "Привет".into(),
            history: vec![],
            online: true,
        }
    }

    #[tokio::test]
    async fn ok_status_returns_the_message() {
        let backend = serve_once("200 OK", r#"{"message":"Здравствуйте"}"#).await;

        let response = backend.send(&hello()).await.unwrap();
        assert_eq!(response.message.as_deref(), Some("Здравствуйте"));
        assert_eq!(response.error, None);
    }

    #[tokio::test]
    async fn server_error_keeps_its_message() {
        let backend = serve_once("500 Internal Server Error", r#"{"error":"no key"}"#).await;

        match backend.send(&hello()).await {
            Err(ChatError::Server { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message.as_deref(), Some("no key"));
            }
            other => panic!("expected a server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_without_json_has_no_message() {
        let backend = serve_once("502 Bad Gateway", "<html>bad gateway</html>").await;

        assert!(matches!(
            backend.send(&hello()).await,
            Err(ChatError::Server {
                status: 502,
                message: None
            })
        ));
    }

    #[tokio::test]
    async fn garbled_ok_body_is_a_decode_error() {
        let backend = serve_once("200 OK", "not json at all").await;

        assert!(matches!(
            backend.send(&hello()).await,
            Err(ChatError::Decode(_))
        ));
    }

    #[test]
    fn builds_with_and_without_timeout() {
        let endpoint = Url::parse("http://127.0.0.1:8080/chat").unwrap();

        let plain = HttpBackend::new(&ChatConfig {
            endpoint: endpoint.clone(),
            timeout: None,
        })
        .unwrap();
        assert_eq!(plain.endpoint(), &endpoint);

        assert!(HttpBackend::new(&ChatConfig {
            endpoint,
            timeout: Some(10),
        })
        .is_ok());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let backend = HttpBackend::new(&ChatConfig {
            endpoint: Url::parse("http://127.0.0.1:9/chat").unwrap(),
            timeout: Some(5),
        })
        .unwrap();

        let request = ChatRequest {
            message: "Привет".into(),
            history: vec![],
            online: true,
        };

        assert!(matches!(
            backend.send(&request).await,
            Err(ChatError::Unreachable(_))
        ));
    }
}
