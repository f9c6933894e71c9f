//! Firebase Realtime Database over its REST interface.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::sse::{EventParser, StreamEvent};
use crate::traits::{RealtimeStore, SnapshotCallback};
use crate::{path, tree, StoreError, StoreResult, Subscription};

/// Client for one database instance, e.g.
/// `https://<project>-default-rtdb.firebaseio.com/`.
#[derive(Debug, Clone)]
pub struct FirebaseStore {
    client: Client,
    database_url: Url,
    auth: Option<String>,
    shutdown: CancellationToken,
}

/// Response to a push: `{"name": "<generated key>"}`.
#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

impl FirebaseStore {
    pub fn new(database_url: &str, auth: Option<String>) -> StoreResult<Self> {
        let invalid = |reason: String| StoreError::InvalidUrl {
            url: database_url.to_owned(),
            reason,
        };
        let mut url = Url::parse(database_url).map_err(|error| invalid(error.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            database_url: url,
            auth,
            shutdown: CancellationToken::new(),
        })
    }

    fn endpoint(&self, keys: &[&str]) -> StoreResult<Url> {
        // "./" keeps a key containing ':' from being read as a url scheme
        let relative = format!("./{}.json", keys.join("/"));
        self.database_url
            .join(&relative)
            .map_err(|_| StoreError::InvalidPath {
                path: keys.join("/"),
                reason: "cannot be joined to the database url",
            })
    }

    fn request(&self, method: Method, keys: &[&str]) -> StoreResult<RequestBuilder> {
        if self.shutdown.is_cancelled() {
            return Err(StoreError::Closed);
        }
        let mut request = self.client.request(method, self.endpoint(keys)?);
        if let Some(auth) = &self.auth {
            request = request.query(&[("auth", auth)]);
        }
        Ok(request)
    }
}

async fn check_status(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl RealtimeStore for FirebaseStore {
    async fn set(&self, path: &str, value: Value) -> StoreResult<()> {
        let keys = path::segments(path)?;
        let response = self
            .request(Method::PUT, &keys)?
            .query(&[("print", "silent")])
            .json(&value)
            .send()
            .await?;
        check_status(response).await?;
        tracing::debug!(path, "value written");
        Ok(())
    }

    async fn push(&self, path: &str, value: Value) -> StoreResult<String> {
        let keys = path::segments(path)?;
        let response = self.request(Method::POST, &keys)?.json(&value).send().await?;
        let body = check_status(response).await?.bytes().await?;
        let PushResponse { name } = serde_json::from_slice(&body)?;
        tracing::debug!(path, key = %name, "value pushed");
        Ok(name)
    }

    async fn subscribe(&self, path: &str, callback: SnapshotCallback) -> StoreResult<Subscription> {
        let keys = path::segments(path)?;
        let response = self
            .request(Method::GET, &keys)?
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;
        let response = check_status(response).await?;

        let token = self.shutdown.child_token();
        let listener_token = token.clone();
        let owned_path = path.to_owned();
        tokio::spawn(async move {
            tokio::select! {
                _ = listener_token.cancelled() => {
                    tracing::debug!(path = %owned_path, "subscription stream closed");
                }
                result = listen(response, callback) => match result {
                    Ok(()) => tracing::warn!(path = %owned_path, "subscription stream ended by the server"),
                    Err(error) => tracing::error!(path = %owned_path, %error, "subscription stream failed"),
                },
            }
        });

        Ok(Subscription::new(path, move || token.cancel()))
    }

    async fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

/// Follows the event stream, keeping a local copy of the subscribed value
/// and handing the whole of it to `callback` after every change.
async fn listen(response: Response, callback: SnapshotCallback) -> StoreResult<()> {
    let mut stream = response.bytes_stream();
    let mut parser = EventParser::default();
    let mut snapshot = Value::Null;
    while let Some(chunk) = stream.next().await {
        for raw in parser.feed(&chunk?) {
            match StreamEvent::from_raw(&raw)? {
                Some(StreamEvent::Put { path, data }) => {
                    tree::set(&mut snapshot, &path::split(&path), data);
                }
                Some(StreamEvent::Patch { path, data }) => {
                    tree::update(&mut snapshot, &path::split(&path), data);
                }
                Some(StreamEvent::KeepAlive) | None => continue,
            }
            callback(snapshot.clone());
        }
    }
    Ok(())
}
