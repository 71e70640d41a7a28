use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{BoxError, BoxFuture, HttpResponse, HttpTransport};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RecordedBody {
    Form(Vec<(String, String)>),
    Json(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedRequest {
    pub url: String,
    pub bearer_token: Option<String>,
    pub body: RecordedBody,
}

impl RecordedRequest {
    pub fn form_param(&self, key: &str) -> Option<&str> {
        match &self.body {
            RecordedBody::Form(params) => params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            RecordedBody::Json(_) => None,
        }
    }

    pub fn json(&self) -> Option<&serde_json::Value> {
        match &self.body {
            RecordedBody::Json(value) => Some(value),
            RecordedBody::Form(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Respond { status: u16, body: String },
    Fail(String),
}

/// Canned responses keyed by URL; every request is recorded.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug, Default)]
struct FakeTransportState {
    replies: HashMap<String, Reply>,
    requests: Vec<RecordedRequest>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, url: &str, status: u16, body: impl Into<String>) -> Self {
        self.state.lock().unwrap().replies.insert(
            url.to_owned(),
            Reply::Respond {
                status,
                body: body.into(),
            },
        );
        self
    }

    pub fn fail(self, url: &str, message: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .replies
            .insert(url.to_owned(), Reply::Fail(message.to_owned()));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, url: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.url == url)
            .collect()
    }

    fn record(&self, request: RecordedRequest) -> Result<HttpResponse, BoxError> {
        let mut state = self.state.lock().unwrap();
        let reply = state.replies.get(&request.url).cloned();
        let url = request.url.clone();
        state.requests.push(request);
        match reply {
            Some(Reply::Respond { status, body }) => Ok(HttpResponse { status, body }),
            Some(Reply::Fail(message)) => Err(message.into()),
            None => Err(format!("no canned reply for {url}").into()),
        }
    }
}

impl HttpTransport for FakeTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            self.record(RecordedRequest {
                url: url.to_owned(),
                bearer_token: None,
                body: RecordedBody::Form(params),
            })
        })
    }

    fn post_json<'a>(
        &'a self,
        url: &'a str,
        bearer_token: Option<&'a str>,
        body: serde_json::Value,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            self.record(RecordedRequest {
                url: url.to_owned(),
                bearer_token: bearer_token.map(str::to_owned),
                body: RecordedBody::Json(body),
            })
        })
    }
}
