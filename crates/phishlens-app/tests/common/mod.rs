//! Shared fixtures for app integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use phishlens_analysis_contract::PredictRequest;
use phishlens_app::AnalysisSession;
use phishlens_client::{ClientError, PredictClient, PredictTransport, RawResponse};
use url::Url;

/// Canned reply for one transport call.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Backend answers with status and body.
    Reply(u16, &'static str),
    /// No response is received.
    Unreachable,
    /// Transport panics mid-request.
    Panic,
}

/// Transport that replays scripted replies and records submitted URLs.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Scripted>>,
    submitted: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    /// Creates a transport answering calls in order.
    #[allow(dead_code)]
    pub fn new(replies: impl IntoIterator<Item = Scripted>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            submitted: Mutex::new(Vec::new()),
        })
    }

    /// URLs sent so far.
    #[allow(dead_code)]
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().expect("submitted lock should work").clone()
    }

    fn next(&self) -> Result<RawResponse, ClientError> {
        let next = self
            .replies
            .lock()
            .expect("replies lock should work")
            .pop_front()
            .expect("transport called more often than scripted");

        match next {
            Scripted::Reply(status, body) => Ok(RawResponse {
                status,
                body: body.to_string(),
            }),
            Scripted::Unreachable => Err(ClientError::Transport("connection refused".to_string())),
            Scripted::Panic => panic!("scripted transport panic"),
        }
    }
}

impl PredictTransport for ScriptedTransport {
    fn post_json(
        &self,
        _endpoint: &Url,
        request: &PredictRequest,
    ) -> Result<RawResponse, ClientError> {
        self.submitted
            .lock()
            .expect("submitted lock should work")
            .push(request.url.clone());
        self.next()
    }

    fn get(&self, _endpoint: &Url) -> Result<RawResponse, ClientError> {
        self.next()
    }
}

/// Builds a session over `transport`.
#[allow(dead_code)]
pub fn session(transport: &Arc<ScriptedTransport>) -> AnalysisSession {
    let client = PredictClient::new("http://127.0.0.1:5000", transport.clone())
        .expect("client should build");
    AnalysisSession::new(client)
}

/// Full phishing reply.
#[allow(dead_code)]
pub const PHISHING_BODY: &str = r#"{
    "url": "http://paypa1-login.example/verify",
    "result": "Phishing",
    "probability": 0.8734,
    "reasons": ["Suspicious TLD", "Login form on new domain"],
    "features": {"URLLength": 75, "IsHTTPS": 0, "Entropy": 4.1234},
    "domain_info": {"registrar": "NameCheap", "org": null, "country": "IS", "creation_date": "2024-01-02"},
    "dns_info": {"A": ["203.0.113.7", "203.0.113.8", "203.0.113.9"], "MX": []},
    "site_data": {"title": "Verify your account", "server_header": "nginx", "has_login_form": true}
}"#;

/// Minimal safe reply.
#[allow(dead_code)]
pub const SAFE_MINIMAL_BODY: &str = r#"{"result":"Safe","probability":0.02,"features":{}}"#;
