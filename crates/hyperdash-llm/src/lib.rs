// Copyright 2026 HyperDash Contributors
// Licensed under the Apache License, Version 2.0

//! Blocking client for the one live external dependency: an
//! OpenAI-compatible text-generation API used for chat, company summaries,
//! and email-risk verdicts. Everything above [`complete_or_fallback`] sees
//! either the model's reply or a fixed apology string, never an error.

use anyhow::{Context, Result, anyhow, bail};
use hyperdash_app::Company;
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, Response};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Lines};
use std::time::Duration;

/// What the UI renders when the provider is unreachable, unauthenticated,
/// or disabled. Callers never branch on failure; they render this string.
pub const FALLBACK_REPLY: &str =
    "Sorry, the AI assistant is unavailable right now. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamChunk {
    pub content: String,
    pub done: bool,
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("llm.base_url must not be empty");
        }
        if model.trim().is_empty() {
            bail!("llm.model must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            model: model.to_owned(),
            api_key: api_key
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(ToOwned::to_owned),
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn post(&self, path: &str) -> reqwest::blocking::RequestBuilder {
        let mut request = self.http.post(format!("{}{path}", self.base_url));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        request
    }

    pub fn list_models(&self) -> Result<Vec<String>> {
        let mut request = self.http.get(format!("{}/models", self.base_url));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let parsed: ModelsResponse = response.json().context("decode model list")?;
        Ok(parsed.data.into_iter().map(|model| model.id).collect())
    }

    /// Startup check used by `hyperdash --check`: the endpoint answers and
    /// knows the configured model.
    pub fn ping(&self) -> Result<()> {
        let models = self.list_models()?;
        let exists = models
            .iter()
            .any(|name| name == &self.model || name.starts_with(&format!("{}:", self.model)));
        if !exists {
            bail!(
                "model {:?} not offered by {}; pick one of the provider's models in [llm].model",
                self.model,
                self.base_url
            );
        }
        Ok(())
    }

    pub fn chat_complete(&self, messages: &[Message]) -> Result<String> {
        let request = ChatRequest::new(&self.model, messages, false);
        let response = self
            .post("/chat/completions")
            .json(&request)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let parsed: ChatCompletionResponse = response.json().context("decode chat response")?;
        let content = parsed
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow!("no choices in chat response"))?;
        Ok(content)
    }

    pub fn chat_stream(&self, messages: &[Message]) -> Result<ChatStream> {
        let request = ChatRequest::new(&self.model, messages, true);
        let response = self
            .post("/chat/completions")
            .json(&request)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        Ok(ChatStream {
            done: false,
            lines: BufReader::new(response).lines(),
        })
    }
}

/// The degradation boundary: absent client (LLM disabled or no
/// credentials) or any provider failure becomes [`FALLBACK_REPLY`].
pub fn complete_or_fallback(client: Option<&Client>, messages: &[Message]) -> String {
    match client {
        Some(client) => client
            .chat_complete(messages)
            .unwrap_or_else(|_| FALLBACK_REPLY.to_owned()),
        None => FALLBACK_REPLY.to_owned(),
    }
}

pub struct ChatStream {
    done: bool,
    lines: Lines<BufReader<Response>>,
}

impl Iterator for ChatStream {
    type Item = Result<StreamChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Ok(line)) => line,
                Some(Err(error)) => {
                    self.done = true;
                    return Some(Err(error).context("read stream"));
                }
            };

            let trimmed = line.trim();
            if !trimmed.starts_with("data: ") {
                continue;
            }

            let payload = trimmed.trim_start_matches("data: ");
            if payload == "[DONE]" {
                self.done = true;
                return Some(Ok(StreamChunk {
                    content: String::new(),
                    done: true,
                }));
            }

            let chunk: ChatCompletionChunk = match serde_json::from_str(payload) {
                Ok(chunk) => chunk,
                Err(error) => {
                    self.done = true;
                    return Some(Err(error).context("decode stream chunk"));
                }
            };

            let Some(choice) = chunk.choices.into_iter().next() else {
                continue;
            };

            let content = choice.delta.content.unwrap_or_default();
            let done = choice.finish_reason.is_some();
            if done {
                self.done = true;
            }

            if content.is_empty() && !done {
                continue;
            }

            return Some(Ok(StreamChunk { content, done }));
        }
    }
}

/// Persona prompt for the dashboard chat view.
pub fn build_chat_prompt(extra_context: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(
        "You are the HyperDash assistant, a concise helper inside a CRM dashboard. \
         Answer questions about prospecting, lead qualification, and outreach. \
         Keep answers short and do not invent data about the user's workspace.\n",
    );
    if let Some(context) = extra_context
        && !context.is_empty()
    {
        out.push_str("\n## Additional context\n\n");
        out.push_str(context);
        out.push('\n');
    }
    out
}

/// Two-sentence firmographic summary request for the companies view.
pub fn build_company_summary_prompt(company: &Company) -> String {
    format!(
        "Summarize the following company in at most two sentences for a sales rep.\n\n\
         Name: {}\nDomain: {}\nIndustry: {}\nEmployees: {}\nLocation: {}\n",
        company.name,
        company.domain,
        company.industry.as_str(),
        company.employees,
        company.location,
    )
}

/// Email-risk verdict request for the verifier view. The model must answer
/// with one of the three verdict words plus a one-line reason.
pub fn build_email_risk_prompt(email: &str) -> String {
    format!(
        "Assess the deliverability risk of this email address: {email}\n\n\
         Reply with exactly one verdict word on the first line -- \
         deliverable, risky, or undeliverable -- followed by a one-line reason. \
         Treat free-mail and catch-all domains as risky.\n"
    )
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        anyhow!("request to {base_url} timed out; raise [llm].timeout or check the provider")
    } else if error.is_connect() {
        anyhow!("cannot reach {base_url}; check [llm].base_url and that the provider is up")
    } else {
        anyhow::Error::new(error).context(format!("request to {base_url} failed"))
    }
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return anyhow!("provider rejected credentials ({status}); set [llm].api_key");
    }

    let detail = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no response body".to_owned()
            } else {
                trimmed.chars().take(200).collect()
            }
        });
    anyhow!("provider returned {status}: {detail}")
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, messages: &'a [Message], stream: bool) -> Self {
        Self {
            model,
            messages: messages
                .iter()
                .map(|message| WireMessage {
                    role: message.role.as_str(),
                    content: &message.content,
                })
                .collect(),
            stream,
        }
    }
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
