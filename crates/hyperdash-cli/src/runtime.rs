// Copyright 2026 HyperDash Contributors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use hyperdash_app::Company;
use hyperdash_llm::{
    Client, FALLBACK_REPLY, Message, build_chat_prompt, build_company_summary_prompt,
    build_email_risk_prompt, complete_or_fallback,
};
use hyperdash_tui::{ChatEntry, ChatEvent, ChatRole, InternalEvent};
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;

/// Runtime backing the TUI: wraps an optional LLM client and the transcript
/// file. Without a client every AI surface answers with the fallback string,
/// so the app works offline end to end.
pub struct LlmRuntime {
    client: Option<Client>,
    extra_context: String,
    transcript_path: PathBuf,
}

impl LlmRuntime {
    pub fn new(client: Option<Client>, extra_context: &str, transcript_path: PathBuf) -> Self {
        Self {
            client,
            extra_context: extra_context.to_owned(),
            transcript_path,
        }
    }

    pub fn default_transcript_path() -> Result<PathBuf> {
        let data_root = dirs::data_dir()
            .ok_or_else(|| anyhow!("cannot resolve data directory for the chat transcript"))?;
        Ok(data_root.join("hyperdash").join("chat.json"))
    }

    fn chat_messages(&self, history: &[ChatEntry]) -> Vec<Message> {
        let context = if self.extra_context.is_empty() {
            None
        } else {
            Some(self.extra_context.as_str())
        };
        let mut messages = vec![Message::system(build_chat_prompt(context))];
        for entry in history {
            messages.push(match entry.role {
                ChatRole::User => Message::user(entry.body.clone()),
                ChatRole::Assistant => Message::assistant(entry.body.clone()),
            });
        }
        messages
    }
}

impl hyperdash_tui::AppRuntime for LlmRuntime {
    fn chat_reply(&mut self, history: &[ChatEntry]) -> String {
        let messages = self.chat_messages(history);
        complete_or_fallback(self.client.as_ref(), &messages)
    }

    fn company_summary(&mut self, company: &Company) -> String {
        let messages = vec![Message::user(build_company_summary_prompt(company))];
        complete_or_fallback(self.client.as_ref(), &messages)
    }

    fn email_risk(&mut self, email: &str) -> String {
        let messages = vec![Message::user(build_email_risk_prompt(email))];
        complete_or_fallback(self.client.as_ref(), &messages)
    }

    fn load_transcript(&mut self) -> Result<Vec<ChatEntry>> {
        if !self.transcript_path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.transcript_path).with_context(|| {
            format!("read chat transcript {}", self.transcript_path.display())
        })?;
        serde_json::from_str(&raw).with_context(|| {
            format!(
                "decode chat transcript {}; delete the file to start fresh",
                self.transcript_path.display()
            )
        })
    }

    fn save_transcript(&mut self, transcript: &[ChatEntry]) -> Result<()> {
        if let Some(parent) = self.transcript_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create transcript directory {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(transcript).context("encode chat transcript")?;
        fs::write(&self.transcript_path, raw).with_context(|| {
            format!("write chat transcript {}", self.transcript_path.display())
        })
    }

    /// Streams the reply off the input thread so the transcript fills in as
    /// chunks arrive. Any stream failure collapses into the fallback string.
    fn spawn_chat_reply(
        &mut self,
        request_id: u64,
        history: &[ChatEntry],
        tx: Sender<InternalEvent>,
    ) {
        let Some(client) = self.client.clone() else {
            let _ = tx.send(InternalEvent::Chat(ChatEvent::Completed {
                request_id,
                body: FALLBACK_REPLY.to_owned(),
            }));
            return;
        };
        let messages = self.chat_messages(history);

        thread::spawn(move || {
            let mut body = String::new();
            match client.chat_stream(&messages) {
                Ok(stream) => {
                    for chunk in stream {
                        match chunk {
                            Ok(chunk) => {
                                if !chunk.content.is_empty() {
                                    body.push_str(&chunk.content);
                                    let _ = tx.send(InternalEvent::Chat(ChatEvent::Chunk {
                                        request_id,
                                        content: chunk.content,
                                    }));
                                }
                                if chunk.done {
                                    break;
                                }
                            }
                            Err(_) => {
                                body = FALLBACK_REPLY.to_owned();
                                break;
                            }
                        }
                    }
                    if body.is_empty() {
                        body = FALLBACK_REPLY.to_owned();
                    }
                }
                Err(_) => body = FALLBACK_REPLY.to_owned(),
            }
            let _ = tx.send(InternalEvent::Chat(ChatEvent::Completed { request_id, body }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::LlmRuntime;
    use anyhow::Result;
    use hyperdash_llm::FALLBACK_REPLY;
    use hyperdash_tui::{AppRuntime, ChatEntry, ChatEvent, InternalEvent};
    use std::sync::mpsc;

    fn offline_runtime(path: std::path::PathBuf) -> LlmRuntime {
        LlmRuntime::new(None, "", path)
    }

    #[test]
    fn offline_runtime_answers_every_surface_with_fallback() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let mut runtime = offline_runtime(temp.path().join("chat.json"));

        assert_eq!(runtime.chat_reply(&[ChatEntry::user("hi")]), FALLBACK_REPLY);
        assert_eq!(runtime.email_risk("jo@acme.example.com"), FALLBACK_REPLY);
        Ok(())
    }

    #[test]
    fn offline_spawn_reports_a_single_fallback_completion() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let mut runtime = offline_runtime(temp.path().join("chat.json"));
        let (tx, rx) = mpsc::channel();

        runtime.spawn_chat_reply(7, &[ChatEntry::user("hi")], tx);
        match rx.recv()? {
            InternalEvent::Chat(ChatEvent::Completed { request_id, body }) => {
                assert_eq!(request_id, 7);
                assert_eq!(body, FALLBACK_REPLY);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn transcript_round_trips_through_the_filesystem() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let mut runtime = offline_runtime(temp.path().join("nested").join("chat.json"));

        assert!(runtime.load_transcript()?.is_empty());

        let transcript = vec![
            ChatEntry::user("what is a good outreach cadence?"),
            ChatEntry::assistant("two touches a week"),
        ];
        runtime.save_transcript(&transcript)?;
        assert_eq!(runtime.load_transcript()?, transcript);
        Ok(())
    }

    #[test]
    fn corrupt_transcript_is_reported_with_the_path() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("chat.json");
        std::fs::write(&path, "not json")?;
        let mut runtime = offline_runtime(path);

        let error = runtime
            .load_transcript()
            .expect_err("corrupt transcript should fail");
        assert!(error.to_string().contains("chat.json"));
        Ok(())
    }
}
