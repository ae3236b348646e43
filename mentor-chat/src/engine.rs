//! The answer orchestrator: retrieve → assemble context → build prompt →
//! complete → record the turn.

use std::sync::Arc;

use tracing::{info, warn};

use mentor_model::chat::{ChatMessage, ChatModel, ChatRequest, GenerateOptions};
use mentor_rag::context::{AssemblerConfig, ContextAssembler};
use mentor_rag::embedding::EmbeddingProvider;
use mentor_rag::index::VectorIndex;

use crate::memory::{ConversationMemory, ConversationTurn, TurnRole};
use crate::prompt;

/// Raw turns fed to the model alongside the textual recap.
const RECENT_TURNS: usize = 8;

/// Sampling temperature for answers.
const TEMPERATURE: f32 = 0.3;

/// Output token cap per answer.
const MAX_OUTPUT_TOKENS: u32 = 512;

/// A single-conversation Q&A engine over one loaded index.
///
/// The engine owns the conversation state; whatever layer manages
/// session lifecycle creates one engine per conversation and passes
/// questions in. [`ask`](ChatEngine::ask) always yields an answer
/// string; retrieval and completion failures degrade, they never
/// surface as errors.
pub struct ChatEngine {
    index: VectorIndex,
    embedder: Arc<dyn EmbeddingProvider>,
    model: Arc<dyn ChatModel>,
    assembler: ContextAssembler,
    memory: ConversationMemory,
}

impl ChatEngine {
    /// Create an engine with default assembly configuration and empty
    /// memory.
    pub fn new(
        index: VectorIndex,
        embedder: Arc<dyn EmbeddingProvider>,
        model: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            index,
            embedder,
            model,
            assembler: ContextAssembler::new(AssemblerConfig::default()),
            memory: ConversationMemory::new(),
        }
    }

    /// Replace the context assembly configuration.
    pub fn with_assembler_config(mut self, config: AssemblerConfig) -> Self {
        self.assembler = ContextAssembler::new(config);
        self
    }

    /// Replace the conversation memory (e.g. a different history cap).
    pub fn with_memory(mut self, memory: ConversationMemory) -> Self {
        self.memory = memory;
        self
    }

    /// Number of chunks in the loaded index, the transport layer's
    /// "status" answer.
    pub fn index_len(&self) -> usize {
        self.index.len()
    }

    /// All recorded turns, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.memory.turns()
    }

    /// Forget the conversation so far.
    pub fn clear_history(&mut self) {
        self.memory.clear();
    }

    /// Answer one question.
    ///
    /// Empty or whitespace-only questions are the transport layer's
    /// problem; the engine assumes a real question. The turn is recorded
    /// whether or not the completion succeeded, so a degraded answer
    /// still shows up in history.
    pub async fn ask(&mut self, question: &str) -> String {
        let context = match self
            .assembler
            .assemble(question, &self.index, self.embedder.as_ref())
            .await
        {
            Ok(context) => context,
            Err(e) => {
                warn!(error = %e, "context assembly failed, answering without context");
                None
            }
        };

        let recap = self.memory.summary();
        let user_prompt = match &context {
            Some(context) => prompt::grounded(question, context, &recap),
            None => prompt::ungrounded(question, &recap),
        };

        let mut messages = vec![ChatMessage::system(prompt::SYSTEM_PERSONA)];
        for turn in self.memory.recent(RECENT_TURNS) {
            messages.push(match turn.role {
                TurnRole::User => ChatMessage::user(turn.content.as_str()),
                TurnRole::Assistant => ChatMessage::assistant(turn.content.as_str()),
            });
        }
        messages.push(ChatMessage::user(user_prompt));

        let request = ChatRequest {
            messages,
            options: GenerateOptions {
                temperature: Some(TEMPERATURE),
                max_output_tokens: Some(MAX_OUTPUT_TOKENS),
            },
        };

        let answer = match self.model.complete(request).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "completion failed, returning degraded answer");
                format!(
                    "// Completion failed: {e}\n\
                     // Your question stays in the conversation; try again or rephrase."
                )
            }
        };

        info!(grounded = context.is_some(), answer_chars = answer.len(), "answered question");
        self.memory.append(question, &answer);
        answer
    }
}
