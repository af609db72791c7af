//! Turns one action descriptor into a concrete invocation.

use std::sync::LazyLock;

use ai_plan::{ActionDescriptor, ActionKind, Argument, ResidualQueue};
use regex::Regex;

use crate::env::{CycleEnv, KnowledgeStore, ProcedureHandle, ProcedureValue};
use crate::error::PsiResult;
use crate::keys::UTTERANCE_SENTENCES;
use crate::store::AtomKind;

/// Scripted function answered by the language-comprehension collaborator directly.
pub const ANSWER_QUESTION: &str = "answer_question";

static RE_LISTENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"TO\s*:\s*([^,\s]*)[\s|,]*").unwrap());
static RE_CONTENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"CONTENT\s*:\s*(.*)").unwrap());

/// `(listener, content)` of a produced sentence such as `"TO: bob, CONTENT: hello"`.
///
/// The listener defaults to empty; a sentence without content yields `None`.
pub fn parse_utterance(sentence: &str) -> Option<(String, String)> {
    let listener = RE_LISTENER
        .captures(sentence)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let content = RE_CONTENT
        .captures(sentence)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or_default();

    if content.is_empty() {
        return None;
    }
    Some((listener, content.to_string()))
}

/// `( name arg... )` with numbers as literals and text quoted.
pub fn script_expression(name: &str, arguments: &[Argument]) -> String {
    let mut expression = format!("( {name}");
    for argument in arguments {
        expression.push(' ');
        match argument {
            Argument::Number(n) => expression.push_str(&n.to_string()),
            Argument::Text(s) => {
                expression.push('"');
                for c in s.chars() {
                    if c == '"' || c == '\\' {
                        expression.push('\\');
                    }
                    expression.push(c);
                }
                expression.push('"');
            }
        }
    }
    expression.push_str(" )");
    expression
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ActionDispatcher;

impl ActionDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Execute `action`; returns the engine handle when it was submitted asynchronously.
    ///
    /// Speech acts and scripted functions complete synchronously and never produce a handle;
    /// their evaluation errors are logged, not returned. After any dispatch, sentences queued in
    /// the utterance store become `say` actions placed ahead of the remaining plan.
    pub fn dispatch(
        &self,
        action: &ActionDescriptor,
        env: &mut CycleEnv<'_>,
        queue: &mut ResidualQueue,
        cycle: u64,
    ) -> PsiResult<Option<ProcedureHandle>> {
        tracing::debug!(cycle, action = %action, "Executing action");

        let submitted = match action.kind {
            ActionKind::SpeechAct => {
                let expression = script_expression(&action.name, &action.arguments);
                self.evaluate(&expression, env, cycle);
                Ok(None)
            }
            ActionKind::ScriptedFunction if action.name == ANSWER_QUESTION => {
                if let Err(err) = env.language.resolve_latest_sentence_reference(&mut *env.store) {
                    tracing::error!(cycle, error = %err, "Failed to resolve latest sentence reference");
                }
                if let Err(err) = env.language.answer_question(&mut *env.store) {
                    tracing::error!(cycle, error = %err, "Failed to answer question");
                }
                Ok(None)
            }
            ActionKind::ScriptedFunction => {
                let expression = script_expression(&action.name, &action.arguments);
                self.evaluate(&expression, env, cycle);
                Ok(None)
            }
            ActionKind::ProcedureCall => {
                let args = action
                    .arguments
                    .iter()
                    .map(|arg| match arg {
                        Argument::Number(n) => ProcedureValue::Number(*n),
                        Argument::Text(s) => ProcedureValue::Text(s.clone()),
                    })
                    .collect();
                env.engine.run_procedure(&action.name, args).map(|handle| {
                    tracing::debug!(cycle, action = %action, schema = %handle, "Running action");
                    Some(handle)
                })
            }
        };

        let says = take_utterances(&mut *env.store);
        if !says.is_empty() {
            for say in &says {
                tracing::debug!(cycle, action = %say, "Generated say action");
            }
            queue.push_front_actions(says);
        }

        submitted
    }

    fn evaluate(&self, expression: &str, env: &mut CycleEnv<'_>, cycle: u64) {
        match env.evaluator.eval(expression, &mut *env.store) {
            Ok(_) => tracing::debug!(cycle, expression, "Evaluated script"),
            Err(err) => tracing::error!(cycle, expression, error = %err, "Failed to execute script"),
        }
    }
}

/// Drain the utterance store into `say` actions, in store order.
fn take_utterances(store: &mut dyn KnowledgeStore) -> Vec<ActionDescriptor> {
    let Some(list) = store.reference(UTTERANCE_SENTENCES) else {
        return Vec::new();
    };

    let says: Vec<ActionDescriptor> = store
        .outgoing(list)
        .iter()
        .filter_map(|&sentence| store.name(sentence))
        .filter_map(parse_utterance)
        .map(|(listener, content)| ActionDescriptor::say(listener, content))
        .collect();

    let empty = store.add_link(AtomKind::ListLink, &[]);
    store.set_reference(UTTERANCE_SENTENCES, empty);
    says
}
