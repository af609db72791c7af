use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name of the synthesized speech act emitted for each queued utterance.
pub const SAY_ACTION: &str = "say";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ActionKind {
    /// Runs a speech-act schema through the scripting evaluator.
    SpeechAct,
    /// Synchronous call into the scripting evaluator.
    ScriptedFunction,
    /// Asynchronous procedure submitted to the procedure engine.
    ProcedureCall,
}

impl ActionKind {
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::SpeechAct => "speech_act",
            ActionKind::ScriptedFunction => "scripted",
            ActionKind::ProcedureCall => "procedure",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Argument {
    Number(f64),
    Text(String),
}

impl Argument {
    pub fn text(value: impl Into<String>) -> Self {
        Argument::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Argument::Text(s) => Some(s),
            Argument::Number(_) => None,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Number(n) => write!(f, "{n}"),
            Argument::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// One invocable action, as found at a plan-tree leaf.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionDescriptor {
    pub kind: ActionKind,
    pub name: String,
    pub arguments: Vec<Argument>,
}

impl ActionDescriptor {
    pub fn new(kind: ActionKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn procedure(name: impl Into<String>) -> Self {
        Self::new(ActionKind::ProcedureCall, name)
    }

    pub fn scripted(name: impl Into<String>) -> Self {
        Self::new(ActionKind::ScriptedFunction, name)
    }

    pub fn speech_act(name: impl Into<String>) -> Self {
        Self::new(ActionKind::SpeechAct, name)
    }

    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_arguments(mut self, arguments: impl IntoIterator<Item = Argument>) -> Self {
        self.arguments.extend(arguments);
        self
    }

    /// The speech act that says `content` to `listener`.
    pub fn say(listener: impl Into<String>, content: impl Into<String>) -> Self {
        Self::speech_act(SAY_ACTION)
            .with_argument(Argument::Text(content.into()))
            .with_argument(Argument::Text(listener.into()))
    }

    /// `(listener, content)` when this is a synthesized `say` action.
    pub fn utterance(&self) -> Option<(&str, &str)> {
        if self.kind != ActionKind::SpeechAct || self.name != SAY_ACTION {
            return None;
        }
        match self.arguments.as_slice() {
            [Argument::Text(content), Argument::Text(listener)] => {
                Some((listener.as_str(), content.as_str()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ") [{}]", self.kind.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn say_round_trips_listener_and_content() {
        let say = ActionDescriptor::say("bob", "hello");
        assert_eq!(say.kind, ActionKind::SpeechAct);
        assert_eq!(say.name, SAY_ACTION);
        assert_eq!(say.utterance(), Some(("bob", "hello")));
    }

    #[test]
    fn utterance_is_none_for_other_actions() {
        let walk = ActionDescriptor::procedure("say")
            .with_argument(Argument::text("x"))
            .with_argument(Argument::text("y"));
        assert_eq!(walk.utterance(), None);
        assert_eq!(ActionDescriptor::speech_act("say").utterance(), None);
    }

    #[test]
    fn display_lists_arguments() {
        let a = ActionDescriptor::procedure("goto_obj")
            .with_argument(Argument::text("ball"))
            .with_argument(Argument::Number(2.5));
        assert_eq!(a.to_string(), "goto_obj(\"ball\", 2.5) [procedure]");
    }
}
