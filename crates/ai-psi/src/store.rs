//! In-memory knowledge store.

use std::collections::HashMap;

use ai_plan::Handle;

use crate::env::KnowledgeStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomKind {
    ConceptNode,
    PredicateNode,
    GroundedSchemaNode,
    SpeechActSchemaNode,
    NumberNode,
    SentenceNode,
    ObjectNode,

    ListLink,
    EvaluationLink,
    ExecutionLink,
    AndLink,
    SequentialAndLink,
    OrLink,
    ImplicationLink,
}

impl AtomKind {
    pub fn is_link(self) -> bool {
        matches!(
            self,
            AtomKind::ListLink
                | AtomKind::EvaluationLink
                | AtomKind::ExecutionLink
                | AtomKind::AndLink
                | AtomKind::SequentialAndLink
                | AtomKind::OrLink
                | AtomKind::ImplicationLink
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            AtomKind::ConceptNode => "ConceptNode",
            AtomKind::PredicateNode => "PredicateNode",
            AtomKind::GroundedSchemaNode => "GroundedSchemaNode",
            AtomKind::SpeechActSchemaNode => "SpeechActSchemaNode",
            AtomKind::NumberNode => "NumberNode",
            AtomKind::SentenceNode => "SentenceNode",
            AtomKind::ObjectNode => "ObjectNode",
            AtomKind::ListLink => "ListLink",
            AtomKind::EvaluationLink => "EvaluationLink",
            AtomKind::ExecutionLink => "ExecutionLink",
            AtomKind::AndLink => "AndLink",
            AtomKind::SequentialAndLink => "SequentialAndLink",
            AtomKind::OrLink => "OrLink",
            AtomKind::ImplicationLink => "ImplicationLink",
        }
    }
}

#[derive(Debug, Clone)]
struct Atom {
    kind: AtomKind,
    name: Option<String>,
    outgoing: Vec<Handle>,
    truth_mean: f64,
    sti: i64,
}

/// Hash-indexed atom table. Handles start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryStore {
    atoms: Vec<Atom>,
    nodes: HashMap<(AtomKind, String), Handle>,
    links: HashMap<(AtomKind, Vec<Handle>), Handle>,
    references: HashMap<String, Handle>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Accumulated salience of `handle`.
    pub fn sti(&self, handle: Handle) -> i64 {
        self.atom(handle).map(|a| a.sti).unwrap_or(0)
    }

    /// `ListLink` over `items`.
    pub fn add_list(&mut self, items: &[Handle]) -> Handle {
        self.add_link(AtomKind::ListLink, items)
    }

    fn atom(&self, handle: Handle) -> Option<&Atom> {
        let index = usize::try_from(handle.0).ok()?.checked_sub(1)?;
        self.atoms.get(index)
    }

    fn atom_mut(&mut self, handle: Handle) -> Option<&mut Atom> {
        let index = usize::try_from(handle.0).ok()?.checked_sub(1)?;
        self.atoms.get_mut(index)
    }

    fn insert(&mut self, kind: AtomKind, name: Option<String>, outgoing: Vec<Handle>) -> Handle {
        self.atoms.push(Atom {
            kind,
            name,
            outgoing,
            truth_mean: 0.0,
            sti: 0,
        });
        Handle(self.atoms.len() as u64)
    }
}

impl KnowledgeStore for MemoryStore {
    fn add_node(&mut self, kind: AtomKind, name: &str) -> Handle {
        debug_assert!(!kind.is_link(), "{} is not a node kind", kind.name());
        if let Some(handle) = self.find_node(kind, name) {
            return handle;
        }
        let handle = self.insert(kind, Some(name.to_string()), Vec::new());
        self.nodes.insert((kind, name.to_string()), handle);
        handle
    }

    fn add_link(&mut self, kind: AtomKind, outgoing: &[Handle]) -> Handle {
        debug_assert!(kind.is_link(), "{} is not a link kind", kind.name());
        if let Some(handle) = self.find_link(kind, outgoing) {
            return handle;
        }
        let handle = self.insert(kind, None, outgoing.to_vec());
        self.links.insert((kind, outgoing.to_vec()), handle);
        handle
    }

    fn find_node(&self, kind: AtomKind, name: &str) -> Option<Handle> {
        self.nodes.get(&(kind, name.to_string())).copied()
    }

    fn find_link(&self, kind: AtomKind, outgoing: &[Handle]) -> Option<Handle> {
        self.links.get(&(kind, outgoing.to_vec())).copied()
    }

    fn kind(&self, handle: Handle) -> Option<AtomKind> {
        self.atom(handle).map(|a| a.kind)
    }

    fn name(&self, handle: Handle) -> Option<&str> {
        self.atom(handle)?.name.as_deref()
    }

    fn outgoing(&self, handle: Handle) -> &[Handle] {
        self.atom(handle).map(|a| a.outgoing.as_slice()).unwrap_or(&[])
    }

    fn truth_mean(&self, handle: Handle) -> f64 {
        self.atom(handle).map(|a| a.truth_mean).unwrap_or(0.0)
    }

    fn set_truth_mean(&mut self, handle: Handle, mean: f64) {
        if let Some(atom) = self.atom_mut(handle) {
            atom.truth_mean = mean;
        }
    }

    fn stimulate(&mut self, handle: Handle, amount: i32) {
        if let Some(atom) = self.atom_mut(handle) {
            atom.sti = atom.sti.saturating_add(i64::from(amount));
        }
    }

    fn reference(&self, key: &str) -> Option<Handle> {
        self.references.get(key).copied()
    }

    fn set_reference(&mut self, key: &str, target: Handle) {
        self.references.insert(key.to_string(), target);
    }
}
