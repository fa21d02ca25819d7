//! FIFO queue of unresolved choices. While it holds anything, rolling and
//! moving are blocked.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{PendingChoice, ResolvedAnswer};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingChoiceQueue(VecDeque<PendingChoice>);

impl PendingChoiceQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, choice: PendingChoice) {
        self.0.push_back(choice);
    }

    /// Follow-up raised while resolving the head; it is answered next.
    pub fn push_front(&mut self, choice: PendingChoice) {
        self.0.push_front(choice);
    }

    pub fn head(&self) -> Option<&PendingChoice> {
        self.0.front()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingChoice> {
        self.0.iter()
    }

    /// Validate `answer` against the head and dequeue it. A rejected answer
    /// leaves the queue untouched.
    pub fn resolve(&mut self, answer: &str) -> Result<(PendingChoice, ResolvedAnswer), DomainError> {
        let head = self
            .0
            .front()
            .ok_or_else(|| DomainError::invalid_state_transition("no choice is pending"))?;
        let resolved = head.accept(answer)?;
        let choice = self
            .0
            .pop_front()
            .ok_or_else(|| DomainError::invalid_state_transition("no choice is pending"))?;
        Ok((choice, resolved))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{EncounterId, TrapId};
    use crate::value_objects::{ChoiceSpec, ContentRef};

    fn options(id: u16, labels: &[&str]) -> PendingChoice {
        PendingChoice::new(
            ContentRef::Encounter(EncounterId::new(id)),
            format!("prompt {id}"),
            ChoiceSpec::Options(labels.iter().map(|l| l.to_string()).collect()),
        )
    }

    #[test]
    fn resolves_in_fifo_order() {
        let mut queue = PendingChoiceQueue::new();
        queue.enqueue(options(1, &["a", "b"]));
        queue.enqueue(options(2, &["c"]));

        let (choice, answer) = queue.resolve("b").expect("valid answer");
        assert_eq!(choice.source(), ContentRef::Encounter(EncounterId::new(1)));
        assert_eq!(answer.index, Some(1));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn invalid_answer_keeps_queue() {
        let mut queue = PendingChoiceQueue::new();
        queue.enqueue(options(1, &["a", "b"]));
        let before = queue.clone();
        assert!(matches!(
            queue.resolve("z"),
            Err(DomainError::Validation(_))
        ));
        assert_eq!(queue, before);
    }

    #[test]
    fn empty_queue_is_a_state_error() {
        let mut queue = PendingChoiceQueue::new();
        assert!(matches!(
            queue.resolve("a"),
            Err(DomainError::InvalidStateTransition(_))
        ));
    }

    #[test]
    fn follow_ups_jump_the_queue() {
        let mut queue = PendingChoiceQueue::new();
        queue.enqueue(options(1, &["a"]));
        queue.push_front(PendingChoice::new(
            ContentRef::Trap(TrapId::new(16)),
            "follow-up",
            ChoiceSpec::Freeform,
        ));
        assert_eq!(
            queue.head().map(PendingChoice::source),
            Some(ContentRef::Trap(TrapId::new(16)))
        );
    }
}
