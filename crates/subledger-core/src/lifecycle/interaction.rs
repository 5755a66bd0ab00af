//! User-interaction capability for confirmations and date prompts.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Blocking questions the controller may ask the user.
///
/// Front ends implement this with whatever prompt primitive they have.
pub trait Interaction: Send + Sync {
    /// Asks a yes/no question.
    fn confirm(&self, question: &str) -> bool;

    /// Asks for a date. `None` means the user cancelled.
    fn prompt_for_date(&self, question: &str) -> Option<String>;
}

/// Interaction that replays queued answers.
///
/// Useful for headless runs and tests. When the queues run dry every
/// confirmation is refused and every prompt is cancelled.
#[derive(Debug, Default)]
pub struct ScriptedInteraction {
    confirmations: Mutex<VecDeque<bool>>,
    dates: Mutex<VecDeque<Option<String>>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedInteraction {
    /// Creates an interaction with no queued answers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an answer for the next confirmation.
    #[must_use]
    pub fn confirming(self, answer: bool) -> Self {
        lock(&self.confirmations).push_back(answer);
        self
    }

    /// Queues an answer for the next date prompt.
    #[must_use]
    pub fn answering(self, answer: Option<&str>) -> Self {
        lock(&self.dates).push_back(answer.map(str::to_string));
        self
    }

    /// Questions asked so far, in order.
    #[must_use]
    pub fn asked(&self) -> Vec<String> {
        lock(&self.asked).clone()
    }
}

impl Interaction for ScriptedInteraction {
    fn confirm(&self, question: &str) -> bool {
        lock(&self.asked).push(question.to_string());
        lock(&self.confirmations).pop_front().unwrap_or(false)
    }

    fn prompt_for_date(&self, question: &str) -> Option<String> {
        lock(&self.asked).push(question.to_string());
        lock(&self.dates).pop_front().flatten()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
