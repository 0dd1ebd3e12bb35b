//! In-memory doubles for the session's external collaborators.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use task_console_domain::SubmissionPayload;
use task_console_errors::{ConsoleError, ConsoleResult};
use task_console_session::{BindableNode, BindableNodeDirectory, SubmitOutcome, TaskSubmitter};

/// Mock node directory that can be switched between success and failure
#[derive(Debug, Default)]
pub struct MockNodeDirectory {
    nodes: Mutex<Vec<BindableNode>>,
    failure: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl MockNodeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nodes(nodes: Vec<BindableNode>) -> Self {
        Self {
            nodes: Mutex::new(nodes),
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        let directory = Self::default();
        directory.fail_with(message);
        directory
    }

    pub fn set_nodes(&self, nodes: Vec<BindableNode>) {
        *self.nodes.lock().unwrap() = nodes;
        *self.failure.lock().unwrap() = None;
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BindableNodeDirectory for MockNodeDirectory {
    async fn fetch_bindable_nodes(&self) -> ConsoleResult<Vec<BindableNode>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(ConsoleError::node_lookup(message));
        }
        Ok(self.nodes.lock().unwrap().clone())
    }
}

/// How the mock submitter answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitBehaviour {
    Accept,
    Reject(String),
    Fail(String),
}

/// Mock submitter that records every payload it receives
#[derive(Debug)]
pub struct MockTaskSubmitter {
    behaviour: Mutex<SubmitBehaviour>,
    submitted: Mutex<Vec<SubmissionPayload>>,
}

impl MockTaskSubmitter {
    pub fn new() -> Self {
        Self::with_behaviour(SubmitBehaviour::Accept)
    }

    pub fn with_behaviour(behaviour: SubmitBehaviour) -> Self {
        Self {
            behaviour: Mutex::new(behaviour),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn set_behaviour(&self, behaviour: SubmitBehaviour) {
        *self.behaviour.lock().unwrap() = behaviour;
    }

    pub fn submitted(&self) -> Vec<SubmissionPayload> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

impl Default for MockTaskSubmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskSubmitter for MockTaskSubmitter {
    async fn submit(&self, payload: &SubmissionPayload) -> ConsoleResult<SubmitOutcome> {
        self.submitted.lock().unwrap().push(payload.clone());
        let behaviour = self.behaviour.lock().unwrap().clone();
        match behaviour {
            SubmitBehaviour::Accept => Ok(SubmitOutcome::Accepted),
            SubmitBehaviour::Reject(reason) => Ok(SubmitOutcome::Rejected { reason }),
            SubmitBehaviour::Fail(message) => Err(ConsoleError::submission(message)),
        }
    }
}
