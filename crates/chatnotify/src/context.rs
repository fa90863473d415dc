use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

const GITHUB_URL: &str = "https://github.com";

/// Trigger kinds that change how links are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PullRequest,
    Push,
    WorkflowDispatch,
}

impl EventKind {
    /// Case-insensitive; anything unrecognized, including empty, is a push.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "pull_request" => EventKind::PullRequest,
            "workflow_dispatch" => EventKind::WorkflowDispatch,
            _ => EventKind::Push,
        }
    }
}

/// Metadata about the run that triggered the notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContext {
    pub owner: String,
    pub repo: String,
    pub event_name: String,
    pub git_ref: String,
    pub actor: String,
    pub sha: String,
    pub number: Option<u64>,
    pub workflow: String,
}

impl RunContext {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the context from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).unwrap_or_default();

        let repository = var("GITHUB_REPOSITORY");
        let (mut owner, repo) = match repository.split_once('/') {
            Some((owner, repo)) => (owner.to_string(), repo.to_string()),
            None => {
                debug!(repository = %repository, "GITHUB_REPOSITORY is not in owner/repo form");
                (String::new(), repository.clone())
            }
        };
        if let Some(explicit) = lookup("GITHUB_REPOSITORY_OWNER").filter(|o| !o.is_empty()) {
            owner = explicit;
        }

        let number = lookup("GITHUB_EVENT_PATH")
            .filter(|p| !p.is_empty())
            .and_then(|p| event_number(Path::new(&p)));

        RunContext {
            owner,
            repo,
            event_name: var("GITHUB_EVENT_NAME"),
            git_ref: var("GITHUB_REF"),
            actor: var("GITHUB_ACTOR"),
            sha: var("GITHUB_SHA"),
            number,
            workflow: var("GITHUB_WORKFLOW"),
        }
    }

    pub fn event_kind(&self) -> EventKind {
        EventKind::from_name(&self.event_name)
    }

    pub fn repo_url(&self) -> String {
        format!("{GITHUB_URL}/{}/{}", self.owner, self.repo)
    }

    /// Pull request page for pull-request events, commit page otherwise.
    pub fn event_url(&self) -> String {
        match self.event_kind() {
            EventKind::PullRequest => {
                let number = self.number.map(|n| n.to_string()).unwrap_or_default();
                format!("{}/pull/{number}", self.repo_url())
            }
            EventKind::Push | EventKind::WorkflowDispatch => {
                format!("{}/commit/{}", self.repo_url(), self.sha)
            }
        }
    }

    pub fn checks_url(&self) -> String {
        format!("{}/checks", self.event_url())
    }
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<Numbered>,
    issue: Option<Numbered>,
    number: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Numbered {
    number: Option<u64>,
}

fn event_number(path: &Path) -> Option<u64> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(err) => {
            debug!(path = %path.display(), %err, "event payload not readable");
            return None;
        }
    };
    let payload: EventPayload = match serde_json::from_str(&contents) {
        Ok(p) => p,
        Err(err) => {
            debug!(path = %path.display(), %err, "event payload is not valid JSON");
            return None;
        }
    };
    payload
        .pull_request
        .and_then(|pr| pr.number)
        .or_else(|| payload.issue.and_then(|i| i.number))
        .or(payload.number)
}
