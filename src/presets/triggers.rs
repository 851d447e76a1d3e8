//! Trigger assembly
//!
//! Maps `TriggerOptions` onto GitHub's `on:` block or Bitrise's `trigger_map`.
//! Absent or empty trigger options fall back to push and pull_request on the
//! default branch.

use tracing::debug;

use crate::config::{TriggerOptions, DEFAULT_BRANCH};
use crate::workflow::{
    BranchEvent, CronEvent, PushEvent, TriggerMapItem, Triggers, WorkflowDispatch,
};

fn is_empty(triggers: &TriggerOptions) -> bool {
    triggers.push.is_none()
        && triggers.pull_request.is_none()
        && triggers.pull_request_target.is_none()
        && !triggers.workflow_dispatch
        && triggers.schedule.is_empty()
}

fn default_triggers() -> Triggers {
    Triggers {
        push: Some(PushEvent {
            branches: vec![DEFAULT_BRANCH.to_string()],
            paths_ignore: Vec::new(),
        }),
        pull_request: Some(BranchEvent {
            branches: vec![DEFAULT_BRANCH.to_string()],
        }),
        ..Default::default()
    }
}

/// GitHub `on:` block
pub fn build_triggers(triggers: Option<&TriggerOptions>) -> Triggers {
    let Some(triggers) = triggers.filter(|t| !is_empty(t)) else {
        return default_triggers();
    };

    Triggers {
        push: triggers.push.as_ref().map(|push| PushEvent {
            branches: push.branches.clone(),
            paths_ignore: push.ignore_paths.clone(),
        }),
        pull_request: triggers.pull_request.as_ref().map(|pr| BranchEvent {
            branches: pr.branches.clone(),
        }),
        pull_request_target: triggers.pull_request_target.as_ref().map(|pr| BranchEvent {
            branches: pr.branches.clone(),
        }),
        workflow_dispatch: triggers.workflow_dispatch.then_some(WorkflowDispatch {}),
        schedule: triggers
            .schedule
            .iter()
            .map(|entry| CronEvent {
                cron: entry.cron.clone(),
            })
            .collect(),
    }
}

/// Bitrise `trigger_map` routing every matching event to `workflow`
///
/// Push branches become `push_branch` items, pull request branches become
/// `pull_request_target_branch` items. A trigger without branches matches all
/// branches. Manual and scheduled triggers have no `trigger_map` form.
pub fn bitrise_trigger_map(
    triggers: Option<&TriggerOptions>,
    workflow: &str,
) -> Vec<TriggerMapItem> {
    let item = |push: Option<&str>, target: Option<&str>| TriggerMapItem {
        push_branch: push.map(str::to_string),
        pull_request_source_branch: None,
        pull_request_target_branch: target.map(str::to_string),
        workflow: workflow.to_string(),
    };

    let Some(triggers) = triggers.filter(|t| !is_empty(t)) else {
        return vec![
            item(Some(DEFAULT_BRANCH), None),
            item(None, Some(DEFAULT_BRANCH)),
        ];
    };

    if triggers.workflow_dispatch || !triggers.schedule.is_empty() {
        debug!("Manual and scheduled triggers are configured in the Bitrise UI, skipping");
    }

    let mut items = Vec::new();
    if let Some(push) = &triggers.push {
        if push.branches.is_empty() {
            items.push(item(Some("*"), None));
        }
        for branch in &push.branches {
            items.push(item(Some(branch.as_str()), None));
        }
    }

    let pr_branches = [&triggers.pull_request, &triggers.pull_request_target]
        .into_iter()
        .flatten()
        .map(|pr| pr.branches.as_slice());
    for branches in pr_branches {
        if branches.is_empty() {
            items.push(item(None, Some("*")));
        }
        for branch in branches {
            items.push(item(None, Some(branch.as_str())));
        }
    }

    // pull_request and pull_request_target often name the same branches
    let mut unique: Vec<TriggerMapItem> = Vec::with_capacity(items.len());
    for entry in items {
        if !unique.contains(&entry) {
            unique.push(entry);
        }
    }
    unique
}
