//! Notification steps
//!
//! Slack is a single webhook step. PR comments are a connected sequence: a
//! source-detection step records whether the run belongs to a pull request,
//! and the comment steps that follow are gated on its output.

use crate::config::NotificationChannel;
use crate::workflow::Step;

pub const SOURCE_DETECTION_ID: &str = "detect-source";

const IS_PR_CONDITION: &str = "steps.detect-source.outputs.is_pr == 'true'";

/// What a notification is about
#[derive(Debug, Clone)]
pub struct NotificationContext {
    /// Short id-safe label (e.g. `android`, `static-analysis`)
    pub label: String,
    /// Human-readable subject (e.g. `Android debug build`)
    pub subject: String,
}

impl NotificationContext {
    pub fn new(label: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            subject: subject.into(),
        }
    }
}

pub fn notification_steps(channel: NotificationChannel, ctx: &NotificationContext) -> Vec<Step> {
    let mut steps = Vec::new();
    if channel.includes_slack() {
        steps.extend(slack_steps(ctx));
    }
    if channel.includes_pr_comment() {
        steps.extend(pr_comment_steps(ctx));
    }
    steps
}

pub fn slack_steps(ctx: &NotificationContext) -> Vec<Step> {
    let payload = format!(
        concat!(
            "{{\n",
            "  \"text\": \"{subject} finished with status ${{{{ job.status }}}}\",\n",
            "  \"blocks\": [\n",
            "    {{\n",
            "      \"type\": \"section\",\n",
            "      \"text\": {{\n",
            "        \"type\": \"mrkdwn\",\n",
            "        \"text\": \"*{subject}*: ${{{{ job.status }}}}\\n<${{{{ github.server_url }}}}/${{{{ github.repository }}}}/actions/runs/${{{{ github.run_id }}}}|View run>\"\n",
            "      }}\n",
            "    }}\n",
            "  ]\n",
            "}}"
        ),
        subject = ctx.subject
    );

    vec![Step::uses("Notify Slack", "slackapi/slack-github-action@v1.26.0")
        .when("always()")
        .with("payload", payload)
        .env("SLACK_WEBHOOK_URL", "${{ secrets.SLACK_WEBHOOK }}")
        .env("SLACK_WEBHOOK_TYPE", "INCOMING_WEBHOOK")]
}

/// Records `is_pr` and `pr_number` outputs for later steps
pub fn source_detection_step() -> Step {
    Step::run(
        "Detect build source",
        concat!(
            "if [ \"${{ github.event_name }}\" = \"pull_request\" ] || [ \"${{ github.event_name }}\" = \"pull_request_target\" ]; then\n",
            "  echo \"is_pr=true\" >> \"$GITHUB_OUTPUT\"\n",
            "  echo \"pr_number=${{ github.event.pull_request.number }}\" >> \"$GITHUB_OUTPUT\"\n",
            "else\n",
            "  echo \"is_pr=false\" >> \"$GITHUB_OUTPUT\"\n",
            "fi"
        ),
    )
    .id(SOURCE_DETECTION_ID)
    .when("always()")
}

pub fn pr_comment_steps(ctx: &NotificationContext) -> Vec<Step> {
    let find_id = format!("find-comment-{}", ctx.label);
    let marker = format!("<!-- rn-ci-gen:{} -->", ctx.label);
    let condition = format!("always() && {}", IS_PR_CONDITION);
    let body = format!(
        "{marker}\n### {subject}\n\nStatus: **${{{{ job.status }}}}**\n\n[View run and artifacts](${{{{ github.server_url }}}}/${{{{ github.repository }}}}/actions/runs/${{{{ github.run_id }}}})",
        marker = marker,
        subject = ctx.subject
    );

    vec![
        source_detection_step(),
        Step::uses("Find existing PR comment", "peter-evans/find-comment@v3")
            .id(find_id.clone())
            .when(condition.clone())
            .with("issue-number", "${{ steps.detect-source.outputs.pr_number }}")
            .with("comment-author", "github-actions[bot]")
            .with("body-includes", marker),
        Step::uses("Post PR comment", "peter-evans/create-or-update-comment@v4")
            .when(condition)
            .with("comment-id", format!("${{{{ steps.{}.outputs.comment-id }}}}", find_id))
            .with("issue-number", "${{ steps.detect-source.outputs.pr_number }}")
            .with("body", body)
            .with("edit-mode", "replace"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> NotificationContext {
        NotificationContext::new("android", "Android debug build")
    }

    #[test]
    fn test_none_produces_no_steps() {
        assert!(notification_steps(NotificationChannel::None, &ctx()).is_empty());
    }

    #[test]
    fn test_slack_single_step() {
        let steps = notification_steps(NotificationChannel::Slack, &ctx());
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].env["SLACK_WEBHOOK_URL"], "${{ secrets.SLACK_WEBHOOK }}");
        let payload = steps[0].with["payload"].as_str().unwrap();
        assert!(payload.contains("Android debug build finished"));
        assert!(payload.contains("${{ github.run_id }}"));
    }

    #[test]
    fn test_pr_comment_sequence_is_gated_on_detection() {
        let steps = notification_steps(NotificationChannel::PrComment, &ctx());
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].id.as_deref(), Some(SOURCE_DETECTION_ID));
        for step in &steps[1..] {
            assert!(step
                .condition
                .as_deref()
                .unwrap()
                .contains("steps.detect-source.outputs.is_pr == 'true'"));
        }
        assert_eq!(
            steps[2].with["comment-id"],
            serde_yaml::Value::from("${{ steps.find-comment-android.outputs.comment-id }}")
        );
    }

    #[test]
    fn test_both_is_slack_then_pr_comment() {
        let steps = notification_steps(NotificationChannel::Both, &ctx());
        let names: Vec<_> = steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Notify Slack",
                "Detect build source",
                "Find existing PR comment",
                "Post PR comment"
            ]
        );
    }
}
