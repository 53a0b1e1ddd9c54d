//! Human review handling: approval, correction spawning, and chain history.

use super::{TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService, TransitionTaskRequest};
use crate::task::{
    domain::{
        FeedbackSubmission, HistoryEntry, HumanFeedback, Task, TaskDraft, TaskId, TaskOutput,
        TaskStatus,
    },
    ports::{EventBus, TaskOrder, TaskQuery, TaskRepository},
};
use mockable::Clock;
use serde_json::{Value, json};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Placeholder used when a rejected task never produced output.
const NO_OUTPUT: &str = "(no output recorded)";

/// Context key carrying the request that started a correction chain.
pub const ORIGINAL_REQUEST_CONTEXT_KEY: &str = "original_request";

/// A feedback-related history entry paired with the task it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRecord {
    /// Task whose history holds the entry.
    pub task_id: TaskId,
    /// The feedback or correction entry.
    pub entry: HistoryEntry,
}

impl<R, E, C> TaskLifecycleService<R, E, C>
where
    R: TaskRepository,
    E: EventBus,
    C: Clock + Send + Sync,
{
    /// Applies a reviewer's verdict to a task.
    ///
    /// Approval completes the task and returns it. Rejection with a
    /// non-blank correction spawns a correction task one priority step above
    /// the original, cancels the original with a back-reference, and returns
    /// the new task. Rejection without a correction fails the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist,
    /// [`TaskLifecycleError::InvalidTransition`] when enforcement forbids
    /// the resulting status change, or [`TaskLifecycleError::Validation`]
    /// when the correction task would be invalid (for example when its
    /// priority leaves the allowed range). Both checks run before anything
    /// is written, so a failed call leaves no correction task behind and the
    /// original untouched.
    pub async fn apply_human_feedback(
        &self,
        task_id: TaskId,
        submission: FeedbackSubmission,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        let read_revision = task.revision();
        let reviewer = submission
            .reviewer_id
            .clone()
            .unwrap_or_else(|| self.config.reviewer_agent.clone());
        let correction_text = submission
            .correction
            .clone()
            .filter(|text| !text.trim().is_empty());
        let was_approved = submission.was_approved;
        let feedback = HumanFeedback::from_submission(submission, self.clock.utc());

        if was_approved {
            self.check_transition(&task, TaskStatus::Completed)?;
            task.record_feedback(feedback, &*self.clock);
            info!(task_id = %task_id, reviewer = %reviewer, "task approved");
            return self
                .commit_transition(
                    task,
                    read_revision,
                    TransitionTaskRequest::new(task_id, TaskStatus::Completed)
                        .with_agent(reviewer.clone())
                        .with_detail("reason", json!("human_approved"))
                        .with_detail("reviewer_id", json!(reviewer)),
                )
                .await;
        }

        let Some(correction) = correction_text else {
            self.check_transition(&task, TaskStatus::Failed)?;
            task.record_feedback(feedback, &*self.clock);
            info!(task_id = %task_id, reviewer = %reviewer, "task rejected without correction");
            return self
                .commit_transition(
                    task,
                    read_revision,
                    TransitionTaskRequest::new(task_id, TaskStatus::Failed)
                        .with_agent(reviewer.clone())
                        .with_detail("reason", json!("rejected_without_correction"))
                        .with_detail("reviewer_id", json!(reviewer)),
                )
                .await;
        };

        self.check_transition(&task, TaskStatus::Cancelled)?;
        let correction_task = self
            .create_task(self.correction_draft(&task, &correction))
            .await?;

        task.record_feedback(feedback, &*self.clock);
        task.record_correction_request(correction_task.id(), &correction, &reviewer, &*self.clock);
        self.commit_transition(
            task,
            read_revision,
            TransitionTaskRequest::new(task_id, TaskStatus::Cancelled)
                .with_agent(reviewer.clone())
                .with_detail("reason", json!("needs_correction"))
                .with_detail("correction_task_id", json!(correction_task.id().to_string())),
        )
        .await?;

        info!(
            task_id = %task_id,
            correction_task_id = %correction_task.id(),
            reviewer = %reviewer,
            "correction task spawned"
        );
        Ok(correction_task)
    }

    /// Returns the feedback and correction entries of a task and all of its
    /// ancestors, oldest ancestor first.
    ///
    /// The ancestor walk is iterative and stops after
    /// [`LifecycleConfig::max_feedback_depth`](super::LifecycleConfig) tasks,
    /// on a revisited task, or at a dangling parent link.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when `task_id` itself does
    /// not exist.
    pub async fn get_feedback_history(
        &self,
        task_id: TaskId,
    ) -> TaskLifecycleResult<Vec<FeedbackRecord>> {
        let mut chain: Vec<Task> = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(task_id);

        while let Some(current) = next {
            if chain.len() >= self.config.max_feedback_depth {
                warn!(task_id = %task_id, depth = chain.len(), "feedback chain truncated");
                break;
            }
            if !visited.insert(current) {
                warn!(task_id = %current, "cycle in correction chain");
                break;
            }
            let Some(task) = self.repository.find_by_id(current).await? else {
                if chain.is_empty() {
                    return Err(TaskLifecycleError::NotFound(current));
                }
                debug!(task_id = %current, "ancestor missing from store");
                break;
            };
            next = task.parent_task_id();
            chain.push(task);
        }

        Ok(chain
            .iter()
            .rev()
            .flat_map(|task| {
                task.history()
                    .iter()
                    .filter(|entry| entry.action.is_feedback())
                    .map(move |entry| FeedbackRecord {
                        task_id: task.id(),
                        entry: entry.clone(),
                    })
            })
            .collect())
    }

    /// Finds completed, human-approved tasks for the same agent and project,
    /// best rated first.
    ///
    /// Unrated tasks rank below rated ones and equal ratings favour the
    /// most recently updated task. The task itself is excluded.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the query fails.
    pub async fn find_successful_similar_tasks(
        &self,
        task: &Task,
    ) -> TaskLifecycleResult<Vec<Task>> {
        let query = TaskQuery::new()
            .for_agent(task.target_agent().clone())
            .in_project(task.project_id().clone())
            .with_statuses([TaskStatus::Completed])
            .ordered_by(TaskOrder::RecentlyUpdated);
        let mut similar: Vec<Task> = self
            .repository
            .find(&query)
            .await?
            .into_iter()
            .filter(|candidate| candidate.id() != task.id() && candidate.is_human_approved())
            .collect();
        similar.sort_by_key(|candidate| {
            std::cmp::Reverse(
                candidate
                    .human_feedback()
                    .and_then(|feedback| feedback.rating)
                    .map(|rating| rating.value()),
            )
        });
        similar.truncate(self.config.similar_task_limit);
        Ok(similar)
    }

    fn correction_draft(&self, task: &Task, correction: &str) -> TaskDraft {
        let previous = task.output().map_or_else(|| NO_OUTPUT.to_owned(), describe_output);
        let original = original_request(task).to_owned();
        let prompt = format!(
            "A reviewer rejected the previous attempt at this task.\n\n\
             Previous attempt:\n{previous}\n\n\
             Original request:\n{original}\n\n\
             Correction:\n{correction}\n\n\
             Produce a revised result that applies the correction.",
        );

        let mut context = task.input().context.clone();
        context.insert(
            "previous_output".to_owned(),
            task.output()
                .and_then(|output| serde_json::to_value(output).ok())
                .unwrap_or(Value::Null),
        );
        context.insert("correction".to_owned(), json!(correction));
        context.insert(ORIGINAL_REQUEST_CONTEXT_KEY.to_owned(), json!(original));

        let mut draft = TaskDraft::new(
            task.project_id().as_str(),
            self.config.reviewer_agent.as_str(),
            task.target_agent().as_str(),
            prompt,
        )
        .with_context(context)
        .with_priority(task.priority().saturating_add(1))
        .with_parent(task.id())
        .with_tags(task.metadata().tags.clone());
        draft.data.clone_from(&task.input().data);
        if let Some(tenant) = &task.metadata().tenant_id {
            draft = draft.with_tenant(tenant.clone());
        }
        draft
    }
}

/// The first request of the chain, so correction prompts do not nest.
fn original_request(task: &Task) -> &str {
    task.input()
        .context
        .get(ORIGINAL_REQUEST_CONTEXT_KEY)
        .and_then(Value::as_str)
        .unwrap_or(task.input().prompt.as_str())
}

fn describe_output(output: &TaskOutput) -> String {
    match &output.data {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => output
            .explanation
            .clone()
            .unwrap_or_else(|| NO_OUTPUT.to_owned()),
        Some(other) => other.to_string(),
    }
}
