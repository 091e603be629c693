pub mod panel;
pub mod poller;
pub mod submit;

use crate::api::{ApiError, Backend};
use crate::types::{JobRequest, TaskTicket};
use poller::{poll_task, CancelToken, PollEvent, PollIntervals, PollOutcome, Timer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    Started(TaskTicket),
    Rejected(ApiError),
    Poll { task_id: String, event: PollEvent },
}

/// Submits `job` and, if the backend accepts it, polls the new task.
///
/// Returns `None` when the submission was rejected.
pub async fn run_task<B, T>(
    backend: &B,
    timer: &T,
    intervals: PollIntervals,
    job: &JobRequest,
    cancel: &CancelToken,
    mut emit: impl FnMut(TaskEvent),
) -> Option<PollOutcome>
where
    B: Backend,
    T: Timer,
{
    let kind = job.kind();
    let ticket = match backend.submit(job).await {
        Ok(ticket) => ticket,
        Err(err) => {
            tracing::warn!(kind = kind.route(), %err, "task submission rejected");
            emit(TaskEvent::Rejected(err));
            return None;
        }
    };
    tracing::info!(kind = kind.route(), task_id = %ticket.task_id, "task started");

    let task_id = ticket.task_id.clone();
    emit(TaskEvent::Started(ticket));
    let outcome = poll_task(backend, timer, intervals, kind, &task_id, cancel, |event| {
        emit(TaskEvent::Poll { task_id: task_id.clone(), event })
    })
    .await;
    Some(outcome)
}
