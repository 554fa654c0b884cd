use std::fmt;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::DropletApi;
use crate::do_rust::action_types::{Action, ActionStatus};
use crate::errors::RemoteError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum WaitOutcome {
    Completed,
    Errored,
    TimedOut,
    Cancelled,
}

#[derive(Clone, Debug)]
pub struct WaitReport {
    pub outcome: WaitOutcome,
    /// Last known state of the watched action.
    pub action: Action,
    pub polls: u32,
    pub timeout: Duration,
}

impl fmt::Display for WaitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            WaitOutcome::Completed => write!(f, "Action {} completed.", self.action.id),
            WaitOutcome::Errored => write!(f, "Action {} errored.", self.action.id),
            WaitOutcome::TimedOut => write!(
                f,
                "Action {} was still {} after {:?}, stopped waiting.",
                self.action.id, self.action.status, self.timeout
            ),
            WaitOutcome::Cancelled => write!(
                f,
                "Stopped waiting on action {} while it was {}.",
                self.action.id, self.action.status
            ),
        }
    }
}

async fn poll_until_terminal(
    api: &dyn DropletApi,
    action: &mut Action,
    poll_interval: Duration,
    polls: &mut u32,
) -> Result<(), RemoteError> {
    while !action.status.is_terminal() {
        sleep(poll_interval).await;
        *action = api.get_action(action.id).await?;
        *polls += 1;
        debug!("Poll {}: action {} is {}.", polls, action.id, action.status);
    }
    Ok(())
}

/// Block until `action` reaches a terminal status, checking every `poll_interval`.
///
/// Gives up with [`WaitOutcome::TimedOut`] after `timeout_duration` and with
/// [`WaitOutcome::Cancelled`] as soon as `cancellation_token` fires. A failed
/// status check ends the wait with that error.
pub async fn wait_for_action(
    api: &dyn DropletApi,
    action: Action,
    poll_interval: Duration,
    timeout_duration: Duration,
    cancellation_token: &CancellationToken,
) -> Result<WaitReport, RemoteError> {
    let mut latest = action;
    let mut polls = 0;

    let interrupted = {
        let poll = poll_until_terminal(api, &mut latest, poll_interval, &mut polls);
        tokio::select! {
            res = timeout(timeout_duration, poll) => match res {
                Ok(res) => {
                    res?;
                    None
                }
                Err(_elapsed) => Some(WaitOutcome::TimedOut),
            },
            _ = cancellation_token.cancelled() => Some(WaitOutcome::Cancelled),
        }
    };

    let outcome = interrupted.unwrap_or(match latest.status {
        ActionStatus::Errored => WaitOutcome::Errored,
        _ => WaitOutcome::Completed,
    });
    match outcome {
        WaitOutcome::Completed => info!(
            "Succeeded wait for action {} after {} checks.",
            latest.id, polls
        ),
        WaitOutcome::Errored => error!("Action {} finished with an error.", latest.id),
        WaitOutcome::TimedOut | WaitOutcome::Cancelled => {
            warn!("Gave up on action {}: {}.", latest.id, outcome)
        }
    }

    Ok(WaitReport {
        outcome,
        action: latest,
        polls,
        timeout: timeout_duration,
    })
}
