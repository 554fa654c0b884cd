use std::future::Future;
use std::io::Write;

use color_eyre::eyre::{bail, Report};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::policy::{disposition, Disposition, Step};
use super::wait::{wait_for_action, WaitReport};
use super::DropletApi;
use crate::config::Settings;
use crate::do_rust::action_types::{select_destroy_action, Action};
use crate::errors::{DdResult, RemoteError};

#[derive(Debug)]
pub struct RunReport {
    pub destroyed: bool,
    pub wait: Option<WaitReport>,
    pub actions: Vec<Action>,
}

fn abort(step: Step, err: RemoteError) -> Report {
    Report::new(err).wrap_err(format!("{step} step failed"))
}

fn report_failure<W: Write>(step: Step, err: &RemoteError, out: &mut W) -> DdResult<()> {
    error!("{step} failed ({}): {err}", err.class());
    writeln!(out, "Err: {step}: {err}")?;
    Ok(())
}

/// Apply the step's failure policy: `Ok(None)` after reporting a failure the
/// run can continue past, `Err` when it has to stop.
fn settle<T, W: Write>(
    step: Step,
    result: Result<T, RemoteError>,
    out: &mut W,
) -> DdResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) => match disposition(step, err.class()) {
            Disposition::Continue => {
                report_failure(step, &err, out)?;
                Ok(None)
            }
            Disposition::Abort => Err(abort(step, err)),
        },
    }
}

/// For steps the run cannot go on without.
fn require<T>(step: Step, result: Result<T, RemoteError>) -> DdResult<T> {
    result.map_err(|err| abort(step, err))
}

/// Run a call that happens before the destroy request, giving up as soon as
/// the run is interrupted.
async fn before_destroy<T>(
    cancellation_token: &CancellationToken,
    droplet_id: u64,
    call: impl Future<Output = T>,
) -> DdResult<T> {
    tokio::select! {
        value = call => Ok(value),
        _ = cancellation_token.cancelled() => {
            bail!("Interrupted before the destroy request for droplet {droplet_id} was sent.")
        }
    }
}

fn print_actions<W: Write>(out: &mut W, droplet_id: u64, actions: &[Action]) -> DdResult<()> {
    if actions.is_empty() {
        writeln!(out, "No actions recorded for droplet {droplet_id}.")?;
        return Ok(());
    }
    writeln!(out, "Actions for droplet {droplet_id}:")?;
    for action in actions {
        writeln!(out, "  {action}")?;
    }
    Ok(())
}

/// Verify the session, load the droplet, destroy it and wait on the destroy
/// action, printing progress and the droplet's action list to `out`.
pub async fn run<W: Write>(
    api: &dyn DropletApi,
    settings: &Settings,
    cancellation_token: &CancellationToken,
    out: &mut W,
) -> DdResult<RunReport> {
    let droplet_id = settings.droplet_id;

    let account = before_destroy(cancellation_token, droplet_id, api.get_account()).await?;
    if let Some(account) = settle(Step::Session, account, out)? {
        debug!("Session verified for {}.", account.email);
    }

    let droplet =
        before_destroy(cancellation_token, droplet_id, api.get_droplet(droplet_id)).await?;
    let droplet = require(Step::Load, droplet)?;
    writeln!(out, "Loaded droplet {droplet}")?;

    if cancellation_token.is_cancelled() {
        bail!("Interrupted before the destroy request for droplet {droplet_id} was sent.");
    }
    let destroyed = settle(Step::Destroy, api.destroy_droplet(droplet_id).await, out)?.is_some();
    if destroyed {
        info!("Destroy requested for droplet {droplet_id}.");
        writeln!(out, "Destroy requested for droplet {droplet_id}.")?;
    }

    let mut actions = settle(
        Step::ListActions,
        api.list_droplet_actions(droplet_id).await,
        out,
    )?
    .unwrap_or_default();

    let Some(action) = select_destroy_action(&actions).cloned() else {
        writeln!(out, "No action to wait on for droplet {droplet_id}.")?;
        print_actions(out, droplet_id, &actions)?;
        return Ok(RunReport {
            destroyed,
            wait: None,
            actions,
        });
    };

    info!(
        "Waiting on action {} ({}) of {} {} in {}, checking every {:?}.",
        action.id,
        action.kind,
        action.resource_type.as_deref().unwrap_or("resource"),
        action.resource_id.unwrap_or(droplet_id),
        action.region_slug.as_deref().unwrap_or("an unknown region"),
        settings.poll_interval
    );
    let result = wait_for_action(
        api,
        action,
        settings.poll_interval,
        settings.wait_timeout,
        cancellation_token,
    )
    .await;
    let wait = settle(Step::Wait, result, out)?;

    if let Some(report) = &wait {
        writeln!(out, "{report}")?;
        if let Some(listed) = actions.iter_mut().find(|a| a.id == report.action.id) {
            *listed = report.action.clone();
        }
    }
    // The wait only tracks one action; the rest of the list may have moved on too.
    match api.list_droplet_actions(droplet_id).await {
        Ok(refreshed) => actions = refreshed,
        Err(err) => {
            warn!("Keeping the action list from before the wait.");
            report_failure(Step::ListActions, &err, out)?;
        }
    }
    print_actions(out, droplet_id, &actions)?;

    Ok(RunReport {
        destroyed,
        wait,
        actions,
    })
}
