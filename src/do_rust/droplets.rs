use backon::{ConstantBuilder, Retryable};
use tracing::{info, instrument};

use super::action_types::{Action, ActionsPage};
use super::droplet_types::{Droplet, DropletRoot};
use super::request_builder::{check_status, decode, is_connection_closed, RequestBuilderDo};
use crate::errors::RemoteError;

const ACTIONS_PER_PAGE: u32 = 200;

/// Get Droplet
#[instrument(err)]
pub async fn get_droplet(
    request_builder_do: &RequestBuilderDo,
    droplet_id: u64,
) -> Result<Droplet, RemoteError> {
    let response = (|| async {
        request_builder_do
            .get(format!("/v2/droplets/{droplet_id}"))
            .send()
            .await
    })
    .retry(ConstantBuilder::default())
    .when(is_connection_closed)
    .await?;
    let root: DropletRoot = decode(check_status(response).await?).await?;
    info!("Loaded droplet: {:#?}", root.droplet);
    Ok(root.droplet)
}

/// Destroy Droplet
///
/// Never retried: a second DELETE after a dropped connection could hit a
/// droplet that is already being torn down.
#[instrument(err)]
pub async fn delete_droplet(
    request_builder_do: &RequestBuilderDo,
    droplet_id: u64,
) -> Result<(), RemoteError> {
    let response = request_builder_do
        .delete(format!("/v2/droplets/{droplet_id}"))
        .send()
        .await?;
    check_status(response).await?;
    Ok(())
}

/// List Droplet Actions
#[instrument(err)]
pub async fn list_droplet_actions(
    request_builder_do: &RequestBuilderDo,
    droplet_id: u64,
) -> Result<Vec<Action>, RemoteError> {
    let mut all_actions = vec![];
    let mut page = 1u32;

    loop {
        let response = (|| async {
            request_builder_do
                .get(format!("/v2/droplets/{droplet_id}/actions"))
                .query(&[("page", page), ("per_page", ACTIONS_PER_PAGE)])
                .send()
                .await
        })
        .retry(ConstantBuilder::default())
        .when(is_connection_closed)
        .await?;
        let actions_page: ActionsPage = decode(check_status(response).await?).await?;
        let has_next_page = actions_page.has_next_page();
        all_actions.extend(actions_page.actions);
        if !has_next_page {
            break;
        }
        page += 1;
    }
    info!("List of actions: {:#?}", all_actions);
    Ok(all_actions)
}
