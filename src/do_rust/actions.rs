use backon::{ConstantBuilder, Retryable};
use tracing::{debug, instrument};

use super::action_types::{Action, ActionRoot};
use super::request_builder::{check_status, decode, is_connection_closed, RequestBuilderDo};
use crate::errors::RemoteError;

/// Get Action
#[instrument(err)]
pub async fn get_action(
    request_builder_do: &RequestBuilderDo,
    action_id: u64,
) -> Result<Action, RemoteError> {
    let response = (|| async {
        request_builder_do
            .get(format!("/v2/actions/{action_id}"))
            .send()
            .await
    })
    .retry(ConstantBuilder::default())
    .when(is_connection_closed)
    .await?;
    let root: ActionRoot = decode(check_status(response).await?).await?;
    debug!("Action {} is {}.", root.action.id, root.action.status);
    Ok(root.action)
}
