use backon::{ConstantBuilder, Retryable};
use serde::Deserialize;
use tracing::{info, instrument};

use super::request_builder::{check_status, decode, is_connection_closed, RequestBuilderDo};
use crate::errors::RemoteError;

#[derive(Clone, Debug, Deserialize)]
pub struct Account {
    pub email: String,
    pub uuid: String,
    pub status: String,
    #[serde(default)]
    pub droplet_limit: u32,
}

#[derive(Debug, Deserialize)]
struct AccountRoot {
    account: Account,
}

/// Get Account
#[instrument(err)]
pub async fn get_account(request_builder_do: &RequestBuilderDo) -> Result<Account, RemoteError> {
    let response = (|| async { request_builder_do.get(String::from("/v2/account")).send().await })
        .retry(ConstantBuilder::default())
        .when(is_connection_closed)
        .await?;
    let root: AccountRoot = decode(check_status(response).await?).await?;
    info!(
        "Authenticated as {} ({}, status {}, droplet limit {}).",
        root.account.email, root.account.uuid, root.account.status, root.account.droplet_limit
    );
    Ok(root.account)
}
