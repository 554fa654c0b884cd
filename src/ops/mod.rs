use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::SecretString;

use crate::config::Settings;
use crate::do_rust::account::{self, Account};
use crate::do_rust::action_types::Action;
use crate::do_rust::droplet_types::Droplet;
use crate::do_rust::request_builder::RequestBuilderDo;
use crate::do_rust::{actions, droplets};
use crate::errors::{DdResult, RemoteError};

pub mod destroy;
pub mod policy;
pub mod wait;

#[cfg(test)]
pub(crate) mod test_support;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The remote calls the destroy flow is built from.
#[async_trait]
pub trait DropletApi: Send + Sync {
    async fn get_account(&self) -> Result<Account, RemoteError>;
    async fn get_droplet(&self, droplet_id: u64) -> Result<Droplet, RemoteError>;
    async fn destroy_droplet(&self, droplet_id: u64) -> Result<(), RemoteError>;
    async fn list_droplet_actions(&self, droplet_id: u64) -> Result<Vec<Action>, RemoteError>;
    async fn get_action(&self, action_id: u64) -> Result<Action, RemoteError>;
}

#[derive(Clone)]
pub struct Ops {
    pub request_builder_do: RequestBuilderDo,
}

impl Ops {
    pub fn new(settings: &Settings, access_token: SecretString) -> DdResult<Self> {
        //INFO: Keep idle connections shorter than the API's keep-alive so reads rarely hit a closed socket.
        let http_client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(40))
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Ops {
            request_builder_do: RequestBuilderDo::new(
                http_client,
                settings.api_base_url.clone(),
                access_token,
            ),
        })
    }
}

#[async_trait]
impl DropletApi for Ops {
    async fn get_account(&self) -> Result<Account, RemoteError> {
        account::get_account(&self.request_builder_do).await
    }

    async fn get_droplet(&self, droplet_id: u64) -> Result<Droplet, RemoteError> {
        droplets::get_droplet(&self.request_builder_do, droplet_id).await
    }

    async fn destroy_droplet(&self, droplet_id: u64) -> Result<(), RemoteError> {
        droplets::delete_droplet(&self.request_builder_do, droplet_id).await
    }

    async fn list_droplet_actions(&self, droplet_id: u64) -> Result<Vec<Action>, RemoteError> {
        droplets::list_droplet_actions(&self.request_builder_do, droplet_id).await
    }

    async fn get_action(&self, action_id: u64) -> Result<Action, RemoteError> {
        actions::get_action(&self.request_builder_do, action_id).await
    }
}
