use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::time::{sleep, Instant};

use super::DropletApi;
use crate::do_rust::account::Account;
use crate::do_rust::action_types::{Action, ActionStatus};
use crate::do_rust::droplet_types::{Droplet, DropletStatus, Region};
use crate::errors::RemoteError;

pub(crate) const DESTROY_ACTION_ID: u64 = 1_893_221_774;

pub(crate) fn action(id: u64, kind: &str, status: ActionStatus) -> Action {
    Action {
        id,
        kind: kind.to_string(),
        status,
        started_at: "2024-05-01T10:00:00Z".parse().ok(),
        completed_at: None,
        resource_id: Some(288429968),
        resource_type: Some(String::from("droplet")),
        region_slug: Some(String::from("fra1")),
    }
}

/// Scripted stand-in for the DigitalOcean API. Every call is recorded by name.
pub(crate) struct FakeApi {
    pub account_fails: Option<StatusCode>,
    pub droplet_fails: Option<StatusCode>,
    pub destroy_fails: Option<StatusCode>,
    pub actions_fails: Option<StatusCode>,
    /// Failure for every action listing after the first one.
    pub relist_fails: Option<StatusCode>,
    pub listed_actions: Vec<Action>,
    /// Returned by action listings after the first one, `listed_actions` when unset.
    pub relisted_actions: Option<Vec<Action>>,
    pub load_delay: Option<Duration>,
    /// Statuses handed out by successive `get_action` calls; the last one repeats.
    pub poll_statuses: Mutex<VecDeque<ActionStatus>>,
    pub calls: Mutex<Vec<&'static str>>,
    pub poll_times: Mutex<Vec<Instant>>,
}

impl FakeApi {
    pub fn new() -> Self {
        FakeApi {
            account_fails: None,
            droplet_fails: None,
            destroy_fails: None,
            actions_fails: None,
            relist_fails: None,
            listed_actions: vec![action(
                DESTROY_ACTION_ID,
                "destroy",
                ActionStatus::InProgress,
            )],
            relisted_actions: Some(vec![action(
                DESTROY_ACTION_ID,
                "destroy",
                ActionStatus::Completed,
            )]),
            load_delay: None,
            poll_statuses: Mutex::new(VecDeque::from([ActionStatus::Completed])),
            calls: Mutex::new(vec![]),
            poll_times: Mutex::new(vec![]),
        }
    }

    pub fn with_poll_statuses(self, statuses: impl IntoIterator<Item = ActionStatus>) -> Self {
        *self.poll_statuses.lock().unwrap() = statuses.into_iter().collect();
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn fail(status: Option<StatusCode>) -> Result<(), RemoteError> {
        match status {
            Some(status) => Err(RemoteError::from_status(
                status,
                br#"{"id":"fake","message":"scripted failure"}"#,
            )),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DropletApi for FakeApi {
    async fn get_account(&self) -> Result<Account, RemoteError> {
        self.record("get_account");
        Self::fail(self.account_fails)?;
        Ok(Account {
            email: String::from("ops@example.com"),
            uuid: String::from("b6fr89dbf6d9156cace5f3c78dc9851d957381ef"),
            status: String::from("active"),
            droplet_limit: 25,
        })
    }

    async fn get_droplet(&self, droplet_id: u64) -> Result<Droplet, RemoteError> {
        self.record("get_droplet");
        if let Some(load_delay) = self.load_delay {
            sleep(load_delay).await;
        }
        Self::fail(self.droplet_fails)?;
        Ok(Droplet {
            id: droplet_id,
            name: String::from("remote-firefox"),
            status: DropletStatus::Active,
            locked: false,
            created_at: "2022-03-02T15:43:18Z".parse().unwrap(),
            size_slug: Some(String::from("s-1vcpu-1gb")),
            region: Some(Region {
                slug: String::from("fra1"),
            }),
        })
    }

    async fn destroy_droplet(&self, _droplet_id: u64) -> Result<(), RemoteError> {
        self.record("destroy_droplet");
        Self::fail(self.destroy_fails)
    }

    async fn list_droplet_actions(&self, _droplet_id: u64) -> Result<Vec<Action>, RemoteError> {
        let first_listing = !self.calls().contains(&"list_droplet_actions");
        self.record("list_droplet_actions");
        if first_listing {
            Self::fail(self.actions_fails)?;
            return Ok(self.listed_actions.clone());
        }
        Self::fail(self.relist_fails)?;
        Ok(self
            .relisted_actions
            .clone()
            .unwrap_or_else(|| self.listed_actions.clone()))
    }

    async fn get_action(&self, action_id: u64) -> Result<Action, RemoteError> {
        self.record("get_action");
        self.poll_times.lock().unwrap().push(Instant::now());
        let status = {
            let mut statuses = self.poll_statuses.lock().unwrap();
            if statuses.len() > 1 {
                statuses.pop_front()
            } else {
                statuses.front().copied()
            }
        }
        .unwrap_or(ActionStatus::InProgress);
        Ok(action(action_id, "destroy", status))
    }
}
