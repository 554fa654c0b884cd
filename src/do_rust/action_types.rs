use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

pub const ACTION_TYPE_DESTROY: &str = "destroy";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, strum_macros::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ActionStatus {
    InProgress,
    Completed,
    Errored,
    #[serde(other)]
    Unknown,
}

impl ActionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActionStatus::Completed | ActionStatus::Errored)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Action {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: ActionStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub resource_id: Option<u64>,
    pub resource_type: Option<String>,
    pub region_slug: Option<String>,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Action: {} {} {}>", self.id, self.kind, self.status)?;
        if let Some(started_at) = self.started_at {
            write!(f, " started {}", started_at.to_rfc3339())?;
        }
        if let Some(completed_at) = self.completed_at {
            write!(f, " completed {}", completed_at.to_rfc3339())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActionRoot {
    pub action: Action,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActionsPage {
    pub actions: Vec<Action>,
    #[serde(default)]
    pub links: Links,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Links {
    #[serde(default)]
    pub pages: Option<Pages>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Pages {
    pub next: Option<String>,
}

impl ActionsPage {
    pub fn has_next_page(&self) -> bool {
        self.links
            .pages
            .as_ref()
            .is_some_and(|pages| pages.next.is_some())
    }
}

/// Pick the action to wait on after a destroy request.
///
/// The API gives no ordering guarantee for a droplet's action list, so the
/// newest `destroy` action wins. Only when none is present does the first
/// entry get used.
pub fn select_destroy_action(actions: &[Action]) -> Option<&Action> {
    let newest_destroy = actions
        .iter()
        .filter(|action| action.kind == ACTION_TYPE_DESTROY)
        .max_by_key(|action| action.started_at);
    if newest_destroy.is_some() {
        return newest_destroy;
    }
    let first = actions.first()?;
    warn!(
        "No destroy action listed, falling back to the first action {} ({}); the API does not guarantee its order.",
        first.id, first.kind
    );
    Some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(id: u64, kind: &str, started_at: &str) -> Action {
        Action {
            id,
            kind: kind.to_string(),
            status: ActionStatus::InProgress,
            started_at: Some(started_at.parse().unwrap()),
            completed_at: None,
            resource_id: Some(288429968),
            resource_type: Some("droplet".to_string()),
            region_slug: Some("nyc3".to_string()),
        }
    }

    #[test]
    fn test_parses_api_action() {
        let body = br#"{
            "action": {
                "id": 36804636,
                "status": "in-progress",
                "type": "destroy",
                "started_at": "2020-11-14T16:29:21Z",
                "completed_at": null,
                "resource_id": 3164444,
                "resource_type": "droplet",
                "region": {"slug": "nyc3"},
                "region_slug": "nyc3"
            }
        }"#;
        let root: ActionRoot = serde_json::from_slice(body).unwrap();
        assert_eq!(root.action.id, 36804636);
        assert_eq!(root.action.kind, "destroy");
        assert_eq!(root.action.status, ActionStatus::InProgress);
        assert!(root.action.completed_at.is_none());
        assert_eq!(root.action.resource_id, Some(3164444));
        assert_eq!(root.action.resource_type.as_deref(), Some("droplet"));
        assert_eq!(root.action.region_slug.as_deref(), Some("nyc3"));
    }

    #[test]
    fn test_unknown_status_is_not_terminal() {
        let status: ActionStatus = serde_json::from_str(r#""paused""#).unwrap();
        assert_eq!(status, ActionStatus::Unknown);
        assert!(!status.is_terminal());
        assert!(ActionStatus::Completed.is_terminal());
        assert!(ActionStatus::Errored.is_terminal());
        assert!(!ActionStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_selects_newest_destroy_action() {
        let actions = vec![
            action(1, "power_off", "2024-05-01T10:05:00Z"),
            action(2, "destroy", "2024-05-01T09:00:00Z"),
            action(3, "destroy", "2024-05-01T10:00:00Z"),
        ];
        assert_eq!(select_destroy_action(&actions).map(|a| a.id), Some(3));
    }

    #[test]
    fn test_falls_back_to_first_action() {
        let actions = vec![
            action(7, "power_off", "2024-05-01T10:05:00Z"),
            action(8, "create", "2024-04-01T10:00:00Z"),
        ];
        assert_eq!(select_destroy_action(&actions).map(|a| a.id), Some(7));
        assert!(select_destroy_action(&[]).is_none());
    }

    #[test]
    fn test_pagination_links() {
        let page: ActionsPage = serde_json::from_str(
            r#"{"actions": [], "links": {"pages": {"next": "https://api.digitalocean.com/v2/droplets/1/actions?page=2"}}, "meta": {"total": 30}}"#,
        )
        .unwrap();
        assert!(page.has_next_page());
        let page: ActionsPage =
            serde_json::from_str(r#"{"actions": [], "links": {}, "meta": {"total": 0}}"#).unwrap();
        assert!(!page.has_next_page());
    }

    #[test]
    fn test_display() {
        let mut a = action(36804636, "destroy", "2020-11-14T16:29:21Z");
        a.status = ActionStatus::Completed;
        assert_eq!(
            a.to_string(),
            "<Action: 36804636 destroy completed> started 2020-11-14T16:29:21+00:00"
        );
    }
}
