use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DropletStatus {
    New,
    Active,
    Off,
    Archive,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Region {
    pub slug: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Droplet {
    pub id: u64,
    pub name: String,
    pub status: DropletStatus,
    #[serde(default)]
    pub locked: bool,
    pub created_at: DateTime<Utc>,
    pub size_slug: Option<String>,
    pub region: Option<Region>,
}

impl fmt::Display for Droplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) status={}", self.id, self.name, self.status)?;
        if let Some(region) = &self.region {
            write!(f, " region={}", region.slug)?;
        }
        if let Some(size_slug) = &self.size_slug {
            write!(f, " size={size_slug}")?;
        }
        if self.locked {
            write!(f, " locked")?;
        }
        write!(f, " created {}", self.created_at.format("%Y-%m-%d"))?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DropletRoot {
    pub droplet: Droplet,
}
