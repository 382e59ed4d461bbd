use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::client::LuxorClient;
use crate::light::{Light, ThemeButton};
use crate::types::*;
use crate::{Error, Result};

/// How often hosts are expected to call [`ControllerSession::refresh`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(300);

/// Full group and theme state as of one successful refresh.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub groups: Vec<LightGroup>,
    pub themes: Vec<Theme>,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn group(&self, group_number: u16) -> Option<&LightGroup> {
        self.groups.iter().find(|g| g.group_number == group_number)
    }

    pub fn theme(&self, theme_index: u16) -> Option<&Theme> {
        self.themes.iter().find(|t| t.theme_index == theme_index)
    }
}

/// One configured controller: its client, identity and last good state.
pub struct ControllerSession {
    client: LuxorClient,
    identity: ControllerIdentity,
    family: ControllerFamily,
    name_prefix: String,
    snapshot: Option<Snapshot>,
}

impl ControllerSession {
    /// Identify the controller. This is the only request made; call
    /// [`refresh`](Self::refresh) to load groups and themes.
    pub async fn connect(client: LuxorClient, name_prefix: impl Into<String>) -> Result<Self> {
        let identity = client.controller_identity().await?;
        let family = identity.family();
        debug!(
            host = client.host(),
            controller = %identity.name,
            family = family.as_luxor_str(),
            "controller session established"
        );
        Ok(Self {
            client,
            identity,
            family,
            name_prefix: name_prefix.into(),
            snapshot: None,
        })
    }

    /// Fetch groups and themes and replace the snapshot. On failure the
    /// previous snapshot stays in place.
    pub async fn refresh(&mut self) -> Result<&Snapshot> {
        let fetched = async {
            let groups = self.client.list_groups().await?;
            let themes = self.client.list_themes().await?;
            Ok::<_, Error>((groups, themes))
        }
        .await;

        match fetched {
            Ok((groups, themes)) => {
                debug!(
                    host = self.client.host(),
                    groups = groups.len(),
                    themes = themes.len(),
                    "refreshed controller state"
                );
                Ok(&*self.snapshot.insert(Snapshot {
                    groups,
                    themes,
                    fetched_at: Utc::now(),
                }))
            }
            Err(e) => {
                warn!(
                    host = self.client.host(),
                    error = %e,
                    "update failed, keeping previous state"
                );
                Err(e)
            }
        }
    }

    pub fn client(&self) -> &LuxorClient {
        &self.client
    }

    pub fn host(&self) -> &str {
        self.client.host()
    }

    pub fn identity(&self) -> &ControllerIdentity {
        &self.identity
    }

    pub fn family(&self) -> ControllerFamily {
        self.family
    }

    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn group(&self, group_number: u16) -> Option<&LightGroup> {
        self.snapshot.as_ref().and_then(|s| s.group(group_number))
    }

    pub fn light(&self, group_number: u16) -> Result<Light> {
        self.group(group_number)
            .map(|g| Light::new(self, g))
            .ok_or(Error::UnknownGroup(group_number))
    }

    pub fn lights(&self) -> Vec<Light> {
        self.snapshot
            .iter()
            .flat_map(|s| &s.groups)
            .map(|g| Light::new(self, g))
            .collect()
    }

    pub fn theme_buttons(&self) -> Vec<ThemeButton> {
        self.snapshot
            .iter()
            .flat_map(|s| &s.themes)
            .map(|t| ThemeButton::new(self, t))
            .collect()
    }
}

/// Sessions keyed by the host's entry id. Owned by whoever composes the
/// application; there is no process-wide instance.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, ControllerSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects an entry id that is already in use, and a session for a
    /// controller that is already registered under any entry id.
    pub fn insert(
        &mut self,
        entry_id: impl Into<String>,
        session: ControllerSession,
    ) -> Result<()> {
        let entry_id = entry_id.into();
        if self.sessions.contains_key(&entry_id) {
            return Err(Error::DuplicateEntry(entry_id));
        }
        if let Some(id) = session.identity().unique_id()
            && self
                .sessions
                .values()
                .any(|s| s.identity().unique_id() == Some(id))
        {
            return Err(Error::AlreadyConfigured(id.to_string()));
        }
        self.sessions.insert(entry_id, session);
        Ok(())
    }

    pub fn get(&self, entry_id: &str) -> Option<&ControllerSession> {
        self.sessions.get(entry_id)
    }

    pub fn get_mut(&mut self, entry_id: &str) -> Option<&mut ControllerSession> {
        self.sessions.get_mut(entry_id)
    }

    pub fn remove(&mut self, entry_id: &str) -> Option<ControllerSession> {
        self.sessions.remove(entry_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ControllerSession)> {
        self.sessions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(n: u16) -> LightGroup {
        LightGroup {
            group_number: n,
            name: format!("Group {n}"),
            color_type: ColorType::Mono,
            intensity: 0,
            hue: None,
            saturation: None,
        }
    }

    #[test]
    fn snapshot_lookup() {
        let snapshot = Snapshot {
            groups: vec![group(1), group(7)],
            themes: vec![Theme {
                theme_index: 3,
                name: "Party".to_string(),
            }],
            fetched_at: Utc::now(),
        };
        assert_eq!(snapshot.group(7).map(|g| g.name.as_str()), Some("Group 7"));
        assert!(snapshot.group(2).is_none());
        assert_eq!(snapshot.theme(3).map(|t| t.name.as_str()), Some("Party"));
    }

    #[test]
    fn poll_interval_is_five_minutes() {
        assert_eq!(DEFAULT_POLL_INTERVAL, Duration::from_secs(5 * 60));
    }
}
