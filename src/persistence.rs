//! Remote key-value persistence for the battle session.
//!
//! The backend is an opaque store keyed by player id. Loads that fail or
//! return nothing fall back to baseline defaults; saves are fire-and-forget
//! from the controller's point of view. Every payload field tolerates being
//! absent so older saves keep loading.

use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::policy::PolicyTable;
use crate::combat::types::{Combatant, TemplateId, ENEMY_TEMPLATES};
use crate::core::constants::{PLAYER_MAX_HP, PLAYER_MAX_MP, STARTING_TOKENS};
use crate::core::game_state::{GameState, Scores, Upgrades};

/// Identifies a player's saved session in the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints a fresh id for a session started without one.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug)]
pub enum StoreError {
    Http(String),
    Decode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Http(msg) => write!(f, "http error: {msg}"),
            StoreError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl Error for StoreError {}

fn default_tokens() -> u32 {
    STARTING_TOKENS
}
fn default_player_hp() -> u32 {
    PLAYER_MAX_HP
}
fn default_player_mp() -> u32 {
    PLAYER_MAX_MP
}
fn default_enemy_hp() -> u32 {
    ENEMY_TEMPLATES[0].max_hp
}
fn default_enemy_mp() -> u32 {
    ENEMY_TEMPLATES[0].max_mp
}
fn default_enemy_defense() -> u32 {
    ENEMY_TEMPLATES[0].defense
}
fn default_template() -> TemplateId {
    TemplateId::Grunt
}

/// The wire payload. Fields the backend doesn't have yet deserialize to
/// the same baseline a brand-new session starts from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default = "default_tokens")]
    pub tokens: u32,
    #[serde(default = "default_player_hp")]
    pub player_hp: u32,
    #[serde(default = "default_player_mp")]
    pub player_mp: u32,
    #[serde(default = "default_enemy_hp")]
    pub enemy_hp: u32,
    #[serde(default = "default_enemy_mp")]
    pub enemy_mp: u32,
    #[serde(default = "default_enemy_hp")]
    pub enemy_max_hp: u32,
    #[serde(default = "default_enemy_mp")]
    pub enemy_max_mp: u32,
    #[serde(default = "default_enemy_defense")]
    pub enemy_defense: u32,
    #[serde(default)]
    pub enemy_iq: f64,
    #[serde(default)]
    pub player_wins: u32,
    #[serde(default)]
    pub enemy_wins: u32,
    #[serde(default)]
    pub score: u32,
    #[serde(default = "default_template")]
    pub template: TemplateId,
    #[serde(default)]
    pub upgrades: Upgrades,
    #[serde(default)]
    pub policy: PolicyTable,
    #[serde(default)]
    pub last_saved: Option<DateTime<Utc>>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            tokens: default_tokens(),
            player_hp: default_player_hp(),
            player_mp: default_player_mp(),
            enemy_hp: default_enemy_hp(),
            enemy_mp: default_enemy_mp(),
            enemy_max_hp: default_enemy_hp(),
            enemy_max_mp: default_enemy_mp(),
            enemy_defense: default_enemy_defense(),
            enemy_iq: 0.0,
            player_wins: 0,
            enemy_wins: 0,
            score: 0,
            template: TemplateId::Grunt,
            upgrades: Upgrades::default(),
            policy: PolicyTable::default(),
            last_saved: None,
        }
    }
}

impl PersistedState {
    /// Snapshots the live session for saving.
    pub fn capture(state: &GameState) -> Self {
        Self {
            tokens: state.wallet_tokens,
            player_hp: state.player.hp,
            player_mp: state.player.mp,
            enemy_hp: state.enemy.hp,
            enemy_mp: state.enemy.mp,
            enemy_max_hp: state.enemy.max_hp,
            enemy_max_mp: state.enemy.max_mp,
            enemy_defense: state.enemy.defense,
            enemy_iq: state.enemy.intelligence,
            player_wins: state.scores.player_wins,
            enemy_wins: state.scores.enemy_wins,
            score: state.scores.score,
            template: state.enemy.template,
            upgrades: state.upgrades,
            policy: state.policy.clone(),
            last_saved: Some(Utc::now()),
        }
    }

    /// Rebuilds a session from the payload, clamping anything the backend
    /// may have handed back out of range.
    pub fn restore(&self) -> GameState {
        let mut state = GameState::new();

        state.wallet_tokens = self.tokens;
        state.scores = Scores {
            player_wins: self.player_wins,
            enemy_wins: self.enemy_wins,
            score: self.score,
        };
        state.upgrades = self.upgrades;
        state.apply_upgrades();

        state.enemy.template = self.template;
        state.enemy.max_hp = self.enemy_max_hp.max(1);
        state.enemy.max_mp = self.enemy_max_mp;
        state.enemy.defense = self.enemy_defense;
        state.enemy.intelligence = self.enemy_iq.clamp(0.0, 100.0);
        state.enemy.set_hp(self.enemy_hp);
        state.enemy.set_mp(self.enemy_mp);

        state.player.set_hp(self.player_hp);
        state.player.set_mp(self.player_mp);

        state.policy = self.policy.clone();
        state
    }
}

/// Load/save contract the controller talks to.
pub trait Store {
    /// `Ok(None)` means the backend has no record for this player.
    fn load(&self, player: &PlayerId) -> Result<Option<PersistedState>, StoreError>;
    fn save(&self, player: &PlayerId, state: &PersistedState) -> Result<(), StoreError>;
}

/// HTTP-backed store: `GET/POST {base_url}/{player_id}` with JSON bodies.
pub struct HttpStore {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();
        Self {
            base_url: base_url.into(),
            agent,
        }
    }

    fn url_for(&self, player: &PlayerId) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), player)
    }
}

impl Store for HttpStore {
    fn load(&self, player: &PlayerId) -> Result<Option<PersistedState>, StoreError> {
        match self.agent.get(&self.url_for(player)).call() {
            Ok(response) => response
                .into_json::<PersistedState>()
                .map(Some)
                .map_err(|e| StoreError::Decode(e.to_string())),
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(e) => Err(StoreError::Http(e.to_string())),
        }
    }

    fn save(&self, player: &PlayerId, state: &PersistedState) -> Result<(), StoreError> {
        self.agent
            .post(&self.url_for(player))
            .send_json(state)
            .map(|_| ())
            .map_err(|e| StoreError::Http(e.to_string()))
    }
}

/// In-memory store for tests and the simulator. Clones share the same
/// backing map so a test can inspect what the controller saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Rc<RefCell<HashMap<String, PersistedState>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player: &PlayerId) -> Option<PersistedState> {
        self.data.borrow().get(player.as_str()).cloned()
    }
}

impl Store for MemoryStore {
    fn load(&self, player: &PlayerId) -> Result<Option<PersistedState>, StoreError> {
        Ok(self.data.borrow().get(player.as_str()).cloned())
    }

    fn save(&self, player: &PlayerId, state: &PersistedState) -> Result<(), StoreError> {
        self.data
            .borrow_mut()
            .insert(player.as_str().to_string(), state.clone());
        Ok(())
    }
}
