use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use self::wall::{Wall, WallConfig};

pub mod address;
pub mod page;
pub mod video;
pub mod view;
pub mod wall;

pub struct State {
    stage: RwLock<Stage>,
    wall: RwLock<Wall>,
    last_ticket: AtomicU64,
}

/// What the loader is doing, shown in the title bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetching(String),
    Reading(String),
    Loaded(usize),
    Failed(String),
}

impl State {
    pub fn new(config: WallConfig) -> Self {
        Self {
            stage: RwLock::new(Stage::Idle),
            wall: RwLock::new(Wall::new(config)),
            last_ticket: AtomicU64::new(0),
        }
    }

    /// Hands out increasing load numbers, in request order.
    pub fn next_ticket(&self) -> u64 {
        self.last_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_latest_ticket(&self, ticket: u64) -> bool {
        self.last_ticket.load(Ordering::SeqCst) == ticket
    }

    pub async fn set_stage_fetching(&self, url: impl Into<String>) {
        *self.stage.write().await = Stage::Fetching(url.into());
    }

    pub async fn set_stage_reading(&self, path: impl Into<String>) {
        *self.stage.write().await = Stage::Reading(path.into());
    }

    pub async fn set_stage_loaded(&self, count: usize) {
        *self.stage.write().await = Stage::Loaded(count);
    }

    pub async fn set_stage_failed(&self, message: impl Into<String>) {
        *self.stage.write().await = Stage::Failed(message.into());
    }

    pub async fn stage(&self) -> RwLockReadGuard<Stage> {
        self.stage.read().await
    }

    pub async fn wall(&self) -> RwLockReadGuard<Wall> {
        self.wall.read().await
    }

    pub async fn wall_mut(&self) -> RwLockWriteGuard<Wall> {
        self.wall.write().await
    }
}
