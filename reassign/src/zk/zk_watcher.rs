use zookeeper::{KeeperState, WatchedEvent, Watcher};

/// Session watcher for the read-only admin client. No znode watches are
/// registered, so only session state changes arrive here.
pub struct SessionWatcher {}

impl SessionWatcher {
    pub fn init() -> SessionWatcher {
        SessionWatcher {}
    }
}

impl Watcher for SessionWatcher {
    fn handle(&self, event: WatchedEvent) {
        match event.keeper_state {
            KeeperState::Disconnected | KeeperState::Expired | KeeperState::AuthFailed => {
                tracing::warn!(state = ?event.keeper_state, "zookeeper session lost");
            }
            state => {
                tracing::debug!(?state, path = ?event.path, "zookeeper event");
            }
        }
    }
}
