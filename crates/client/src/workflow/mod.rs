//! Admin workflows over orders and custom requests.
//!
//! A workflow holds the collection an admin view displays and drives status
//! transitions on it. Transitions are validated against the status machine
//! in `atelier_core` before any request is sent, and after every successful
//! mutation the whole collection is fetched again. Nothing is updated
//! optimistically: on failure the displayed collection is left as it was.
//!
//! An `Unauthenticated` failure anywhere in a workflow clears the session
//! credential. Every other failure is handed back unchanged.

mod orders;
mod requests;

pub use orders::OrderWorkflow;
pub use requests::CustomRequestWorkflow;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::session::SessionStore;

// =============================================================================
// Board
// =============================================================================

/// Ticket for one fetch into a [`Board`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Ticket(u64);

/// Collection shown by a view, protected against stale fetch results.
///
/// Every fetch takes a [`Ticket`] before it starts. When it finishes, its
/// result is applied only if the board is still attached and no later
/// ticket has been applied in the meantime.
#[derive(Debug)]
pub(crate) struct Board<T> {
    state: Arc<RwLock<BoardState<T>>>,
}

#[derive(Debug)]
struct BoardState<T> {
    items: Vec<T>,
    issued: u64,
    applied: u64,
    attached: bool,
}

impl<T> Clone for Board<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone> Board<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(BoardState {
                items: Vec::new(),
                issued: 0,
                applied: 0,
                attached: true,
            })),
        }
    }

    /// Reserve a ticket for a fetch that is about to start.
    pub(crate) async fn begin(&self) -> Ticket {
        let mut state = self.state.write().await;
        state.issued += 1;
        Ticket(state.issued)
    }

    /// Apply a fetch result. Returns whether it was applied.
    pub(crate) async fn apply(&self, ticket: Ticket, items: Vec<T>) -> bool {
        let mut state = self.state.write().await;
        if !state.attached || ticket.0 <= state.applied {
            tracing::debug!(
                ticket = ticket.0,
                applied = state.applied,
                attached = state.attached,
                "Discarding stale result"
            );
            return false;
        }
        state.items = items;
        state.applied = ticket.0;
        true
    }

    pub(crate) async fn snapshot(&self) -> Vec<T> {
        self.state.read().await.items.clone()
    }

    pub(crate) async fn find<R>(&self, f: impl FnMut(&T) -> Option<R>) -> Option<R> {
        self.state.read().await.items.iter().find_map(f)
    }

    /// Stop applying results. In-flight fetches still complete.
    pub(crate) async fn detach(&self) {
        self.state.write().await.attached = false;
    }
}

/// Clear the credential if `result` failed as unauthenticated, then return it.
pub(crate) async fn force_logout_on_auth_failure<T>(
    session: &SessionStore,
    result: Result<T, ApiError>,
) -> Result<T, ApiError> {
    if result.as_ref().is_err_and(ApiError::is_unauthenticated) {
        tracing::warn!("Credential rejected by backend, signing out");
        if let Err(e) = session.clear_credential().await {
            tracing::warn!(error = %e, "Failed to clear stored credential");
        }
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::{CredentialSlot, MemorySlot, SessionError};

    /// A slot that accepts tokens but cannot remove them.
    #[derive(Debug, Default)]
    struct StickySlot(MemorySlot);

    impl CredentialSlot for StickySlot {
        fn load(&self) -> Result<Option<String>, SessionError> {
            self.0.load()
        }

        fn store(&self, token: &str) -> Result<(), SessionError> {
            self.0.store(token)
        }

        fn clear(&self) -> Result<(), SessionError> {
            Err(SessionError::Io {
                path: "session.json".into(),
                source: std::io::Error::other("read-only"),
            })
        }
    }

    #[tokio::test]
    async fn test_board_applies_in_order() {
        let board = Board::new();
        let first = board.begin().await;
        assert!(board.apply(first, vec![1]).await);
        let second = board.begin().await;
        assert!(board.apply(second, vec![1, 2]).await);
        assert_eq!(board.snapshot().await, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_board_discards_older_result() {
        let board = Board::new();
        let slow = board.begin().await;
        let fast = board.begin().await;
        assert!(board.apply(fast, vec!["fresh"]).await);
        assert!(!board.apply(slow, vec!["stale"]).await);
        assert_eq!(board.snapshot().await, vec!["fresh"]);
    }

    #[tokio::test]
    async fn test_board_discards_after_detach() {
        let board = Board::new();
        let ticket = board.begin().await;
        board.detach().await;
        assert!(!board.apply(ticket, vec![1]).await);
        assert!(board.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_board_clones_share_state() {
        let board = Board::new();
        let view = board.clone();
        let ticket = board.begin().await;
        board.apply(ticket, vec![7]).await;
        assert_eq!(view.find(|n| (*n == 7).then_some(*n)).await, Some(7));
    }

    #[tokio::test]
    async fn test_auth_failure_clears_credential() {
        let session = SessionStore::in_memory();
        session.set_credential("tok").await.unwrap();

        let result: Result<(), ApiError> =
            Err(ApiError::Unauthenticated("Could not validate credentials".into()));
        let result = force_logout_on_auth_failure(&session, result).await;

        assert!(result.unwrap_err().is_unauthenticated());
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_auth_failure_keeps_api_error_when_storage_fails() {
        let session = SessionStore::open(StickySlot::default()).unwrap();
        session.set_credential("tok").await.unwrap();

        let result: Result<(), ApiError> = Err(ApiError::Unauthenticated("expired".into()));
        let err = force_logout_on_auth_failure(&session, result)
            .await
            .unwrap_err();

        assert!(err.is_unauthenticated());
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_other_failures_keep_credential() {
        let session = SessionStore::in_memory();
        session.set_credential("tok").await.unwrap();

        let result: Result<(), ApiError> = Err(ApiError::NotFound("Order not found".into()));
        let _ = force_logout_on_auth_failure(&session, result).await;

        assert!(session.is_authenticated().await);
    }
}
