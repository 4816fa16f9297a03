//! Bet endpoints.

use bicho_core::BetId;
use tracing::instrument;

use super::{ApiError, BackendClient, Bet, PendingBet, segment};

impl BackendClient {
    /// List confirmed bets.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_bets(&self) -> Result<Vec<Bet>, ApiError> {
        self.get("/bet").await
    }

    /// Delete a confirmed bet.
    ///
    /// # Errors
    ///
    /// Returns error if the backend refuses.
    #[instrument(skip(self), fields(bet_id = %id))]
    pub async fn delete_bet(&self, id: &BetId) -> Result<(), ApiError> {
        self.delete(&format!("/bet/delete/{}", segment(id.as_str())))
            .await
    }

    /// List bets awaiting validation.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_pending_bets(&self) -> Result<Vec<PendingBet>, ApiError> {
        self.get("/bet/pending/all").await
    }

    /// Confirm a pending bet by its validation token.
    ///
    /// # Errors
    ///
    /// Returns error if the backend refuses; the error usually carries a
    /// message worth showing.
    #[instrument(skip(self, token))]
    pub async fn validate_bet(&self, token: &str) -> Result<(), ApiError> {
        self.post_empty(&format!("/bet/validate/{}", segment(token)))
            .await
    }
}
