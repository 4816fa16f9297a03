//! Draw results: winner animals and winning bets.

use bicho_core::WinnerId;
use tracing::instrument;

use super::{ApiError, BackendClient, Winner, WinnerAnimal, segment};

impl BackendClient {
    /// List drawn animals with their winners.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_animals(&self) -> Result<Vec<WinnerAnimal>, ApiError> {
        self.get("/animal").await
    }

    /// The most recent draw, `None` before the first one.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn current_winner_animal(&self) -> Result<Option<WinnerAnimal>, ApiError> {
        self.get("/animal/winner/current").await
    }

    /// List winning bets.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_winners(&self) -> Result<Vec<Winner>, ApiError> {
        self.get("/winner").await
    }

    /// Mark a winner as paid.
    ///
    /// # Errors
    ///
    /// Returns error if the backend refuses.
    #[instrument(skip(self), fields(winner_id = %id))]
    pub async fn pay_winner(&self, id: &WinnerId) -> Result<(), ApiError> {
        self.patch::<()>(&format!("/winner/pay/{}", segment(id.as_str())), None)
            .await
    }
}
