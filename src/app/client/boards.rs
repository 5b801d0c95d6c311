//! Board, list and member operations

use super::{failure, list, object, ApiRequest, TrelloClient, Transport};
use crate::app::envelope::Envelope;
use crate::app::error_code::ErrorCode;
use crate::app::models::{Board, Member, TrelloList};

impl<'a, T: Transport> TrelloClient<'a, T> {
    /// Live credential check against `/members/me`
    pub async fn check_auth(&self) -> Envelope<Member> {
        let request = ApiRequest::get(["members", "me"]).query("fields", "id,username,fullName");
        match self.fetch::<Member>(request).await {
            Ok(Some(member)) => {
                tracing::info!("Authenticated as {}", member.username);
                Envelope::success(member)
            }
            Ok(None) => Envelope::fail("Failed to verify credentials", ErrorCode::Error),
            Err(e) => failure(e, "Member not found"),
        }
    }

    /// Open boards of the authenticated member
    pub async fn get_boards(&self) -> Envelope<Vec<Board>> {
        let request = ApiRequest::get(["members", "me", "boards"]).query("filter", "open");
        list(self.fetch(request).await, "Member not found")
    }

    pub async fn get_board(&self, board_id: &str) -> Envelope<Board> {
        let request = ApiRequest::get(["boards", board_id]);
        object(
            self.fetch(request).await,
            "Board not found",
            ("Board not found", ErrorCode::NotFound),
        )
    }

    /// Open lists of a board
    pub async fn get_lists(&self, board_id: &str) -> Envelope<Vec<TrelloList>> {
        let request = ApiRequest::get(["boards", board_id, "lists"]).query("filter", "open");
        list(self.fetch(request).await, "Board not found")
    }

    pub async fn create_list(&self, board_id: &str, name: &str) -> Envelope<TrelloList> {
        let request = ApiRequest::post(["lists"])
            .query("name", name)
            .query("idBoard", board_id);
        object(
            self.fetch(request).await,
            "Board not found",
            ("Failed to create list", ErrorCode::CreateFailed),
        )
    }
}
