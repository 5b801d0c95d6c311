//! Card and comment operations

use super::{deleted, failure, list, object, ApiRequest, TrelloClient, Transport};
use crate::app::envelope::Envelope;
use crate::app::error_code::ErrorCode;
use crate::app::models::{Card, Comment};

/// Fields to change on a card
///
/// `None` leaves a field untouched. For `desc`, `due`, `labels` and `members`
/// an empty string is sent as-is and clears the field; empty `name` and
/// `list_id` are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardUpdate {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub due: Option<String>,
    pub list_id: Option<String>,
    pub labels: Option<String>,
    pub members: Option<String>,
}

impl CardUpdate {
    /// Update that only moves the card to another list
    pub fn move_to(list_id: impl Into<String>) -> Self {
        Self {
            list_id: Some(list_id.into()),
            ..Default::default()
        }
    }

    /// Form fields in Trello's naming
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

        [
            ("name", non_empty(&self.name)),
            ("desc", self.desc.clone()),
            ("due", self.due.clone()),
            ("idList", non_empty(&self.list_id)),
            ("idLabels", self.labels.clone()),
            ("idMembers", self.members.clone()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field.to_string(), v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.form_fields().is_empty()
    }
}

impl<'a, T: Transport> TrelloClient<'a, T> {
    pub async fn get_cards(&self, list_id: &str) -> Envelope<Vec<Card>> {
        let request = ApiRequest::get(["lists", list_id, "cards"]);
        list(self.fetch(request).await, "List not found")
    }

    /// Open cards across a whole board
    pub async fn get_all_cards(&self, board_id: &str) -> Envelope<Vec<Card>> {
        let request = ApiRequest::get(["boards", board_id, "cards"]).query("filter", "open");
        list(self.fetch(request).await, "Board not found")
    }

    pub async fn get_card(&self, card_id: &str) -> Envelope<Card> {
        let request = ApiRequest::get(["cards", card_id]);
        object(
            self.fetch(request).await,
            "Card not found",
            ("Card not found", ErrorCode::NotFound),
        )
    }

    /// Creates a card; empty `desc`/`due` are omitted
    pub async fn create_card(
        &self,
        list_id: &str,
        name: &str,
        desc: Option<&str>,
        due: Option<&str>,
    ) -> Envelope<Card> {
        let mut fields = vec![
            ("idList".to_string(), list_id.to_string()),
            ("name".to_string(), name.to_string()),
        ];
        for (field, value) in [("desc", desc), ("due", due)] {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                fields.push((field.to_string(), value.to_string()));
            }
        }

        let request = ApiRequest::post(["cards"]).form(fields);
        object(
            self.fetch(request).await,
            "List not found",
            ("Failed to create card", ErrorCode::CreateFailed),
        )
    }

    /// Sends only the fields present in `update`; nothing to send is `NO_PARAMS`
    pub async fn update_card(&self, card_id: &str, update: &CardUpdate) -> Envelope<Card> {
        let fields = update.form_fields();
        if fields.is_empty() {
            return Envelope::fail("No update parameters provided", ErrorCode::NoParams);
        }

        let request = ApiRequest::put(["cards", card_id]).form(fields);
        object(
            self.fetch(request).await,
            "Card not found",
            ("Failed to update card", ErrorCode::UpdateFailed),
        )
    }

    pub async fn move_card(&self, card_id: &str, list_id: &str) -> Envelope<Card> {
        self.update_card(card_id, &CardUpdate::move_to(list_id)).await
    }

    pub async fn delete_card(&self, card_id: &str) -> Envelope<bool> {
        let request = ApiRequest::delete(["cards", card_id]);
        deleted(self.execute(request).await, "Card not found")
    }

    pub async fn get_comments(&self, card_id: &str) -> Envelope<Vec<Comment>> {
        let request = ApiRequest::get(["cards", card_id, "actions"]).query("filter", "commentCard");
        list(self.fetch(request).await, "Card not found")
    }

    pub async fn add_comment(&self, card_id: &str, text: &str) -> Envelope<Comment> {
        let request = ApiRequest::post(["cards", card_id, "actions", "comments"]).query("text", text);
        match self.fetch::<Comment>(request).await {
            Ok(Some(comment)) => Envelope::success(comment),
            Ok(None) => Envelope::fail("Failed to add comment", ErrorCode::CreateFailed),
            Err(e) => failure(e, "Card not found"),
        }
    }
}
