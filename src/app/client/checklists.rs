//! Checklist and checklist item operations

use super::{deleted, list, object, ApiRequest, TrelloClient, Transport};
use crate::app::envelope::Envelope;
use crate::app::error_code::ErrorCode;
use crate::app::models::{CheckItemState, Checklist, ChecklistItem};

impl<'a, T: Transport> TrelloClient<'a, T> {
    pub async fn get_checklists(&self, card_id: &str) -> Envelope<Vec<Checklist>> {
        let request = ApiRequest::get(["cards", card_id, "checklists"]);
        list(self.fetch(request).await, "Card not found")
    }

    pub async fn create_checklist(&self, card_id: &str, name: &str) -> Envelope<Checklist> {
        let request = ApiRequest::post(["checklists"])
            .query("idCard", card_id)
            .query("name", name);
        object(
            self.fetch(request).await,
            "Card not found",
            ("Failed to create checklist", ErrorCode::CreateFailed),
        )
    }

    pub async fn delete_checklist(&self, checklist_id: &str) -> Envelope<bool> {
        let request = ApiRequest::delete(["checklists", checklist_id]);
        deleted(self.execute(request).await, "Checklist not found")
    }

    pub async fn add_checklist_item(&self, checklist_id: &str, name: &str) -> Envelope<ChecklistItem> {
        let request = ApiRequest::post(["checklists", checklist_id, "checkItems"]).query("name", name);
        object(
            self.fetch(request).await,
            "Checklist not found",
            ("Failed to add checklist item", ErrorCode::CreateFailed),
        )
    }

    /// Marks an item complete or incomplete; Trello addresses items through the card
    pub async fn update_checklist_item(
        &self,
        card_id: &str,
        item_id: &str,
        state: CheckItemState,
    ) -> Envelope<ChecklistItem> {
        let request =
            ApiRequest::put(["cards", card_id, "checkItem", item_id]).query("state", state.as_str());
        object(
            self.fetch(request).await,
            "Checklist item not found",
            ("Failed to update checklist item", ErrorCode::UpdateFailed),
        )
    }

    pub async fn delete_checklist_item(&self, checklist_id: &str, item_id: &str) -> Envelope<bool> {
        let request = ApiRequest::delete(["checklists", checklist_id, "checkItems", item_id]);
        deleted(self.execute(request).await, "Checklist item not found")
    }
}
