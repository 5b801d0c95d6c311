//! Trello resource shapes
//!
//! Field names follow the Trello wire format. Unknown fields are ignored and
//! missing ones default, so partial responses (e.g. `fields=` projections)
//! still decode.

use serde::{Deserialize, Serialize};

/// A Trello board
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Board {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub closed: bool,
    pub url: String,
    pub short_url: String,
    pub id_organization: Option<String>,
}

/// A list (column) on a board
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrelloList {
    pub id: String,
    pub name: String,
    pub closed: bool,
    pub id_board: String,
    pub pos: f64,
}

/// A card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub closed: bool,
    pub id_list: String,
    pub id_board: String,
    pub id_labels: Vec<String>,
    pub id_members: Vec<String>,
    pub due: Option<String>,
    pub due_complete: bool,
    pub url: String,
    pub short_url: String,
    pub pos: f64,
    pub date_last_activity: Option<String>,
}

/// A `commentCard` action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    pub id: String,
    pub date: String,
    pub data: CommentData,
    pub member_creator: Member,
}

/// Payload of a comment action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentData {
    pub text: String,
}

/// A Trello member, as returned by `/members/me` and embedded in actions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Member {
    pub id: String,
    pub full_name: String,
    pub username: String,
}

/// A checklist on a card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Checklist {
    pub id: String,
    pub name: String,
    pub id_card: String,
    pub id_board: String,
    pub pos: f64,
    pub check_items: Vec<ChecklistItem>,
}

/// One item of a checklist
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistItem {
    pub id: String,
    pub name: String,
    pub state: String,
    pub pos: f64,
    pub id_checklist: String,
}

/// A file or link attached to a card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub url: String,
    pub bytes: Option<u64>,
    pub mime_type: Option<String>,
    pub date: Option<String>,
    pub is_upload: bool,
    pub file_name: Option<String>,
    pub pos: f64,
}

/// Completion state of a checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckItemState {
    Complete,
    Incomplete,
}

impl CheckItemState {
    /// Case-insensitive parse of `complete` / `incomplete`
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "complete" => Some(CheckItemState::Complete),
            "incomplete" => Some(CheckItemState::Incomplete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CheckItemState::Complete => "complete",
            CheckItemState::Incomplete => "incomplete",
        }
    }
}
