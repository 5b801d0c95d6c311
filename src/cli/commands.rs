//! Command table and dispatcher
//!
//! Every command name maps to one [`CommandSpec`]. Its row drives both
//! validation before dispatch and the help output. Dispatch always ends in an
//! [`Envelope`]: unknown commands, missing credentials, missing arguments,
//! failed API calls and even panics all come back as failure envelopes.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::Path;

use futures::FutureExt;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::app::{CardUpdate, CheckItemState, Envelope, ErrorCode, Transport, TrelloClient};
use crate::auth::{CredentialResolver, Credentials};
use crate::cli::args::Invocation;
use crate::constants::{auth, env as env_constants, APP_NAME, VERSION};

/// Commands that never need credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalCommand {
    Help,
    Version,
    SetAuth,
    ClearAuth,
}

/// Commands that call the Trello API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCommand {
    CheckAuth,
    GetBoards,
    GetBoard,
    GetLists,
    CreateList,
    GetCards,
    GetAllCards,
    GetCard,
    CreateCard,
    UpdateCard,
    MoveCard,
    DeleteCard,
    GetComments,
    AddComment,
    ListAttachments,
    GetAttachment,
    UploadAttachment,
    AttachUrl,
    DeleteAttachment,
    GetChecklists,
    CreateChecklist,
    DeleteChecklist,
    AddChecklistItem,
    UpdateChecklistItem,
    DeleteChecklistItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Local(LocalCommand),
    Remote(RemoteCommand),
}

impl Command {
    /// Only remote commands pass the credential gate
    pub fn is_authenticated(self) -> bool {
        matches!(self, Command::Remote(_))
    }
}

/// A required positional argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    /// Name shown in usage text
    pub name: &'static str,
    /// Name used in `MISSING_PARAM` messages
    pub label: &'static str,
}

const fn param(name: &'static str, label: &'static str) -> Param {
    Param { name, label }
}

const API_KEY: Param = param("api-key", "API key");
const TOKEN: Param = param("token", "Token");
const BOARD_ID: Param = param("board-id", "Board ID");
const LIST_ID: Param = param("list-id", "List ID");
const CARD_ID: Param = param("card-id", "Card ID");
const ATTACHMENT_ID: Param = param("attachment-id", "Attachment ID");
const CHECKLIST_ID: Param = param("checklist-id", "Checklist ID");
const ITEM_ID: Param = param("item-id", "Checklist item ID");

/// One row of the command table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub command: Command,
    pub name: &'static str,
    pub positionals: &'static [Param],
    pub options: &'static [&'static str],
    pub summary: &'static str,
}

impl CommandSpec {
    /// Finds a command by its token
    ///
    /// A leading `--` is optional, and `-h` / `-v` are short aliases for
    /// help and version.
    pub fn lookup(token: &str) -> Option<&'static CommandSpec> {
        let name = match token {
            "-h" => "help",
            "-v" => "version",
            other => other.strip_prefix("--").unwrap_or(other),
        };
        COMMANDS.iter().find(|spec| spec.name == name)
    }

    /// Label of the first required positional that is empty
    pub fn missing_positional(&self, invocation: &Invocation) -> Option<&'static str> {
        self.positionals
            .iter()
            .enumerate()
            .find(|(index, _)| invocation.positional(index + 1).is_empty())
            .map(|(_, param)| param.label)
    }

    /// Usage line for help output
    pub fn usage(&self) -> String {
        let mut usage = self.name.to_string();
        for param in self.positionals {
            usage.push_str(&format!(" <{}>", param.name));
        }
        for option in self.options {
            usage.push_str(&format!(" [{} <value>]", option));
        }
        usage
    }
}

macro_rules! local {
    ($variant:ident, $name:literal, [$($param:expr),*], $summary:literal) => {
        CommandSpec {
            command: Command::Local(LocalCommand::$variant),
            name: $name,
            positionals: &[$($param),*],
            options: &[],
            summary: $summary,
        }
    };
}

macro_rules! remote {
    ($variant:ident, $name:literal, [$($param:expr),*], [$($option:literal),*], $summary:literal) => {
        CommandSpec {
            command: Command::Remote(RemoteCommand::$variant),
            name: $name,
            positionals: &[$($param),*],
            options: &[$($option),*],
            summary: $summary,
        }
    };
}

/// Every supported command
pub static COMMANDS: &[CommandSpec] = &[
    local!(Help, "help", [], "Show this help"),
    local!(Version, "version", [], "Show the version"),
    local!(SetAuth, "set-auth", [API_KEY, TOKEN], "Save API key and token"),
    local!(ClearAuth, "clear-auth", [], "Remove saved credentials"),
    remote!(CheckAuth, "check-auth", [], [], "Verify credentials against Trello"),
    remote!(GetBoards, "get-boards", [], [], "List open boards"),
    remote!(GetBoard, "get-board", [BOARD_ID], [], "Get a board"),
    remote!(GetLists, "get-lists", [BOARD_ID], [], "List open lists on a board"),
    remote!(
        CreateList,
        "create-list",
        [BOARD_ID, param("name", "List name")],
        [],
        "Create a list on a board"
    ),
    remote!(GetCards, "get-cards", [LIST_ID], [], "List cards in a list"),
    remote!(GetAllCards, "get-all-cards", [BOARD_ID], [], "List open cards on a board"),
    remote!(GetCard, "get-card", [CARD_ID], [], "Get a card"),
    remote!(
        CreateCard,
        "create-card",
        [LIST_ID, param("name", "Card name")],
        ["--desc", "--due"],
        "Create a card"
    ),
    remote!(
        UpdateCard,
        "update-card",
        [CARD_ID],
        ["--name", "--desc", "--due", "--labels", "--members"],
        "Update card fields"
    ),
    remote!(MoveCard, "move-card", [CARD_ID, LIST_ID], [], "Move a card to another list"),
    remote!(DeleteCard, "delete-card", [CARD_ID], [], "Delete a card"),
    remote!(GetComments, "get-comments", [CARD_ID], [], "List comments on a card"),
    remote!(
        AddComment,
        "add-comment",
        [CARD_ID, param("text", "Comment text")],
        [],
        "Comment on a card"
    ),
    remote!(ListAttachments, "list-attachments", [CARD_ID], [], "List attachments on a card"),
    remote!(
        GetAttachment,
        "get-attachment",
        [CARD_ID, ATTACHMENT_ID],
        [],
        "Get an attachment"
    ),
    remote!(
        UploadAttachment,
        "upload-attachment",
        [CARD_ID, param("file-path", "File path")],
        ["--name"],
        "Upload a local file to a card"
    ),
    remote!(
        AttachUrl,
        "attach-url",
        [CARD_ID, param("url", "URL")],
        ["--name"],
        "Attach a link to a card"
    ),
    remote!(
        DeleteAttachment,
        "delete-attachment",
        [CARD_ID, ATTACHMENT_ID],
        [],
        "Delete an attachment"
    ),
    remote!(GetChecklists, "get-checklists", [CARD_ID], [], "List checklists on a card"),
    remote!(
        CreateChecklist,
        "create-checklist",
        [CARD_ID, param("name", "Checklist name")],
        [],
        "Create a checklist on a card"
    ),
    remote!(DeleteChecklist, "delete-checklist", [CHECKLIST_ID], [], "Delete a checklist"),
    remote!(
        AddChecklistItem,
        "add-checklist-item",
        [CHECKLIST_ID, param("name", "Item name")],
        [],
        "Add an item to a checklist"
    ),
    remote!(
        UpdateChecklistItem,
        "update-checklist-item",
        [CARD_ID, ITEM_ID, param("state", "State")],
        [],
        "Mark an item complete or incomplete"
    ),
    remote!(
        DeleteChecklistItem,
        "delete-checklist-item",
        [CHECKLIST_ID, ITEM_ID],
        [],
        "Delete a checklist item"
    ),
];

/// Routes invocations to the Trello client or to local credential handling
///
/// Either half may be unavailable (bad settings, no home directory). Commands
/// that need the missing half fail with its reason; the rest still run.
#[derive(Debug)]
pub struct Dispatcher<T> {
    transport: Result<T, String>,
    resolver: Result<CredentialResolver, String>,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T, resolver: CredentialResolver) -> Self {
        Self::from_parts(Ok(transport), Ok(resolver))
    }

    pub fn from_parts(
        transport: Result<T, String>,
        resolver: Result<CredentialResolver, String>,
    ) -> Self {
        Self {
            transport,
            resolver,
        }
    }

    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref().ok()
    }

    pub fn resolver(&self) -> Option<&CredentialResolver> {
        self.resolver.as_ref().ok()
    }

    /// Runs one invocation to completion
    pub async fn dispatch(&self, invocation: &Invocation) -> Envelope<Value> {
        match AssertUnwindSafe(self.route(invocation)).catch_unwind().await {
            Ok(envelope) => envelope,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Command panicked: {}", message);
                Envelope::fail(message, ErrorCode::Error)
            }
        }
    }

    async fn route(&self, invocation: &Invocation) -> Envelope<Value> {
        // An empty command line shows help
        let token = invocation.command().unwrap_or("help");
        let Some(spec) = CommandSpec::lookup(token) else {
            return Envelope::fail(format!("Unknown command: {}", token), ErrorCode::UnknownCommand);
        };
        debug!("Dispatching {}", spec.name);

        match spec.command {
            Command::Local(command) => {
                if let Some(label) = spec.missing_positional(invocation) {
                    return missing(label);
                }
                self.run_local(command, invocation)
            }
            Command::Remote(command) => {
                let resolver = match &self.resolver {
                    Ok(resolver) => resolver,
                    Err(reason) => return Envelope::fail(reason.as_str(), ErrorCode::AuthError),
                };
                let credentials = match resolver.validate() {
                    Ok(credentials) => credentials,
                    Err(e) => return Envelope::fail(e.to_string(), ErrorCode::AuthError),
                };
                if let Some(label) = spec.missing_positional(invocation) {
                    return missing(label);
                }
                let transport = match &self.transport {
                    Ok(transport) => transport,
                    Err(reason) => return Envelope::fail(reason.as_str(), ErrorCode::Error),
                };
                self.run_remote(transport, command, credentials, invocation)
                    .await
            }
        }
    }

    fn run_local(&self, command: LocalCommand, invocation: &Invocation) -> Envelope<Value> {
        match command {
            LocalCommand::Help => Envelope::success(help_data()),
            LocalCommand::Version => Envelope::success(json!({ "name": APP_NAME, "version": VERSION })),
            LocalCommand::SetAuth => {
                let store = match &self.resolver {
                    Ok(resolver) => resolver.store(),
                    Err(reason) => return Envelope::fail(reason.as_str(), ErrorCode::SaveError),
                };
                let credentials =
                    Credentials::new(invocation.positional(1), invocation.positional(2));
                match store.save(&credentials) {
                    Ok(()) => Envelope::success(json!({
                        "message": format!("Auth saved to {}", store.path().display())
                    })),
                    Err(e) => Envelope::fail(e.to_string(), ErrorCode::SaveError),
                }
            }
            LocalCommand::ClearAuth => {
                let store = match &self.resolver {
                    Ok(resolver) => resolver.store(),
                    Err(reason) => return Envelope::fail(reason.as_str(), ErrorCode::ClearError),
                };
                match store.clear() {
                    Ok(()) => {
                        info!("Credentials cleared");
                        Envelope::success(json!({ "message": "Auth cleared" }))
                    }
                    Err(e) => Envelope::fail(e.to_string(), ErrorCode::ClearError),
                }
            }
        }
    }

    async fn run_remote(
        &self,
        transport: &T,
        command: RemoteCommand,
        credentials: Credentials,
        invocation: &Invocation,
    ) -> Envelope<Value> {
        let client = TrelloClient::new(transport, credentials);
        let arg = |index| invocation.positional(index);

        match command {
            RemoteCommand::CheckAuth => client.check_auth().await.into_value(),
            RemoteCommand::GetBoards => client.get_boards().await.into_value(),
            RemoteCommand::GetBoard => client.get_board(arg(1)).await.into_value(),
            RemoteCommand::GetLists => client.get_lists(arg(1)).await.into_value(),
            RemoteCommand::CreateList => client.create_list(arg(1), arg(2)).await.into_value(),
            RemoteCommand::GetCards => client.get_cards(arg(1)).await.into_value(),
            RemoteCommand::GetAllCards => client.get_all_cards(arg(1)).await.into_value(),
            RemoteCommand::GetCard => client.get_card(arg(1)).await.into_value(),
            RemoteCommand::CreateCard => client
                .create_card(
                    arg(1),
                    arg(2),
                    invocation.named("--desc"),
                    invocation.named("--due"),
                )
                .await
                .into_value(),
            RemoteCommand::UpdateCard => {
                let update = CardUpdate {
                    name: invocation.named_owned("--name"),
                    desc: invocation.named_owned("--desc"),
                    due: invocation.named_owned("--due"),
                    list_id: None,
                    labels: invocation.named_owned("--labels"),
                    members: invocation.named_owned("--members"),
                };
                client.update_card(arg(1), &update).await.into_value()
            }
            RemoteCommand::MoveCard => client.move_card(arg(1), arg(2)).await.into_value(),
            RemoteCommand::DeleteCard => client.delete_card(arg(1)).await.into_value(),
            RemoteCommand::GetComments => client.get_comments(arg(1)).await.into_value(),
            RemoteCommand::AddComment => client.add_comment(arg(1), arg(2)).await.into_value(),
            RemoteCommand::ListAttachments => client.list_attachments(arg(1)).await.into_value(),
            RemoteCommand::GetAttachment => {
                client.get_attachment(arg(1), arg(2)).await.into_value()
            }
            RemoteCommand::UploadAttachment => client
                .upload_attachment(arg(1), Path::new(arg(2)), invocation.named("--name"))
                .await
                .into_value(),
            RemoteCommand::AttachUrl => client
                .attach_url(arg(1), arg(2), invocation.named("--name"))
                .await
                .into_value(),
            RemoteCommand::DeleteAttachment => {
                client.delete_attachment(arg(1), arg(2)).await.into_value()
            }
            RemoteCommand::GetChecklists => client.get_checklists(arg(1)).await.into_value(),
            RemoteCommand::CreateChecklist => {
                client.create_checklist(arg(1), arg(2)).await.into_value()
            }
            RemoteCommand::DeleteChecklist => client.delete_checklist(arg(1)).await.into_value(),
            RemoteCommand::AddChecklistItem => {
                client.add_checklist_item(arg(1), arg(2)).await.into_value()
            }
            RemoteCommand::UpdateChecklistItem => match CheckItemState::parse(arg(3)) {
                Some(state) => client
                    .update_checklist_item(arg(1), arg(2), state)
                    .await
                    .into_value(),
                None => Envelope::fail(
                    "State must be 'complete' or 'incomplete'",
                    ErrorCode::InvalidParam,
                ),
            },
            RemoteCommand::DeleteChecklistItem => client
                .delete_checklist_item(arg(1), arg(2))
                .await
                .into_value(),
        }
    }
}

fn missing(label: &str) -> Envelope<Value> {
    Envelope::fail(format!("{} required", label), ErrorCode::MissingParam)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unexpected internal error".to_string()
    }
}

/// Structured help payload
pub fn help_data() -> Value {
    let commands: Vec<Value> = COMMANDS
        .iter()
        .map(|spec| {
            json!({
                "name": spec.name,
                "usage": spec.usage(),
                "summary": spec.summary,
                "requiresAuth": spec.command.is_authenticated(),
            })
        })
        .collect();

    json!({
        "name": APP_NAME,
        "version": VERSION,
        "usage": format!("{} <command> [args...] [--flag value]...", APP_NAME),
        "auth": [
            format!("{} set-auth <api-key> <token>", APP_NAME),
            format!("{} and {} environment variables", env_constants::API_KEY, env_constants::TOKEN),
            format!("Get credentials: {}", auth::APP_KEY_URL),
        ],
        "commands": commands,
        "notes": [
            "Downloading attachments is not supported: Trello's download API requires browser authentication. Use attach-url to link attachments.",
        ],
    })
}
