use serde::{Deserialize, Serialize};

use crate::broker::{Message, Stats};

/// JSON bodies returned by the server. The `kind` field tells the client
/// which payload it is looking at.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind")]
pub enum ServerMessage {
    #[serde(rename = "message")]
    Message(Message),

    #[serde(rename = "stats")]
    Stats(Stats),
}

impl ServerMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::Message(_) => "message",
            ServerMessage::Stats(_) => "stats",
        }
    }
}
