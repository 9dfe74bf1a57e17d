/// `chat` package protobuf definitions and service.
pub mod chat {
    hrpc::include_proto!("chat");
}

/// Endpoint identifiers of the chat service, as sent on the wire.
pub mod endpoints {
    pub const JOIN: &str = "/chat.Chat/Join";
    pub const SEND: &str = "/chat.Chat/Send";
    pub const GET_MESSAGES: &str = "/chat.Chat/GetMessages";
    pub const LEAVE: &str = "/chat.Chat/Leave";
}
