mod chat_port;
mod fetch_port;
mod gateway_port;

pub use chat_port::ChatPort;
pub use fetch_port::FetchPort;
pub use gateway_port::{AttachmentRef, ChatEvent};
