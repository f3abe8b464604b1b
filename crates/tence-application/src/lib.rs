pub mod bootstrap;
pub mod chat_session;
pub mod exchange;


pub use bootstrap::open_session;
pub use chat_session::ChatSession;
pub use exchange::{ChatExchange, ChatRequest, SessionStatus, TurnOutcome};
