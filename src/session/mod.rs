mod connectivity;
mod controller;
mod conversations;
mod credits;
mod stream;

pub use connectivity::{ConnectionStatus, ConnectivityMonitor};
pub use controller::SessionController;
pub use conversations::ConversationListManager;
pub use credits::CreditGate;
pub use stream::MessageStream;
