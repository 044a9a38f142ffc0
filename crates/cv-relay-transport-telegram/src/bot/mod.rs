/// Event classification and the reply route table
pub mod dispatch;
/// Command and message handlers
pub mod handlers;
