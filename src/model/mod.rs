mod push_subscription;
mod table;

pub use push_subscription::{NewPushSubscription, PushSubscription};
pub use table::Table;
