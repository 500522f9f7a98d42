mod push;
mod subscription;

pub use push::{
    Claims, ContentEncoding, PayloadData, PushHeader, PushPayload, Urgency,
};
pub use subscription::{
    SubscribeRequest, SubscriptionKeys, UnsubscribeRequest,
};
