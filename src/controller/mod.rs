pub mod public_key;
pub mod send;
pub mod subscribe;
pub mod unsubscribe;
pub mod version;
