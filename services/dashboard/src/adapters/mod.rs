pub mod notifier;
pub mod rest;
pub mod wire;

pub use notifier::{ChannelNotifier, TracingNotifier};
pub use rest::RestApiClient;
