pub mod api;
pub mod channel;
pub mod registry;
pub mod resource;

// Re-export commonly used types for embedders and tests
pub use api::{HttpAuthHandlerApi, WebViewApi, WebViewClientApi};
pub use channel::{ChannelMessenger, Messenger, Notification};
pub use registry::{InstanceId, InstanceRegistry, ReferenceKind};
