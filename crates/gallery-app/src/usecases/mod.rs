//! Business logic use cases
//!
//! SessionStore ──identity──▶ UploadPhoto         (ownership tagging)
//!              └─identity──▶ SubscribeCollection (owner filter)
//!
//! Uploads reach the collection only through the live query's own change
//! delivery.

pub mod session_store;
pub mod subscribe_collection;
pub mod upload_photo;

pub use session_store::{SessionBinding, SessionStore};
pub use subscribe_collection::{SubscribeCollection, SubscriptionHandle};
pub use upload_photo::UploadPhoto;
