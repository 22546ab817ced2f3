//! Photo gallery application orchestration layer
//!
//! Use cases for the session lifecycle, photo upload and the live
//! collection subscription, plus the [`PhotoGallery`] facade the
//! presentation surface talks to.

pub mod deps;
pub mod gallery;
mod task;
pub mod usecases;

pub use deps::AppDeps;
pub use gallery::PhotoGallery;
pub use usecases::{
    SessionBinding, SessionStore, SubscribeCollection, SubscriptionHandle, UploadPhoto,
};
