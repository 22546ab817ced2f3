//! Photo gallery host: configuration loading, tracing setup and dependency
//! wiring around the [`gallery_app::PhotoGallery`] workflow.

pub mod bootstrap;

pub use gallery_app::PhotoGallery;
pub use gallery_core::AppConfig;
