pub mod auth;
pub mod engagement;
pub mod feed_assembler;
pub mod feed_controller;
pub mod profile_directory;
pub mod profile_editor;
pub mod ranking;
pub mod validation;

pub use auth::AuthService;
pub use engagement::Engagement;
pub use feed_assembler::FeedAssembler;
pub use feed_controller::FeedController;
pub use profile_directory::ProfileDirectory;
pub use profile_editor::{AvatarUpload, ProfileEditor};
