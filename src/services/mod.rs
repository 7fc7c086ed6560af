pub mod announcements;
pub use announcements::{Announcement, AnnouncementBoard, AnnouncementError};

pub mod auth_service;
pub use auth_service::{AuthError, AuthService, RegisteredUser, UserInfo};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod password;
