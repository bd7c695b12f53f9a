//! Events delivered by the chat platform

mod platform_event;

pub use platform_event::{BirthdayCommand, PlatformEvent};
