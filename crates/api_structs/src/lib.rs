mod event;
mod reminder;
mod status;
mod task;
mod user;

pub mod dtos {
    pub use crate::event::dtos::*;
    pub use crate::reminder::dtos::*;
    pub use crate::task::dtos::*;
    pub use crate::user::dtos::*;
}

pub use crate::event::api::*;
pub use crate::reminder::api::*;
pub use crate::status::api::*;
pub use crate::task::api::*;
pub use crate::user::api::*;
