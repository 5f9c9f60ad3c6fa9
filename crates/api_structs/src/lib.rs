mod message;
mod reminder;
mod status;
mod sweep;

pub mod dtos {
    pub use crate::reminder::dtos::*;
    pub use crate::sweep::dtos::*;
}

pub use crate::message::api::*;
pub use crate::reminder::api::*;
pub use crate::status::api::*;
pub use crate::sweep::api::*;
