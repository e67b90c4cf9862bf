mod connection_code;
mod payment;
mod property;
mod reminder;
mod tenancy;
mod user;

pub use connection_code::*;
pub use payment::*;
pub use property::*;
pub use reminder::*;
pub use tenancy::*;
pub use user::*;
