pub mod payments;
pub mod properties;
pub mod reminders;
pub mod tenancies;
