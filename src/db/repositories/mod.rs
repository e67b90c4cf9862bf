mod code_repository;
mod payment_repository;
mod property_repository;
mod reminder_repository;
mod tenancy_repository;
mod user_repository;

pub use code_repository::CodeRepository;
pub use payment_repository::PaymentRepository;
pub use property_repository::PropertyRepository;
pub use reminder_repository::ReminderRepository;
pub use tenancy_repository::TenancyRepository;
pub use user_repository::UserRepository;
