pub mod campus;
pub mod chat;
pub mod doctor;
pub mod onboard;
