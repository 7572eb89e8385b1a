pub mod combine;
pub mod extract;
pub mod harvest;
