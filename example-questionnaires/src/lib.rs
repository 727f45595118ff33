pub mod business_intake;
pub mod demo;

pub use business_intake::{BUSINESS_INTAKE_TITLE, business_intake};
pub use demo::demo;
