pub mod belief;
pub mod error;
pub mod forecast;
pub mod observation;
pub mod tracker;

#[cfg(feature = "python")]
pub mod python;
