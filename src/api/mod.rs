mod error;
mod resource;

pub use error::TeslaApiError;
pub use resource::{Params, Resource};
