//! Typed response models and value objects.

mod rectangle;
mod registration;
mod shape;

pub use rectangle::Rectangle;
pub use registration::{
    RegistrationFailureResponse, RegistrationOutcome, RegistrationRequest,
    RegistrationSuccessResponse,
};
pub use shape::{SchemaMismatch, parse};
