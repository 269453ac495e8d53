//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod magic_link_sender;
mod todo_repository;
mod verification_code_generator;
mod verification_repository;

#[cfg(test)]
pub(crate) use magic_link_sender::MockMagicLinkSender;
pub use magic_link_sender::{MagicLinkDeliveryError, MagicLinkMessage, MagicLinkSender};
#[cfg(test)]
pub(crate) use todo_repository::MockTodoRepository;
pub use todo_repository::{TodoChanges, TodoRepository, TodoRepositoryError};
#[cfg(test)]
pub(crate) use verification_code_generator::MockVerificationCodeGenerator;
pub use verification_code_generator::{
    RandomVerificationCodeGenerator, VERIFICATION_CODE_LENGTH, VerificationCodeGenerator,
};
#[cfg(test)]
pub(crate) use verification_repository::MockVerificationRepository;
pub use verification_repository::{VerificationRepository, VerificationRepositoryError};
