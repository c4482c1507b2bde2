use std::ops::Deref;

mod login;
mod profile;
mod register;

pub use login::LoginInput;
pub use profile::{ProfilePicture, UpdateProfileInput};
pub use register::{CreateUserInput, RegisterInput};

#[derive(Clone)]
pub struct Command(pub nikjin_shared::State);

impl Deref for Command {
    type Target = nikjin_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
