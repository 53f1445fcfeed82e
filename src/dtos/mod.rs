pub mod users;

pub use users::{CreateUserRequest, UpdateUserRequest, UserResponse};
