mod user;

pub use user::{FieldErrors, NewUser, User, UserFields, UserRow};
