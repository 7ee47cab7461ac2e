pub mod health;
pub mod permissions;

pub use self::permissions::model::Permission;
