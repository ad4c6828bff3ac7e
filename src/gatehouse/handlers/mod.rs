pub mod check;
pub use self::check::check;

pub mod health;
pub use self::health::health;
