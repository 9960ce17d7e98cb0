pub mod amount;
pub mod buddy;
pub mod catalog;
pub mod csv;
pub mod deferred;
pub mod engine;
pub mod model;
pub mod notice;
pub mod progress;
pub mod route;
pub mod session;
pub mod validate;

pub use amount::Amount;
pub use catalog::Catalog;
pub use engine::{Command, Engine};
pub use notice::Notice;
pub use route::Route;
