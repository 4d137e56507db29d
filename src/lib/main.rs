mod command;
mod country;
mod fetch;
mod lookup;
mod map;
mod math;
mod page;
mod session;

pub use command::*;
pub use country::*;
pub use fetch::*;
pub use lookup::*;
pub use map::*;
pub use math::*;
pub use page::*;
pub use session::*;
