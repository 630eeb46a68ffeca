pub mod corrupt;
pub mod inspect;
pub mod relay;
pub mod send;

pub use corrupt::*;
pub use inspect::*;
pub use relay::*;
pub use send::*;
