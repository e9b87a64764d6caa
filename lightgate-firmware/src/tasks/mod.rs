//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod controller;
pub mod display;
pub mod gate;
pub mod remote_rx;

pub use controller::controller_task;
pub use display::display_task;
pub use gate::gate_task;
pub use remote_rx::remote_rx_task;
