//! Outbound ports - Interfaces that the application requires from external systems

mod bus_port;
mod chronicle_port;
mod prompt_port;
mod randomizer_port;
mod turn_handler_port;

pub use bus_port::{BusError, MessageBusPort};
pub use chronicle_port::ChroniclePort;
pub use prompt_port::{PrayerPromptRequest, PromptError, PromptPort};
pub use randomizer_port::RandomizerPort;
pub use turn_handler_port::TurnHandlerPort;
