// Shared helpers: math and countdown timers

pub mod math;
pub mod timer;

pub use timer::Countdown;
