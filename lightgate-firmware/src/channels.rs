//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicU32;

use lightgate_core::run::EdgeEvent;
use lightgate_display::Screen;
use lightgate_protocol::StartMessage;

/// Channel capacity for gate edges (two complete pulses)
const EDGE_CHANNEL_SIZE: usize = 4;

/// Timestamped gate edges from the gate task
pub static EDGE_CHANNEL: Channel<CriticalSectionRawMutex, EdgeEvent, EDGE_CHANNEL_SIZE> =
    Channel::new();

/// Edges lost because the controller fell behind
pub static EDGES_DROPPED: AtomicU32 = AtomicU32::new(0);

/// Start message decoded from the remote link
pub static REMOTE_START: Signal<CriticalSectionRawMutex, StartMessage> = Signal::new();

/// Latest beam state from the gate task (true = beam clear)
pub static BEAM_CLEAR: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Signal that a screen update is ready to be flushed
pub static SCREEN_UPDATE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Shared screen buffer protected by mutex
pub static SCREEN_BUFFER: Mutex<CriticalSectionRawMutex, Screen> = Mutex::new(Screen::new());
