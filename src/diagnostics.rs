//! Runtime diagnostics.
//!
//! The exhibit has no persistent storage, so diagnostics are log-only:
//! the periodic status line is emitted by the service through the event
//! sink, and the panic hook below records the reason on the serial
//! console before the watchdog resets the device.

/// Install a panic hook that logs the reason before the device resets.
///
/// There is no fatal path in the control logic itself — this exists
/// for toolchain-level panics (allocation failure, slice indexing in
/// dependencies) so the reset cause shows up on the console.
pub fn install_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        let reason = if let Some(msg) = info.payload().downcast_ref::<&str>() {
            *msg
        } else if let Some(msg) = info.payload().downcast_ref::<String>() {
            msg.as_str()
        } else {
            "unknown panic"
        };
        log::error!("PANIC: {}", reason);
    }));
}
