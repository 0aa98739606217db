//! GPIO / peripheral pin assignments for the BrushGlow controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.
//!
//! Pin assignments match the exhibit wiring loom (rev C harness).

// ---------------------------------------------------------------------------
// Vibration sensor — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Piezo vibration transducer bonded under the brushing surface — analog
/// voltage via a 1 MΩ bleed resistor.
/// ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const PIEZO_ADC_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Temperature probes — one-wire bus
// ---------------------------------------------------------------------------

/// Shared one-wire data line for both DS18B20 probes (left and right edge
/// of the surface), 4.7 kΩ pull-up to 3V3.  Bit-banged open-drain.
pub const ONEWIRE_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Heater elements (IRLZ44N low-side MOSFET per element, active HIGH)
// ---------------------------------------------------------------------------

/// Gate-drive GPIOs for the five resistive heater elements, indexed by
/// physical element number.  Elements are grouped into three logical zones
/// by the heater bank driver: zone 0 (left) drives elements 0 and 3,
/// zone 1 (right) drives elements 2 and 4, zone 2 (shared centre) drives
/// element 1.
pub const HEATER_ELEMENT_GPIOS: [i32; 5] = [1, 2, 3, 4, 7];

// ---------------------------------------------------------------------------
// Status indicator
// ---------------------------------------------------------------------------

/// Panel LED mirroring "any heater currently energised" (active HIGH).
pub const STATUS_LED_GPIO: i32 = 11;

// ---------------------------------------------------------------------------
// UART debug
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
