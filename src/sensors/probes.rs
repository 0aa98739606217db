//! Dual DS18B20 temperature probes on a shared one-wire bus.
//!
//! Two probes — one clipped to each edge of the heated surface — hang
//! off a single bit-banged one-wire line.  Probes run at 9-bit
//! resolution (0.5 °C, ~94 ms conversion), which is plenty for a
//! surface regulated in whole degrees and keeps bus time short.
//!
//! Conversions are split across sampling intervals so the control loop
//! never blocks: each [`ProbeBus::sample`] call reads the scratchpads
//! filled by the *previous* conversion, then broadcasts the next
//! convert command.  The first call after boot has nothing to read and
//! returns `None`.
//!
//! A missing presence pulse or a failed scratchpad CRC yields the
//! Dallas disconnect sentinel ([`DISCONNECTED_C`]), which sits far
//! below the gate's lower bound and is rejected there.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-banged open-drain GPIO with busy-wait timing.
//! On host/test: reads a pair of static `AtomicI16`s for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicI16, Ordering};

#[cfg(target_os = "espidf")]
use crate::error::SensorError;
#[cfg(target_os = "espidf")]
use log::{info, warn};

/// Dallas convention for "no probe answered": far below any temperature
/// this exhibit can physically reach.
pub const DISCONNECTED_C: i16 = -127;

/// One validated-units reading per probe (whole Celsius, floored).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePair {
    pub left_c: i16,
    pub right_c: i16,
}

#[cfg(not(target_os = "espidf"))]
static SIM_LEFT_C: AtomicI16 = AtomicI16::new(22);
#[cfg(not(target_os = "espidf"))]
static SIM_RIGHT_C: AtomicI16 = AtomicI16::new(22);

/// Inject simulated probe temperatures (host/test only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_probes_c(left_c: i16, right_c: i16) {
    SIM_LEFT_C.store(left_c, Ordering::Relaxed);
    SIM_RIGHT_C.store(right_c, Ordering::Relaxed);
}

/// The shared bus and both probe identities.
pub struct ProbeBus {
    #[cfg(target_os = "espidf")]
    gpio: i32,
    /// ROM codes discovered at init, ordered by serial number.
    /// `roms[0]` is wired to the left edge by loom convention; if the
    /// status line shows the readings crossed, swap the probe cables.
    #[cfg(target_os = "espidf")]
    roms: [[u8; 8]; 2],
    #[cfg(target_os = "espidf")]
    conversion_pending: bool,
    _onewire_gpio: i32,
}

impl ProbeBus {
    pub fn new(onewire_gpio: i32) -> Self {
        Self {
            #[cfg(target_os = "espidf")]
            gpio: onewire_gpio,
            #[cfg(target_os = "espidf")]
            roms: [[0; 8]; 2],
            #[cfg(target_os = "espidf")]
            conversion_pending: false,
            _onewire_gpio: onewire_gpio,
        }
    }

    /// Configure the bus line, enumerate both probes, and set 9-bit
    /// resolution.  Call once from main before the control loop.
    #[cfg(target_os = "espidf")]
    pub fn init(&mut self) -> Result<(), SensorError> {
        onewire::configure_pin(self.gpio);

        let found = onewire::search_roms(self.gpio);
        if found.len() < 2 {
            warn!("probes: found {} of 2 devices on the bus", found.len());
            return Err(SensorError::BusNoPresence);
        }
        self.roms = [found[0], found[1]];
        for (side, rom) in ["left", "right"].iter().zip(self.roms.iter()) {
            info!("probes: {} = {}", side, onewire::RomHex(rom));
        }

        // Broadcast 9-bit resolution: skip ROM, write scratchpad
        // (TH=0, TL=0, config=0x1F).
        if !onewire::reset(self.gpio) {
            return Err(SensorError::BusNoPresence);
        }
        onewire::write_byte(self.gpio, 0xCC);
        onewire::write_byte(self.gpio, 0x4E);
        onewire::write_byte(self.gpio, 0x00);
        onewire::write_byte(self.gpio, 0x00);
        onewire::write_byte(self.gpio, 0x1F);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn init(&mut self) -> Result<(), crate::error::SensorError> {
        log::info!("probes(sim): injection bus ready");
        Ok(())
    }

    /// Read the pair produced by the previous conversion and start the
    /// next one.  `None` until the first conversion has been issued.
    #[cfg(target_os = "espidf")]
    pub fn sample(&mut self) -> Option<ProbePair> {
        if !self.conversion_pending {
            self.start_conversion();
            return None;
        }
        let left_c = self.read_probe(0);
        let right_c = self.read_probe(1);
        self.start_conversion();
        Some(ProbePair { left_c, right_c })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sample(&mut self) -> Option<ProbePair> {
        Some(ProbePair {
            left_c: SIM_LEFT_C.load(Ordering::Relaxed),
            right_c: SIM_RIGHT_C.load(Ordering::Relaxed),
        })
    }

    // ── Internal (hardware path) ──────────────────────────────────

    /// Broadcast a convert command to both probes (skip ROM + 0x44).
    #[cfg(target_os = "espidf")]
    fn start_conversion(&mut self) {
        if onewire::reset(self.gpio) {
            onewire::write_byte(self.gpio, 0xCC);
            onewire::write_byte(self.gpio, 0x44);
            self.conversion_pending = true;
        } else {
            self.conversion_pending = false;
        }
    }

    /// Match one probe's ROM and read its scratchpad.
    #[cfg(target_os = "espidf")]
    fn read_probe(&self, index: usize) -> i16 {
        if !onewire::reset(self.gpio) {
            return DISCONNECTED_C;
        }
        onewire::write_byte(self.gpio, 0x55);
        for &b in &self.roms[index] {
            onewire::write_byte(self.gpio, b);
        }
        onewire::write_byte(self.gpio, 0xBE);
        let mut scratchpad = [0u8; 9];
        for b in &mut scratchpad {
            *b = onewire::read_byte(self.gpio);
        }
        decode_scratchpad(&scratchpad)
    }
}

/// Decode a 9-byte scratchpad into whole Celsius (floored), or the
/// disconnect sentinel on CRC failure.
pub fn decode_scratchpad(scratchpad: &[u8; 9]) -> i16 {
    if crc8(scratchpad) != 0 {
        return DISCONNECTED_C;
    }
    let raw = i16::from_le_bytes([scratchpad[0], scratchpad[1]]);
    raw >> 4 // sixteenths → whole degrees, floors toward -inf
}

/// Dallas/Maxim CRC-8 (poly x^8 + x^5 + x^4 + 1, reflected, init 0).
/// A frame with its trailing CRC byte included sums to zero.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;
    for &b in data {
        let mut byte = b;
        for _ in 0..8 {
            let mix = (crc ^ byte) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            byte >>= 1;
        }
    }
    crc
}

// ───────────────────────────────────────────────────────────────
// Raw one-wire primitives (DS18B20 datasheet timing)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod onewire {
    use esp_idf_svc::sys::*;

    use super::crc8;

    /// Hex formatter for an 8-byte ROM code.
    pub struct RomHex<'a>(pub &'a [u8; 8]);

    impl core::fmt::Display for RomHex<'_> {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            for b in self.0 {
                write!(f, "{b:02X}")?;
            }
            Ok(())
        }
    }

    /// Open-drain with pull-up; released line idles high.
    pub fn configure_pin(pin: i32) {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        // SAFETY: gpio_config on a dedicated pin, called once from the
        // single-threaded init path.
        unsafe {
            gpio_config(&cfg);
            gpio_set_level(pin, 1);
        }
    }

    fn drive_low(pin: i32) {
        // SAFETY: register write to an already-configured OD pin.
        unsafe {
            gpio_set_level(pin, 0);
        }
    }

    fn release(pin: i32) {
        // SAFETY: register write to an already-configured OD pin.
        unsafe {
            gpio_set_level(pin, 1);
        }
    }

    fn line_level(pin: i32) -> bool {
        // SAFETY: read-only register access.
        (unsafe { gpio_get_level(pin) }) != 0
    }

    fn delay_us(us: u32) {
        // SAFETY: busy-wait; safe from any context.
        unsafe {
            esp_rom_delay_us(us);
        }
    }

    /// Reset pulse.  Returns `true` if at least one device answered
    /// with a presence pulse.
    pub fn reset(pin: i32) -> bool {
        drive_low(pin);
        delay_us(480);
        release(pin);
        delay_us(70);
        let present = !line_level(pin);
        delay_us(410);
        present
    }

    fn write_bit(pin: i32, bit: bool) {
        drive_low(pin);
        if bit {
            delay_us(6);
            release(pin);
            delay_us(64);
        } else {
            delay_us(60);
            release(pin);
            delay_us(10);
        }
    }

    fn read_bit(pin: i32) -> bool {
        drive_low(pin);
        delay_us(6);
        release(pin);
        delay_us(9);
        let bit = line_level(pin);
        delay_us(55);
        bit
    }

    pub fn write_byte(pin: i32, byte: u8) {
        for i in 0..8 {
            write_bit(pin, (byte >> i) & 1 != 0);
        }
    }

    pub fn read_byte(pin: i32) -> u8 {
        let mut byte = 0u8;
        for i in 0..8 {
            if read_bit(pin) {
                byte |= 1 << i;
            }
        }
        byte
    }

    /// Maxim ROM search, trimmed to the two-device bus this board has.
    /// Results are sorted by ROM code so probe assignment is stable
    /// across boots.
    pub fn search_roms(pin: i32) -> heapless::Vec<[u8; 8], 2> {
        let mut found: heapless::Vec<[u8; 8], 2> = heapless::Vec::new();
        let mut last_discrepancy: i32 = -1;

        loop {
            if !reset(pin) {
                break;
            }
            write_byte(pin, 0xF0);

            let mut rom = [0u8; 8];
            let mut discrepancy_marker: i32 = -1;
            let mut bus_error = false;

            for bit_index in 0..64i32 {
                let id_bit = read_bit(pin);
                let complement_bit = read_bit(pin);

                let direction = match (id_bit, complement_bit) {
                    (true, true) => {
                        // No device drove the slot — bus glitch or all
                        // devices dropped out mid-search.
                        bus_error = true;
                        break;
                    }
                    (true, false) => true,
                    (false, true) => false,
                    (false, false) => {
                        // Both branches populated at this bit.
                        if bit_index < last_discrepancy {
                            found
                                .last()
                                .is_some_and(|prev| prev[(bit_index / 8) as usize]
                                    >> (bit_index % 8)
                                    & 1
                                    != 0)
                        } else if bit_index == last_discrepancy {
                            true
                        } else {
                            discrepancy_marker = bit_index;
                            false
                        }
                    }
                };

                if direction {
                    rom[(bit_index / 8) as usize] |= 1 << (bit_index % 8);
                }
                write_bit(pin, direction);
            }

            if bus_error {
                break;
            }
            if crc8(&rom) == 0 {
                let _ = found.push(rom);
            }

            last_discrepancy = discrepancy_marker;
            if last_discrepancy < 0 || found.is_full() {
                break;
            }
        }

        found.sort_unstable();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc8_known_vector() {
        // Maxim app-note reference value.
        assert_eq!(crc8(&[0x01]), 0x5E);
        assert_eq!(crc8(&[]), 0x00);
    }

    #[test]
    fn crc8_of_frame_with_trailing_crc_is_zero() {
        for data in [
            &[0x10u8, 0x01, 0x4B, 0x46, 0x1F, 0xFF, 0x10, 0x10][..],
            &[0x28, 0xFF, 0x64, 0x1E, 0x0F, 0x00, 0x00][..],
            &[0x00][..],
        ] {
            let mut frame: Vec<u8> = data.to_vec();
            frame.push(crc8(data));
            assert_eq!(crc8(&frame), 0, "frame {data:02X?}");
        }
    }

    fn scratchpad_with_raw(raw: i16) -> [u8; 9] {
        let [lsb, msb] = raw.to_le_bytes();
        let mut sp = [lsb, msb, 0x4B, 0x46, 0x1F, 0xFF, 0x00, 0x10, 0x00];
        sp[8] = crc8(&sp[..8]);
        sp
    }

    #[test]
    fn decode_positive_temperature() {
        // 25.0625 C raw — floors to 25.
        assert_eq!(decode_scratchpad(&scratchpad_with_raw(0x0191)), 25);
    }

    #[test]
    fn decode_power_on_default() {
        // The 85 C power-on scratchpad value decodes as-is; the split
        // conversion scheme keeps it from ever reaching the gate.
        assert_eq!(decode_scratchpad(&scratchpad_with_raw(0x0550)), 85);
    }

    #[test]
    fn decode_negative_temperature_floors() {
        // -10.1875 C raw floors to -11.
        assert_eq!(decode_scratchpad(&scratchpad_with_raw(-163)), -11);
        // -25.0 C exactly.
        assert_eq!(decode_scratchpad(&scratchpad_with_raw(-400)), -25);
    }

    #[test]
    fn corrupt_scratchpad_yields_sentinel() {
        let mut sp = scratchpad_with_raw(0x0191);
        sp[0] ^= 0x01;
        assert_eq!(decode_scratchpad(&sp), DISCONNECTED_C);
    }

    #[cfg(not(target_os = "espidf"))]
    #[test]
    fn sim_bus_returns_injected_pair() {
        let mut bus = ProbeBus::new(6);
        bus.init().unwrap();
        sim_set_probes_c(31, 33);
        assert_eq!(
            bus.sample(),
            Some(ProbePair {
                left_c: 31,
                right_c: 33
            })
        );
    }
}
