//! Board identity from the QSPI flash unique ID

use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use glimmer_hal::DeviceId;

/// Flash size on the supported boards
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Read the flash chip's 64-bit unique ID
///
/// Returns `None` if the flash does not answer the unique ID command.
pub fn read_device_id(flash: Peri<'_, FLASH>) -> Option<DeviceId> {
    let mut flash = Flash::<_, Blocking, FLASH_SIZE>::new_blocking(flash);
    let mut uid = [0u8; 8];
    match flash.blocking_unique_id(&mut uid) {
        Ok(()) => {
            #[cfg(feature = "defmt")]
            defmt::debug!("flash unique id {=[u8]:02x}", uid);
            Some(DeviceId(uid))
        }
        Err(_e) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("flash unique id unavailable: {}", _e);
            None
        }
    }
}
