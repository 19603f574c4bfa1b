//! Si705x (Si7050/1/3/4/5) digital temperature sensor.
//!
//! - Interface: I2C, 7-bit address 0x40
//! - Output: degrees celsius
//! - Conversion: started by a "measure, no hold master" command, then read after a fixed delay
//!
//! ```
//! # use embedded_hal_mock::eh1::delay::NoopDelay;
//! # use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
//! use si705x::Si705x;
//!
//! # let expectations = [
//! #     Transaction::write(0x40, vec![0xF3]),
//! #     Transaction::read(0x40, vec![0x66, 0x4C]),
//! #     Transaction::write(0x40, vec![0xFC, 0xC9]),
//! #     Transaction::read(0x40, vec![55]),
//! # ];
//! # let i2c = I2cMock::new(&expectations);
//! # let mut delay = NoopDelay::new();
//! let mut sensor = Si705x::new(i2c);
//! let temperature = sensor.measure_temperature(&mut delay).unwrap();
//! let model = sensor.model().unwrap();
//!
//! println!("{}: {:.2}C", model, temperature);
//! # sensor.release().done();
//! ```

use core::fmt;

use embedded_hal_1::{delay::DelayNs, i2c::I2c};

/// Default (and only) bus address of the sensor.
pub const SI705X_I2C_ADDR: u8 = 0x40;

/// Identification replies are always fetched from this address, not the configured one.
const SI705X_ID_READ_ADDR: u8 = 0x40;

const SI705X_CMD_MEASURE_TEMP_NO_HOLD: u8 = 0xF3;
const SI705X_CMD_READ_FIRMWARE_REV: [u8; 2] = [0x84, 0xB8];
const SI705X_CMD_READ_ELECTRONIC_ID_2: [u8; 2] = [0xFC, 0xC9];

/// Wait for a 14-bit conversion to finish.
pub const DEFAULT_CONVERSION_DELAY_MS: u32 = 10;

const MODEL_PREFIX: &str = "Si70";

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// 7-bit bus address, not validated.
    pub address: u8,
    /// Time between the measure command and reading back the result.
    pub conversion_delay_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            address: SI705X_I2C_ADDR,
            conversion_delay_ms: DEFAULT_CONVERSION_DELAY_MS,
        }
    }
}

/// Firmware revision byte, displayed as `0x..` lowercase hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirmwareVersion(pub u8);

impl FirmwareVersion {
    pub fn raw(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Model byte from the electronic ID, displayed as e.g. `Si7055`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Model(pub u8);

impl Model {
    pub fn raw(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", MODEL_PREFIX, self.0)
    }
}

/// Convert a raw temperature code to celsius.
///
/// No clamping: garbage from the bus gives a garbage temperature.
#[inline]
pub fn raw_to_celsius(raw: u16) -> f32 {
    raw as f32 * 175.72 / 65536.0 - 46.85
}

/// Si705x temperature sensor.
pub struct Si705x<I2C> {
    i2c: I2C,
    config: Config,
    last_raw: u16,
}

impl<I2C> Si705x<I2C>
where
    I2C: I2c,
{
    /// Create device driver instance at the default address.
    pub fn new(i2c: I2C) -> Self {
        Self::with_config(i2c, Config::default())
    }

    pub fn with_config(i2c: I2C, config: Config) -> Self {
        Si705x {
            i2c,
            config,
            last_raw: 0,
        }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn address(&self) -> u8 {
        self.config.address
    }

    /// Raw code of the most recent temperature read, 0 before the first one.
    pub fn last_raw_temperature(&self) -> u16 {
        self.last_raw
    }

    /// Measure temperature in celsius, waiting the configured conversion delay.
    pub fn measure_temperature(&mut self, delay: &mut impl DelayNs) -> Result<f32, I2C::Error> {
        let delay_ms = self.config.conversion_delay_ms;
        self.measure_temperature_with_delay(delay, delay_ms)
    }

    pub fn measure_temperature_with_delay(
        &mut self,
        delay: &mut impl DelayNs,
        delay_ms: u32,
    ) -> Result<f32, I2C::Error> {
        let raw = self.read_raw_temperature(delay, delay_ms)?;
        Ok(raw_to_celsius(raw))
    }

    /// Start a conversion, wait `delay_ms`, then read back the 16-bit code.
    ///
    /// The sensor is not polled; if the conversion is not done the read gets whatever
    /// the device returns.
    pub fn read_raw_temperature(&mut self, delay: &mut impl DelayNs, delay_ms: u32) -> Result<u16, I2C::Error> {
        let address = self.config.address;
        self.i2c.write(address, &[SI705X_CMD_MEASURE_TEMP_NO_HOLD])?;
        delay.delay_ms(delay_ms);

        let mut buf = [0u8; 2];
        self.i2c.read(address, &mut buf)?;
        let raw = u16::from_be_bytes(buf);
        self.last_raw = raw;

        #[cfg(feature = "defmt")]
        defmt::debug!("si705x raw temperature: {=u16:#x}", raw);

        Ok(raw)
    }

    pub fn firmware_version(&mut self) -> Result<FirmwareVersion, I2C::Error> {
        let rev = self.read_id_byte(&SI705X_CMD_READ_FIRMWARE_REV)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("si705x firmware revision: {=u8:#x}", rev);

        Ok(FirmwareVersion(rev))
    }

    pub fn model(&mut self) -> Result<Model, I2C::Error> {
        let id = self.read_id_byte(&SI705X_CMD_READ_ELECTRONIC_ID_2)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("si705x model id: {=u8}", id);

        Ok(Model(id))
    }

    // command goes to the configured address, the reply is read from 0x40
    fn read_id_byte(&mut self, cmd: &[u8]) -> Result<u8, I2C::Error> {
        self.i2c.write(self.config.address, cmd)?;
        let mut buf = [0u8];
        self.i2c.read(SI705X_ID_READ_ADDR, &mut buf)?;
        Ok(buf[0])
    }
}
