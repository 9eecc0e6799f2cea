use embedded_hal_async::i2c::I2c;

use crate::error::ChargerError;

/// Register access to the PMIC's 16 bit address space.
///
/// Implementations serialise their own bus transactions; the driver only
/// holds one for the duration of a single read, write or update.
#[allow(async_fn_in_trait)]
pub trait Regmap {
    async fn read(&mut self, reg: u16) -> Result<u8, ChargerError>;

    async fn write(&mut self, reg: u16, val: u8) -> Result<(), ChargerError>;

    /// Read-modify-write of the bits selected by `mask`. The write is skipped
    /// when the register already holds the requested value.
    async fn update_bits(&mut self, reg: u16, mask: u8, val: u8) -> Result<(), ChargerError> {
        let orig = self.read(reg).await?;
        let data = (orig & !mask) | (val & mask);
        if data != orig {
            self.write(reg, data).await?;
        }
        Ok(())
    }
}

/// [`Regmap`] over an I2C bus, register address sent big endian.
#[derive(Debug)]
pub struct I2cRegmap<I2C> {
    i2c: I2C,
    adr: u8,
}

impl<I2C> I2cRegmap<I2C>
where
    I2C: I2c,
{
    /// # Arguments
    /// * `i2c` - I2C bus instance
    /// * `adr` - 7 bit device address of the charger peripheral
    pub fn new(i2c: I2C, adr: u8) -> Self {
        Self { i2c, adr }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Regmap for I2cRegmap<I2C>
where
    I2C: I2c,
{
    async fn read(&mut self, reg: u16) -> Result<u8, ChargerError> {
        let mut buffer = [0u8];
        self.i2c
            .write_read(self.adr, &reg.to_be_bytes(), &mut buffer)
            .await?;
        Ok(buffer[0])
    }

    async fn write(&mut self, reg: u16, val: u8) -> Result<(), ChargerError> {
        let [hi, lo] = reg.to_be_bytes();
        self.i2c.write(self.adr, &[hi, lo, val]).await?;
        Ok(())
    }
}
