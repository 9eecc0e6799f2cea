use embedded_hal::i2c::Error;

/// Errors that can occur when driving the SMB235x
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChargerError {
    /// Register read, write or update-bits failed on the bus
    Regmap,
    /// The BMS or TCPM power supply is not registered (yet)
    PeerAbsent,
    /// The peer power supply is registered but failed to answer
    Peer,
    /// Rejected configuration value or unsupported property
    InvalidArgument,
    /// A property could not be read
    NoData,
}

impl<E> From<E> for ChargerError
where
    E: Error,
{
    fn from(_: E) -> Self {
        ChargerError::Regmap
    }
}
