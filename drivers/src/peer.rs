//! Cooperating power supplies: the fuel gauge (BMS) and the Type-C port
//! manager (TCPM). Both are looked up by name and may not be registered yet.

use crate::error::ChargerError;

/// Well-known name of the fuel gauge power supply
pub const BMS_PSY_NAME: &str = "bms";

/// Properties the charger reads from its peers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeerProperty {
    UsbType,
    CurrentMax,
    VoltageNow,
    CurrentNow,
    Capacity,
    Temp,
    Health,
    ConstantChargeCurrentMax,
    ConstantChargeVoltageMax,
}

/// A registered power supply the charger can query
#[allow(async_fn_in_trait)]
pub trait PowerSupply {
    /// Returns the property value in the power supply framework's units
    /// (uA, uV, percent, tenths of a degree, enum discriminant).
    async fn get_property(&mut self, prop: PeerProperty) -> Result<i32, ChargerError>;
}

/// Name based power supply lookup
pub trait PowerSupplyRegistry {
    type Supply: PowerSupply;

    fn get_by_name(&self, name: &str) -> Option<Self::Supply>;
}
