//! USB and battery power supply properties.
//!
//! Values use the power supply framework's units: uA, uV, tenths of a degree
//! and enum discriminants for types and statuses.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use crate::apsd::SDP_CURRENT_UA;
use crate::charger::Smb235x;
use crate::config_engine::CURRENT_STEP_MA;
use crate::error::ChargerError;
use crate::hvdcp::VOLTAGE_FORCE_5V_UV;
use crate::peer::{PeerProperty, PowerSupplyRegistry};
use crate::regmap::Regmap;
use crate::regs::*;
use crate::types::{BatteryStatus, ChargeType, ChargerStatus, ChargerType, Health, UsbType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsbProperty {
    Present,
    Online,
    CurrentMax,
    VoltageMax,
    VoltageNow,
    CurrentNow,
    SdpCurrentMax,
    RealType,
    UsbType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BatteryProperty {
    Present,
    Status,
    ChargeType,
    Health,
    Temp,
    VoltageNow,
    CurrentNow,
    Capacity,
    VoltageMax,
    CurrentMax,
    ConstantChargeCurrentMax,
    ConstantChargeVoltageMax,
    ChargeTermCurrent,
}

pub fn usb_property_is_writeable(prop: UsbProperty) -> bool {
    matches!(
        prop,
        UsbProperty::CurrentMax | UsbProperty::VoltageNow | UsbProperty::SdpCurrentMax
    )
}

pub fn battery_property_is_writeable(prop: BatteryProperty) -> bool {
    matches!(
        prop,
        BatteryProperty::ConstantChargeCurrentMax | BatteryProperty::ConstantChargeVoltageMax
    )
}

/// Battery status as seen by userspace, from the charger state and whether
/// USBIN is supplying power
pub fn battery_status(status: ChargerStatus, usb_online: bool) -> BatteryStatus {
    if !usb_online {
        return match status {
            ChargerStatus::Terminate | ChargerStatus::Inhibit => BatteryStatus::Full,
            _ => BatteryStatus::Discharging,
        };
    }

    match status {
        ChargerStatus::Trickle
        | ChargerStatus::PreCharge
        | ChargerStatus::FullOn
        | ChargerStatus::Taper => BatteryStatus::Charging,
        ChargerStatus::Terminate => BatteryStatus::Full,
        ChargerStatus::Inhibit | ChargerStatus::Pause | ChargerStatus::Disable => {
            BatteryStatus::NotCharging
        }
    }
}

pub fn charge_type(status: ChargerStatus) -> ChargeType {
    match status {
        ChargerStatus::Trickle | ChargerStatus::PreCharge => ChargeType::Trickle,
        ChargerStatus::FullOn => ChargeType::Fast,
        ChargerStatus::Taper => ChargeType::Taper,
        _ => ChargeType::None,
    }
}

/// Health from the charger's own JEITA temperature status
pub fn temperature_health(stat: BatTempStatus) -> Health {
    if stat.contains(BatTempStatus::TOO_COLD) {
        Health::Cold
    } else if stat.contains(BatTempStatus::TOO_HOT) {
        Health::Overheat
    } else if stat.contains(BatTempStatus::COLD_SOFT) {
        Health::Cool
    } else if stat.contains(BatTempStatus::HOT_SOFT) {
        Health::Warm
    } else {
        Health::Good
    }
}

fn non_negative(value: i32) -> Result<u32, ChargerError> {
    u32::try_from(value).map_err(|_| ChargerError::InvalidArgument)
}

impl<M, R, D, P> Smb235x<M, R, D, P>
where
    M: RawMutex,
    R: Regmap,
    D: DelayNs,
    P: PowerSupplyRegistry,
{
    async fn read_charger_status(&self) -> Result<ChargerStatus, ChargerError> {
        let stat = self.read_reg(BATTERY_CHARGER_STATUS_1_REG).await.map_err(|e| {
            error!("Failed to read BATTERY_CHARGER_STATUS_1: {:?}", e);
            e
        })?;
        // three bit field, every value is a state
        ChargerStatus::try_from(stat & BATTERY_CHARGER_STATUS_MASK)
            .map_err(|_| ChargerError::NoData)
    }

    async fn usb_present(&self) -> Result<i32, ChargerError> {
        let stat = self.read_reg(USB_INT_RT_STS_OFFSET_REG).await.map_err(|e| {
            error!("Failed to read USB_INT_RT_STS: {:?}", e);
            e
        })?;
        Ok(i32::from(stat & USBIN_PLUGIN_RT_STS_BIT != 0))
    }

    async fn usb_icl(&self) -> Result<i32, ChargerError> {
        if !self.get_usb_online().await {
            return Ok(0);
        }

        let override_stat = self.read_reg(USB_CMD_ICL_OVERRIDE_REG).await.map_err(|e| {
            error!("Failed to read USB_CMD_ICL_OVERRIDE: {:?}", e);
            e
        })?;

        let reg = if override_stat & ICL_OVERRIDE_BIT != 0 {
            USBIN_CURRENT_LIMIT_CFG_REG
        } else {
            DCDC_ICL_MAX_STATUS_REG
        };
        let stat = self.read_reg(reg).await.map_err(|e| {
            error!("Failed to read ICL register {:#x}: {:?}", reg, e);
            e
        })?;

        Ok((u32::from(stat) * CURRENT_STEP_MA * 1000) as i32)
    }

    async fn usb_voltage(&self) -> Result<i32, ChargerError> {
        if !self.get_usb_online().await {
            return Ok(0);
        }

        let (charger_type, hvdcp3_voltage_uv, pd_active) = {
            let state = self.state.lock().await;
            (state.charger_type, state.hvdcp3_voltage_uv, state.pd_active)
        };

        if pd_active {
            return self
                .get_prop_from_tcpm(PeerProperty::VoltageNow)
                .await
                .map_err(|e| {
                    error!("Failed to get voltage from tcpm: {:?}", e);
                    e
                });
        }

        let voltage_uv = match charger_type {
            ChargerType::Hvdcp3 => hvdcp3_voltage_uv,
            ChargerType::Hvdcp2 => self.get_hvdcp2_voltage().await?,
            _ => VOLTAGE_FORCE_5V_UV,
        };
        Ok(voltage_uv as i32)
    }

    async fn usb_get(&self, prop: UsbProperty) -> Result<i32, ChargerError> {
        match prop {
            UsbProperty::Present => self.usb_present().await,
            UsbProperty::Online => Ok(i32::from(self.get_usb_online().await)),
            UsbProperty::CurrentMax => self.usb_icl().await,
            UsbProperty::VoltageMax | UsbProperty::VoltageNow => self.usb_voltage().await,
            UsbProperty::CurrentNow => {
                if !self.get_usb_online().await {
                    return Ok(0);
                }
                self.get_prop_from_tcpm(PeerProperty::CurrentNow).await
            }
            UsbProperty::SdpCurrentMax => {
                let sdp_icl_ua = self.state.lock().await.sdp_icl_ua;
                let sdp_icl_ua = if sdp_icl_ua != 0 {
                    sdp_icl_ua
                } else {
                    SDP_CURRENT_UA
                };
                Ok(sdp_icl_ua as i32)
            }
            UsbProperty::RealType => {
                let charger_type = match self.classify().await {
                    Ok((charger_type, _)) => charger_type,
                    Err(_) => ChargerType::Unknown,
                };
                Ok(i32::from(u8::from(charger_type)))
            }
            UsbProperty::UsbType => {
                let usb_type = match self.classify().await {
                    Ok((_, usb_type)) => usb_type,
                    Err(_) => UsbType::Unknown,
                };
                Ok(i32::from(u8::from(usb_type)))
            }
        }
    }

    /// Reads a USB power supply property. Any failure reads as no data.
    pub async fn usb_get_property(&self, prop: UsbProperty) -> Result<i32, ChargerError> {
        self.usb_get(prop).await.map_err(|e| {
            error!("Failed to get usb prop {:?}: {:?}", prop, e);
            ChargerError::NoData
        })
    }

    /// Writes a USB power supply property
    ///
    /// # Arguments
    /// * `prop` - one of the writeable properties, see [`usb_property_is_writeable`]
    /// * `value` - uA for current limits, uV for the voltage
    pub async fn usb_set_property(&self, prop: UsbProperty, value: i32) -> Result<(), ChargerError> {
        match prop {
            UsbProperty::CurrentMax => self.set_icl_sw(non_negative(value)? / 1000).await,
            UsbProperty::VoltageNow => {
                if self.charger_type().await == ChargerType::Hvdcp3 {
                    self.set_hvdcp3_voltage(non_negative(value)?).await
                } else {
                    debug!("Setting the voltage is only supported on HVDCP3");
                    Ok(())
                }
            }
            UsbProperty::SdpCurrentMax => {
                let sdp_icl_ua = non_negative(value)?;
                self.state.lock().await.sdp_icl_ua = sdp_icl_ua;
                self.set_icl_sw(sdp_icl_ua / 1000).await
            }
            _ => {
                error!("Set prop {:?} is not supported in usb psy", prop);
                Err(ChargerError::InvalidArgument)
            }
        }
    }

    async fn battery_get(&self, prop: BatteryProperty) -> Result<i32, ChargerError> {
        match prop {
            BatteryProperty::Present => {
                let stat = self.read_reg(BATIF_INT_RT_STS_OFFSET_REG).await.map_err(|e| {
                    error!("Failed to read BATIF_INT_RT_STS: {:?}", e);
                    e
                })?;
                let missing =
                    BatIfRtStatus::BAT_TERMINAL_MISSING | BatIfRtStatus::BAT_THERM_OR_ID_MISSING;
                Ok(i32::from(
                    !BatIfRtStatus::from_bits_truncate(stat).intersects(missing),
                ))
            }
            BatteryProperty::Status => {
                let usb_online = self.get_usb_online().await;
                let status = self.read_charger_status().await?;
                Ok(i32::from(u8::from(battery_status(status, usb_online))))
            }
            BatteryProperty::ChargeType => {
                let status = self.read_charger_status().await?;
                Ok(i32::from(u8::from(charge_type(status))))
            }
            BatteryProperty::Health => match self.get_prop_from_bms(PeerProperty::Health).await {
                Ok(health) => Ok(health),
                Err(_) => {
                    let stat = self.read_reg(BATTERY_CHARGER_STATUS_7_REG).await.map_err(|e| {
                        error!("Failed to read BATTERY_CHARGER_STATUS_7: {:?}", e);
                        e
                    })?;
                    let health = temperature_health(BatTempStatus::from_bits_truncate(stat));
                    Ok(i32::from(u8::from(health)))
                }
            },
            BatteryProperty::Temp => self.get_prop_from_bms(PeerProperty::Temp).await,
            BatteryProperty::VoltageNow => self.get_prop_from_bms(PeerProperty::VoltageNow).await,
            BatteryProperty::CurrentNow => self.get_prop_from_bms(PeerProperty::CurrentNow).await,
            BatteryProperty::Capacity => self.get_prop_from_bms(PeerProperty::Capacity).await,
            BatteryProperty::VoltageMax => Ok(self.state.lock().await.float_volt_uv as i32),
            BatteryProperty::CurrentMax => Ok(self.state.lock().await.fastchg_curr_ua as i32),
            BatteryProperty::ConstantChargeCurrentMax => {
                match self
                    .get_prop_from_bms(PeerProperty::ConstantChargeCurrentMax)
                    .await
                {
                    Ok(fcc_ua) => Ok(fcc_ua),
                    Err(_) => Ok(self.state.lock().await.fastchg_curr_ua as i32),
                }
            }
            BatteryProperty::ConstantChargeVoltageMax => {
                match self
                    .get_prop_from_bms(PeerProperty::ConstantChargeVoltageMax)
                    .await
                {
                    Ok(fv_uv) => Ok(fv_uv),
                    Err(_) => Ok(self.state.lock().await.float_volt_uv as i32),
                }
            }
            BatteryProperty::ChargeTermCurrent => {
                Ok(self.state.lock().await.termination_current_ua)
            }
        }
    }

    /// Reads a battery power supply property. Any failure reads as no data.
    pub async fn battery_get_property(&self, prop: BatteryProperty) -> Result<i32, ChargerError> {
        self.battery_get(prop).await.map_err(|e| {
            error!("Failed to get battery prop {:?}: {:?}", prop, e);
            ChargerError::NoData
        })
    }

    /// Sets the float voltage or fast charge current. A value the BMS
    /// reports for the same property takes precedence over `value`.
    ///
    /// # Arguments
    /// * `prop` - one of the writeable properties, see [`battery_property_is_writeable`]
    /// * `value` - uA or uV
    pub async fn battery_set_property(
        &self,
        prop: BatteryProperty,
        value: i32,
    ) -> Result<(), ChargerError> {
        let peer_prop = match prop {
            BatteryProperty::ConstantChargeVoltageMax => PeerProperty::ConstantChargeVoltageMax,
            BatteryProperty::ConstantChargeCurrentMax => PeerProperty::ConstantChargeCurrentMax,
            _ => return Err(ChargerError::InvalidArgument),
        };

        let value = match self.get_prop_from_bms(peer_prop).await {
            Ok(bms_value) => bms_value,
            Err(e) => {
                debug!("No {:?} from bms: {:?}", peer_prop, e);
                value
            }
        };
        let value = non_negative(value)?;

        if prop == BatteryProperty::ConstantChargeVoltageMax {
            self.state.lock().await.float_volt_uv = value;
            self.set_fv(value).await
        } else {
            self.state.lock().await.fastchg_curr_ua = value;
            self.set_fcc(value).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChargerConfig;
    use crate::testutil::*;
    use embassy_futures::block_on;

    #[test]
    fn writeable_properties() {
        assert!(usb_property_is_writeable(UsbProperty::CurrentMax));
        assert!(usb_property_is_writeable(UsbProperty::VoltageNow));
        assert!(usb_property_is_writeable(UsbProperty::SdpCurrentMax));
        assert!(!usb_property_is_writeable(UsbProperty::VoltageMax));
        assert!(battery_property_is_writeable(
            BatteryProperty::ConstantChargeVoltageMax
        ));
        assert!(!battery_property_is_writeable(BatteryProperty::Capacity));
    }

    #[test]
    fn battery_status_table() {
        assert_eq!(
            battery_status(ChargerStatus::Taper, true),
            BatteryStatus::Charging
        );
        assert_eq!(
            battery_status(ChargerStatus::Terminate, true),
            BatteryStatus::Full
        );
        assert_eq!(
            battery_status(ChargerStatus::Pause, true),
            BatteryStatus::NotCharging
        );
        assert_eq!(
            battery_status(ChargerStatus::Inhibit, false),
            BatteryStatus::Full
        );
        assert_eq!(
            battery_status(ChargerStatus::FullOn, false),
            BatteryStatus::Discharging
        );
    }

    #[test]
    fn charge_type_and_health_decoding() {
        assert_eq!(charge_type(ChargerStatus::PreCharge), ChargeType::Trickle);
        assert_eq!(charge_type(ChargerStatus::FullOn), ChargeType::Fast);
        assert_eq!(charge_type(ChargerStatus::Terminate), ChargeType::None);

        assert_eq!(
            temperature_health(BatTempStatus::TOO_COLD | BatTempStatus::TOO_HOT),
            Health::Cold
        );
        assert_eq!(temperature_health(BatTempStatus::HOT_SOFT), Health::Warm);
        assert_eq!(temperature_health(BatTempStatus::empty()), Health::Good);
    }

    #[test]
    fn offline_usb_reads_zero() {
        let charger = charger_with(ChargerConfig::default());

        for prop in [
            UsbProperty::Online,
            UsbProperty::CurrentMax,
            UsbProperty::VoltageNow,
            UsbProperty::CurrentNow,
        ] {
            assert_eq!(block_on(charger.usb_get_property(prop)), Ok(0));
        }
    }

    #[test]
    fn icl_reads_override_or_hardware_limit() {
        let charger = charger_with(ChargerConfig::default());
        charger.plug_in();
        charger.regs().set(DCDC_ICL_MAX_STATUS_REG, 10);
        charger.regs().set(USBIN_CURRENT_LIMIT_CFG_REG, 30);

        assert_eq!(
            block_on(charger.usb_get_property(UsbProperty::CurrentMax)),
            Ok(500_000)
        );

        charger.regs().set(USB_CMD_ICL_OVERRIDE_REG, ICL_OVERRIDE_BIT);
        assert_eq!(
            block_on(charger.usb_get_property(UsbProperty::CurrentMax)),
            Ok(1_500_000)
        );
    }

    #[test]
    fn voltage_by_charger_type() {
        let charger = charger_with(ChargerConfig::default());
        charger.plug_in();
        assert_eq!(
            block_on(charger.usb_get_property(UsbProperty::VoltageNow)),
            Ok(5_000_000)
        );

        block_on(charger.state.lock()).charger_type = ChargerType::Hvdcp3;
        assert_eq!(
            block_on(charger.usb_get_property(UsbProperty::VoltageMax)),
            Ok(9_000_000)
        );

        block_on(charger.state.lock()).charger_type = ChargerType::Hvdcp2;
        charger
            .regs()
            .set(USB_QC_CHANGE_STATUS_REG, QcChangeStatus::QC_12V.bits());
        assert_eq!(
            block_on(charger.usb_get_property(UsbProperty::VoltageNow)),
            Ok(12_000_000)
        );
    }

    #[test]
    fn pd_voltage_comes_from_tcpm() {
        let charger = charger_with(ChargerConfig::default());
        charger.plug_in();
        block_on(charger.state.lock()).pd_active = true;

        assert_eq!(
            block_on(charger.usb_get_property(UsbProperty::VoltageNow)),
            Err(ChargerError::NoData)
        );

        charger.tcpm().set(PeerProperty::VoltageNow, 15_000_000);
        assert_eq!(
            block_on(charger.usb_get_property(UsbProperty::VoltageNow)),
            Ok(15_000_000)
        );
    }

    #[test]
    fn usb_type_reclassifies() {
        let charger = charger_with(ChargerConfig::default());
        charger.plug_in();
        charger
            .regs()
            .set(USB_APSD_RESULT_STATUS_REG, ApsdResult::CDP_CHARGER.bits());

        assert_eq!(
            block_on(charger.usb_get_property(UsbProperty::RealType)),
            Ok(ChargerType::Cdp as i32)
        );
        assert_eq!(
            block_on(charger.usb_get_property(UsbProperty::UsbType)),
            Ok(UsbType::Cdp as i32)
        );

        charger.regs().fail_on(USB_APSD_RESULT_STATUS_REG);
        assert_eq!(
            block_on(charger.usb_get_property(UsbProperty::UsbType)),
            Ok(UsbType::Unknown as i32)
        );
    }

    #[test]
    fn read_failure_is_no_data() {
        let charger = charger_with(ChargerConfig::default());
        charger.regs().fail_on(USB_INT_RT_STS_OFFSET_REG);

        assert_eq!(
            block_on(charger.usb_get_property(UsbProperty::Present)),
            Err(ChargerError::NoData)
        );
    }

    #[test]
    fn sdp_current_max_set_and_get() {
        let charger = charger_with(ChargerConfig::default());
        assert_eq!(
            block_on(charger.usb_get_property(UsbProperty::SdpCurrentMax)),
            Ok(500_000)
        );

        block_on(charger.usb_set_property(UsbProperty::SdpCurrentMax, 900_000)).unwrap();

        assert_eq!(
            block_on(charger.usb_get_property(UsbProperty::SdpCurrentMax)),
            Ok(900_000)
        );
        assert_eq!(charger.regs().get(USBIN_CURRENT_LIMIT_CFG_REG), 18);
    }

    #[test]
    fn set_current_max_programs_icl() {
        let charger = charger_with(ChargerConfig::default());

        block_on(charger.usb_set_property(UsbProperty::CurrentMax, 2_000_000)).unwrap();

        assert_eq!(charger.regs().get(USBIN_CURRENT_LIMIT_CFG_REG), 40);
    }

    #[test]
    fn set_voltage_only_on_hvdcp3() {
        let charger = charger_with(ChargerConfig::default());
        charger.regs().set(USB_HVDCP_PULSE_COUNT_MAX_REG, 30);
        block_on(charger.init()).unwrap();
        charger.regs().clear_ops();

        block_on(charger.usb_set_property(UsbProperty::VoltageNow, 6_000_000)).unwrap();
        assert!(charger.regs().ops().is_empty());

        block_on(charger.state.lock()).charger_type = ChargerType::Hvdcp3;
        block_on(charger.usb_set_property(UsbProperty::VoltageNow, 6_000_000)).unwrap();
        assert_eq!(block_on(charger.state()).hvdcp3_voltage_uv, 6_000_000);
    }

    #[test]
    fn read_only_usb_property_rejected() {
        let charger = charger_with(ChargerConfig::default());

        assert_eq!(
            block_on(charger.usb_set_property(UsbProperty::Online, 1)),
            Err(ChargerError::InvalidArgument)
        );
    }

    #[test]
    fn battery_present_and_status() {
        let charger = charger_with(ChargerConfig::default());
        charger.plug_in();
        charger.regs().set(BATTERY_CHARGER_STATUS_1_REG, 0xF2);

        assert_eq!(
            block_on(charger.battery_get_property(BatteryProperty::Present)),
            Ok(1)
        );
        assert_eq!(
            block_on(charger.battery_get_property(BatteryProperty::Status)),
            Ok(BatteryStatus::Charging as i32)
        );
        assert_eq!(
            block_on(charger.battery_get_property(BatteryProperty::ChargeType)),
            Ok(ChargeType::Fast as i32)
        );

        charger.regs().set(
            BATIF_INT_RT_STS_OFFSET_REG,
            BatIfRtStatus::BAT_THERM_OR_ID_MISSING.bits(),
        );
        assert_eq!(
            block_on(charger.battery_get_property(BatteryProperty::Present)),
            Ok(0)
        );
    }

    #[test]
    fn health_falls_back_to_charger() {
        let charger = charger_with(ChargerConfig::default());
        charger
            .regs()
            .set(BATTERY_CHARGER_STATUS_7_REG, BatTempStatus::COLD_SOFT.bits());

        assert_eq!(
            block_on(charger.battery_get_property(BatteryProperty::Health)),
            Ok(Health::Cool as i32)
        );

        charger
            .bms()
            .set(PeerProperty::Health, Health::Overheat as i32);
        assert_eq!(
            block_on(charger.battery_get_property(BatteryProperty::Health)),
            Ok(Health::Overheat as i32)
        );
    }

    #[test]
    fn bms_only_properties_need_bms() {
        let charger = charger_with(ChargerConfig::default());
        assert_eq!(
            block_on(charger.battery_get_property(BatteryProperty::Capacity)),
            Err(ChargerError::NoData)
        );

        charger.bms().set(PeerProperty::Capacity, 77);
        charger.bms().set(PeerProperty::Temp, 253);
        assert_eq!(
            block_on(charger.battery_get_property(BatteryProperty::Capacity)),
            Ok(77)
        );
        assert_eq!(
            block_on(charger.battery_get_property(BatteryProperty::Temp)),
            Ok(253)
        );
    }

    #[test]
    fn charge_limits_fall_back_to_local_values() {
        let charger = charger_with(ChargerConfig::default());

        assert_eq!(
            block_on(charger.battery_get_property(BatteryProperty::ConstantChargeCurrentMax)),
            Ok(3_250_000)
        );
        assert_eq!(
            block_on(charger.battery_get_property(BatteryProperty::ConstantChargeVoltageMax)),
            Ok(8_800_000)
        );
        assert_eq!(
            block_on(charger.battery_get_property(BatteryProperty::ChargeTermCurrent)),
            Ok(-325_000)
        );
    }

    #[test]
    fn set_float_voltage_without_bms() {
        let charger = charger_with(ChargerConfig::default());

        block_on(
            charger.battery_set_property(BatteryProperty::ConstantChargeVoltageMax, 8_400_000),
        )
        .unwrap();

        assert_eq!(block_on(charger.state()).float_volt_uv, 8_400_000);
        assert_eq!(charger.regs().get(CHGR_FLOAT_VOLTAGE_CFG_REG), 60);
        assert_eq!(
            block_on(charger.battery_get_property(BatteryProperty::VoltageMax)),
            Ok(8_400_000)
        );
    }

    #[test]
    fn bms_value_wins_over_requested_fcc() {
        let charger = charger_with(ChargerConfig::default());
        charger
            .bms()
            .set(PeerProperty::ConstantChargeCurrentMax, 1_000_000);

        block_on(
            charger.battery_set_property(BatteryProperty::ConstantChargeCurrentMax, 2_000_000),
        )
        .unwrap();

        assert_eq!(block_on(charger.state()).fastchg_curr_ua, 1_000_000);
        assert_eq!(charger.regs().get(CHGR_FAST_CHARGE_CURRENT_CFG_REG), 21);
    }

    #[test]
    fn read_only_battery_property_rejected() {
        let charger = charger_with(ChargerConfig::default());

        assert_eq!(
            block_on(charger.battery_set_property(BatteryProperty::Capacity, 50)),
            Err(ChargerError::InvalidArgument)
        );
    }
}
