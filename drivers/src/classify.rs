//! Charger type detection from the power path status, the TCPM peer and the
//! APSD result.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use crate::charger::{ChargerState, Smb235x, BASED_VOLTAGE_UV};
use crate::error::ChargerError;
use crate::peer::{PeerProperty, PowerSupplyRegistry};
use crate::regmap::Regmap;
use crate::regs::{ApsdResult, PowerPathStatus, DCDC_POWER_PATH_STATUS_REG, USB_APSD_RESULT_STATUS_REG};
use crate::types::{ChargerType, UsbType};

/// Decodes an APSD result. Every set bit is applied in detection order and
/// the last one wins, so a QC2.0 source that also reports DCP is HVDCP2.
/// Returns `None` when no known bit is set.
pub fn decode_apsd_result(result: ApsdResult) -> Option<(ChargerType, UsbType)> {
    const ORDER: [(ApsdResult, ChargerType, UsbType); 7] = [
        (ApsdResult::FLOAT_CHARGER, ChargerType::Float, UsbType::Unknown),
        (ApsdResult::DCP_CHARGER, ChargerType::Dcp, UsbType::Dcp),
        (ApsdResult::OCP_CHARGER, ChargerType::Dcp, UsbType::Dcp),
        (ApsdResult::CDP_CHARGER, ChargerType::Cdp, UsbType::Cdp),
        (ApsdResult::SDP_CHARGER, ChargerType::Sdp, UsbType::Sdp),
        (ApsdResult::QC_3P0, ChargerType::Hvdcp3, UsbType::Dcp),
        (ApsdResult::QC_2P0, ChargerType::Hvdcp2, UsbType::Dcp),
    ];

    ORDER
        .iter()
        .filter(|(bit, _, _)| result.contains(*bit))
        .map(|&(_, charger_type, usb_type)| (charger_type, usb_type))
        .last()
}

/// Stores a classification. Leaving HVDCP3 drops the negotiated base, the
/// next HVDCP3 source starts from 5V again.
fn set_type(state: &mut ChargerState, charger_type: ChargerType, usb_type: UsbType) {
    state.charger_type = charger_type;
    state.usb_type = usb_type;
    if charger_type != ChargerType::Hvdcp3 {
        state.based_hvdcp_voltage_uv = BASED_VOLTAGE_UV;
    }
}

impl<M, R, D, P> Smb235x<M, R, D, P>
where
    M: RawMutex,
    R: Regmap,
    D: DelayNs,
    P: PowerSupplyRegistry,
{
    /// USBIN is the active input and carries valid power. A failed status
    /// read counts as offline.
    pub async fn get_usb_online(&self) -> bool {
        match self.read_reg(DCDC_POWER_PATH_STATUS_REG).await {
            Ok(stat) => PowerPathStatus::from_bits_truncate(stat).contains(
                PowerPathStatus::USE_USBIN | PowerPathStatus::VALID_INPUT_POWER_SOURCE,
            ),
            Err(e) => {
                error!("Failed to read DCDC_POWER_PATH_STATUS: {:?}", e);
                false
            }
        }
    }

    /// Determines the attached source and stores it in the charger state.
    ///
    /// A PD result from the TCPM peer takes precedence over APSD unless the
    /// port is still a plain Type-C source. An APSD result with no bit set
    /// leaves the previous classification in place.
    pub async fn classify(&self) -> Result<(ChargerType, UsbType), ChargerError> {
        if !self.get_usb_online().await {
            set_type(&mut *self.state.lock().await, ChargerType::Unknown, UsbType::Unknown);
            return Ok((ChargerType::Unknown, UsbType::Unknown));
        }

        match self.get_prop_from_tcpm(PeerProperty::UsbType).await {
            Ok(raw) => match u8::try_from(raw).ok().and_then(|v| UsbType::try_from(v).ok()) {
                Some(UsbType::C) => {}
                Some(usb_type) => {
                    let charger_type = ChargerType::from(usb_type);
                    set_type(&mut *self.state.lock().await, charger_type, usb_type);
                    return Ok((charger_type, usb_type));
                }
                None => error!("Unknown USB type {} from tcpm", raw),
            },
            Err(e) => error!("Failed to get USB type from tcpm: {:?}", e),
        }

        let stat = self.read_reg(USB_APSD_RESULT_STATUS_REG).await.map_err(|e| {
            error!("Failed to read USB_APSD_RESULT_STATUS: {:?}", e);
            e
        })?;
        let result = ApsdResult::from_bits_truncate(stat);
        debug!("APSD result {:#x}", result.bits());

        let mut state = self.state.lock().await;
        if let Some((charger_type, usb_type)) = decode_apsd_result(result) {
            set_type(&mut state, charger_type, usb_type);
        }
        Ok((state.charger_type, state.usb_type))
    }
}
