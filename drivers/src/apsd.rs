//! Input current limit reconciliation once source detection completes.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use crate::charger::{Smb235x, BASED_VOLTAGE_UV};
use crate::peer::{PeerProperty, PowerSupplyRegistry};
use crate::regmap::Regmap;
use crate::regs::{HvdcpCmd, USB_CMD_HVDCP_2_REG};
use crate::types::ChargerType;

pub const SDP_CURRENT_UA: u32 = 500_000;
pub const CDP_CURRENT_UA: u32 = 1_500_000;
pub const DCP_CURRENT_UA: u32 = 1_500_000;
pub const HVDCP_CURRENT_UA: u32 = 3_000_000;

impl<M, R, D, P> Smb235x<M, R, D, P>
where
    M: RawMutex,
    R: Regmap,
    D: DelayNs,
    P: PowerSupplyRegistry,
{
    /// Classifies the source and programs the input current limit for it.
    ///
    /// HVDCP2 sources are forced to 9V and HVDCP3 sources renegotiated to the
    /// last requested voltage first. While a PD contract is active the TCPM
    /// current limit replaces the per-type baseline. Failures are logged and
    /// end the reconciliation.
    pub async fn handle_apsd_done(&self, done: bool) {
        if !done {
            return;
        }

        let charger_type = match self.classify().await {
            Ok((charger_type, _)) => charger_type,
            Err(e) => {
                error!("Failed to get the charger type: {:?}", e);
                return;
            }
        };
        debug!("APSD done, charger type {}", charger_type);

        let (sdp_icl_ua, hvdcp3_voltage_uv) = {
            let mut state = self.state.lock().await;
            if charger_type != ChargerType::Hvdcp3 {
                state.based_hvdcp_voltage_uv = BASED_VOLTAGE_UV;
            }
            (state.sdp_icl_ua, state.hvdcp3_voltage_uv)
        };

        let mut icl_ma = match charger_type {
            ChargerType::Sdp if sdp_icl_ua != 0 => sdp_icl_ua / 1000,
            ChargerType::Sdp => SDP_CURRENT_UA / 1000,
            ChargerType::Cdp => CDP_CURRENT_UA / 1000,
            ChargerType::Dcp => DCP_CURRENT_UA / 1000,
            ChargerType::Float => SDP_CURRENT_UA / 1000,
            ChargerType::Hvdcp2 => {
                let force_9v = HvdcpCmd::FORCE_9V.bits();
                if let Err(e) = self.update_reg(USB_CMD_HVDCP_2_REG, force_9v, force_9v).await {
                    error!("Failed to force HVDCP2 to 9V: {:?}", e);
                    return;
                }
                HVDCP_CURRENT_UA / 1000
            }
            ChargerType::Hvdcp3 => {
                if let Err(e) = self.set_hvdcp3_voltage(hvdcp3_voltage_uv).await {
                    error!("Failed to set the hvdcp3 voltage: {:?}", e);
                }
                HVDCP_CURRENT_UA / 1000
            }
            _ => SDP_CURRENT_UA / 1000,
        };

        if self.pd_active().await {
            match self.get_prop_from_tcpm(PeerProperty::CurrentMax).await {
                Ok(current_ua) => icl_ma = current_ua.max(0) as u32 / 1000,
                Err(e) => {
                    error!("Failed to get icl from tcpm: {:?}", e);
                    return;
                }
            }
        }

        if let Err(e) = self.set_icl_sw(icl_ma).await {
            error!("Failed to set current of type {}: {:?}", charger_type, e);
        }
    }
}
