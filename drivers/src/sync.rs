//! Background work: the periodic BMS synchronisation and the PD status
//! worker fed by the TCPM change notifier.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use libm::round;

use crate::charger::Smb235x;
use crate::peer::{PeerProperty, PowerSupplyRegistry};
use crate::regmap::Regmap;
use crate::regs::{
    CHGR_STEP_CHG_SOC_VBATT_V_REG, CHGR_STEP_CHG_SOC_VBATT_V_UPDATE_REG,
    CHGR_STEP_SOC_VBATT_V_UPDATE_BIT,
};
use crate::types::{PsyEvent, UsbType};

/// Delay before the first synchronisation pass
pub const INITIAL_UPDATE_DELAY_MS: u32 = 20;
/// Period of the synchronisation passes
pub const UPDATE_PERIOD_MS: u32 = 10_000;

/// Scales a capacity in percent to the 8 bit SOC register
pub fn soc_code(capacity: i32) -> u8 {
    round(f64::from(capacity) * 255.0 / 100.0).clamp(0.0, 255.0) as u8
}

impl<M, R, D, P> Smb235x<M, R, D, P>
where
    M: RawMutex,
    R: Regmap,
    D: DelayNs,
    P: PowerSupplyRegistry,
{
    /// Feeds the BMS state of charge to the step charging logic
    pub async fn update_soc(&self) {
        let Ok(capacity) = self.get_prop_from_bms(PeerProperty::Capacity).await else {
            return;
        };

        if let Err(e) = self
            .write_reg(CHGR_STEP_CHG_SOC_VBATT_V_REG, soc_code(capacity))
            .await
        {
            error!("Failed to update SOC: {:?}", e);
            return;
        }

        if let Err(e) = self
            .update_reg(
                CHGR_STEP_CHG_SOC_VBATT_V_UPDATE_REG,
                CHGR_STEP_SOC_VBATT_V_UPDATE_BIT,
                CHGR_STEP_SOC_VBATT_V_UPDATE_BIT,
            )
            .await
        {
            error!("Failed to latch the SOC update: {:?}", e);
        }
    }

    /// Follows the fast charge current and float voltage the BMS asks for.
    /// Each is stored only once it has been programmed.
    pub async fn update_fv_fcc(&self) {
        if let Some(fcc_ua) = self.bms_target(PeerProperty::ConstantChargeCurrentMax).await {
            let current = self.state.lock().await.fastchg_curr_ua;
            if fcc_ua != current && self.set_fcc(fcc_ua).await.is_ok() {
                self.state.lock().await.fastchg_curr_ua = fcc_ua;
            }
        }

        if let Some(fv_uv) = self.bms_target(PeerProperty::ConstantChargeVoltageMax).await {
            let current = self.state.lock().await.float_volt_uv;
            if fv_uv != current && self.set_fv(fv_uv).await.is_ok() {
                self.state.lock().await.float_volt_uv = fv_uv;
            }
        }
    }

    async fn bms_target(&self, prop: PeerProperty) -> Option<u32> {
        let value = self.get_prop_from_bms(prop).await.ok()?;
        match u32::try_from(value) {
            Ok(value) => Some(value),
            Err(_) => {
                error!("Ignoring negative {:?} {} from bms", prop, value);
                None
            }
        }
    }

    /// One synchronisation pass
    pub async fn sync_once(&self) {
        self.update_soc().await;
        self.update_fv_fcc().await;
    }

    /// Runs [`Self::sync_once`] 20ms after start and every 10s after that,
    /// until [`Self::shutdown`]. Only the waits are interrupted, a pass in
    /// progress always completes.
    ///
    /// # Arguments
    /// * `timer` - delay provider for the period
    pub async fn run_update_loop<T: DelayNs>(&self, timer: &mut T) {
        let mut wait_ms = INITIAL_UPDATE_DELAY_MS;
        loop {
            if let Either::First(()) =
                select(self.update_stop.wait(), timer.delay_ms(wait_ms)).await
            {
                break;
            }
            self.sync_once().await;
            wait_ms = UPDATE_PERIOD_MS;
        }
        debug!("update loop stopped");
    }

    /// Power supply notifier callback. Schedules the PD status worker when
    /// the TCPM supply reports a property change, unless it is already
    /// scheduled.
    ///
    /// # Arguments
    /// * `event` - framework notification
    /// * `supply_name` - name of the power supply that raised it
    pub fn tcpm_notifier(&self, event: PsyEvent, supply_name: &str) {
        if event != PsyEvent::PropChanged {
            return;
        }

        if self.status_change.signaled() {
            return;
        }

        if supply_name == self.tcpm_full_name {
            self.status_change.signal(());
        }
    }

    /// Tracks the PD contract: a plain Type-C port ends it, anything else
    /// starts it and applies the TCPM current limit.
    pub async fn tcpm_update_icl(&self) {
        let usb_type = match self.get_prop_from_tcpm(PeerProperty::UsbType).await {
            Ok(usb_type) => usb_type,
            Err(e) => {
                error!("Failed to get USB type from tcpm: {:?}", e);
                return;
            }
        };

        if usb_type == i32::from(u8::from(UsbType::C)) {
            self.state.lock().await.pd_active = false;
            return;
        }
        self.state.lock().await.pd_active = true;

        let current_ua = match self.get_prop_from_tcpm(PeerProperty::CurrentMax).await {
            Ok(current_ua) => current_ua,
            Err(e) => {
                error!("Failed to get icl from tcpm: {:?}", e);
                return;
            }
        };

        if let Err(e) = self.set_icl_sw(current_ua.max(0) as u32 / 1000).await {
            let charger_type = self.charger_type().await;
            error!("Failed to set current of type {}: {:?}", charger_type, e);
        }
    }

    /// Runs [`Self::tcpm_update_icl`] each time the notifier schedules it,
    /// until [`Self::shutdown`]. A scheduled update still runs before the
    /// worker stops.
    pub async fn run_status_change_worker(&self) {
        loop {
            match select(self.status_change.wait(), self.status_stop.wait()).await {
                Either::First(()) => self.tcpm_update_icl().await,
                Either::Second(()) => break,
            }
        }
        debug!("status change worker stopped");
    }
}
