#![cfg_attr(not(test), no_std)]
//! SMB235x Switch Mode Battery Charger Library
//!
//! Async driver for the SMB235x PMIC charger peripheral. It detects the
//! attached USB source, negotiates HVDCP2/HVDCP3 voltages, programs the
//! charge currents and voltages, services the charger interrupts and keeps
//! the charger in sync with the fuel gauge and the USB-PD port manager.
//!
//! The driver owns no tasks. The board runs [`Smb235x::run_irq_dispatcher`],
//! [`Smb235x::run_update_loop`] and [`Smb235x::run_status_change_worker`]
//! on its executor and calls [`Smb235x::shutdown`] to stop them.

extern crate alloc;

#[macro_use]
mod fmt;

mod apsd;
mod charger;
mod classify;
/// Board configuration and defaults.
pub mod config;
mod config_engine;
mod error;
mod hvdcp;
/// Interrupt table and dispatch.
pub mod irq;
/// Fuel gauge and port manager lookup.
pub mod peer;
/// Power supply property surface.
pub mod psy;
mod regmap;
mod regs;
mod sync;
mod types;

#[cfg(test)]
mod testutil;

pub use apsd::{CDP_CURRENT_UA, DCP_CURRENT_UA, HVDCP_CURRENT_UA, SDP_CURRENT_UA};
pub use charger::{ChargerState, Smb235x, BASED_VOLTAGE_UV, EVENT_QUEUE_DEPTH, QC3_DEFAULT_VOLTAGE_UV};
pub use classify::decode_apsd_result;
pub use config::{ChargerConfig, FloatOption, InhibitThreshold};
pub use config_engine::{current_code, fcc_code, float_voltage_code, icl_code, termination_code};
pub use error::ChargerError;
pub use hvdcp::QC3_VOLTAGE_STEP_UV;
pub use irq::{IrqController, IrqLine, IrqReturn};
pub use peer::{PeerProperty, PowerSupply, PowerSupplyRegistry};
pub use psy::{BatteryProperty, UsbProperty};
pub use regmap::{I2cRegmap, Regmap};
pub use regs::{ApsdResult, HvdcpCmd};
pub use sync::soc_code;
pub use types::{
    BatteryStatus, ChargeType, ChargerStatus, ChargerType, Health, PowerSupplyKind, PsyEvent,
    UsbType,
};
