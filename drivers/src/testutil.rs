//! In-memory register file, delay and peer power supplies for unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Deref;
use std::rc::Rc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal_async::delay::DelayNs;

use crate::charger::Smb235x;
use crate::config::{ChargerConfig, TCPM_PSY_NAME_PREFIX};
use crate::error::ChargerError;
use crate::peer::{PeerProperty, PowerSupply, PowerSupplyRegistry, BMS_PSY_NAME};
use crate::regmap::Regmap;
use crate::regs::{PowerPathStatus, DCDC_POWER_PATH_STATUS_REG};

pub type TestCharger = Smb235x<CriticalSectionRawMutex, MockRegmap, MockDelay, MockRegistry>;

/// A register access that went through, in issue order
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Read(u16),
    Write(u16, u8),
    Update { reg: u16, mask: u8, val: u8 },
}

#[derive(Default)]
struct RegFileInner {
    values: HashMap<u16, u8>,
    /// Accesses left before the register starts failing
    failures: HashMap<u16, usize>,
    ops: Vec<Op>,
}

/// Register contents shared between a test and its [`MockRegmap`]
#[derive(Clone, Default)]
pub struct RegFile(Rc<RefCell<RegFileInner>>);

impl RegFile {
    pub fn get(&self, reg: u16) -> u8 {
        self.0.borrow().values.get(&reg).copied().unwrap_or(0)
    }

    pub fn set(&self, reg: u16, val: u8) {
        self.0.borrow_mut().values.insert(reg, val);
    }

    pub fn fail_on(&self, reg: u16) {
        self.fail_after(reg, 0);
    }

    /// Lets `successes` accesses to `reg` through, then fails every one after
    pub fn fail_after(&self, reg: u16, successes: usize) {
        self.0.borrow_mut().failures.insert(reg, successes);
    }

    pub fn touched(&self, reg: u16) -> bool {
        self.0.borrow().ops.iter().any(|op| match op {
            Op::Read(r) | Op::Write(r, _) => *r == reg,
            Op::Update { reg: r, .. } => *r == reg,
        })
    }

    pub fn ops(&self) -> Vec<Op> {
        self.0.borrow().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.0.borrow_mut().ops.clear();
    }

    fn access(&self, reg: u16, op: Op) -> Result<(), ChargerError> {
        let mut inner = self.0.borrow_mut();
        if let Some(left) = inner.failures.get_mut(&reg) {
            if *left == 0 {
                return Err(ChargerError::Regmap);
            }
            *left -= 1;
        }
        inner.ops.push(op);
        Ok(())
    }
}

pub struct MockRegmap {
    regs: RegFile,
}

impl Regmap for MockRegmap {
    async fn read(&mut self, reg: u16) -> Result<u8, ChargerError> {
        self.regs.access(reg, Op::Read(reg))?;
        Ok(self.regs.get(reg))
    }

    async fn write(&mut self, reg: u16, val: u8) -> Result<(), ChargerError> {
        self.regs.access(reg, Op::Write(reg, val))?;
        self.regs.set(reg, val);
        Ok(())
    }

    async fn update_bits(&mut self, reg: u16, mask: u8, val: u8) -> Result<(), ChargerError> {
        self.regs.access(reg, Op::Update { reg, mask, val })?;
        let orig = self.regs.get(reg);
        self.regs.set(reg, (orig & !mask) | (val & mask));
        Ok(())
    }
}

/// Records requested delays in microseconds and returns immediately
pub struct MockDelay {
    delays_us: Rc<RefCell<Vec<u32>>>,
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.delays_us.borrow_mut().push(ns / 1000);
    }

    async fn delay_us(&mut self, us: u32) {
        self.delays_us.borrow_mut().push(us);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.delays_us.borrow_mut().push(ms.saturating_mul(1000));
    }
}

#[derive(Default)]
struct SupplyInner {
    registered: bool,
    props: HashMap<PeerProperty, Result<i32, ChargerError>>,
    queries: Vec<PeerProperty>,
}

/// A peer power supply. It is registered once a test gives it a property.
#[derive(Clone, Default)]
pub struct SupplyHandle(Rc<RefCell<SupplyInner>>);

impl SupplyHandle {
    pub fn set(&self, prop: PeerProperty, value: i32) {
        let mut inner = self.0.borrow_mut();
        inner.registered = true;
        inner.props.insert(prop, Ok(value));
    }

    pub fn fail(&self, prop: PeerProperty, err: ChargerError) {
        let mut inner = self.0.borrow_mut();
        inner.registered = true;
        inner.props.insert(prop, Err(err));
    }

    pub fn queries(&self) -> Vec<PeerProperty> {
        self.0.borrow().queries.clone()
    }

    fn registered(&self) -> bool {
        self.0.borrow().registered
    }
}

pub struct MockSupply(SupplyHandle);

impl PowerSupply for MockSupply {
    async fn get_property(&mut self, prop: PeerProperty) -> Result<i32, ChargerError> {
        let mut inner = self.0 .0.borrow_mut();
        inner.queries.push(prop);
        inner
            .props
            .get(&prop)
            .copied()
            .unwrap_or(Err(ChargerError::Peer))
    }
}

pub struct MockRegistry {
    bms: SupplyHandle,
    tcpm: SupplyHandle,
    tcpm_name: String,
    lookups: Rc<RefCell<Vec<String>>>,
}

impl PowerSupplyRegistry for MockRegistry {
    type Supply = MockSupply;

    fn get_by_name(&self, name: &str) -> Option<MockSupply> {
        self.lookups.borrow_mut().push(String::from(name));
        let supply = if name == BMS_PSY_NAME {
            &self.bms
        } else if name == self.tcpm_name {
            &self.tcpm
        } else {
            return None;
        };
        supply.registered().then(|| MockSupply(supply.clone()))
    }
}

/// A charger wired to mocks, with handles to inspect and steer them
pub struct Harness {
    charger: TestCharger,
    regs: RegFile,
    bms: SupplyHandle,
    tcpm: SupplyHandle,
    delays_us: Rc<RefCell<Vec<u32>>>,
    lookups: Rc<RefCell<Vec<String>>>,
}

impl Harness {
    pub fn regs(&self) -> RegFile {
        self.regs.clone()
    }

    pub fn bms(&self) -> SupplyHandle {
        self.bms.clone()
    }

    pub fn tcpm(&self) -> SupplyHandle {
        self.tcpm.clone()
    }

    /// USBIN becomes the active input with valid power
    pub fn plug_in(&self) {
        self.regs.set(
            DCDC_POWER_PATH_STATUS_REG,
            (PowerPathStatus::USE_USBIN | PowerPathStatus::VALID_INPUT_POWER_SOURCE).bits(),
        );
    }

    pub fn delays_us(&self) -> Vec<u32> {
        self.delays_us.borrow().clone()
    }

    pub fn registry_lookups(&self, name: &str) -> usize {
        self.lookups.borrow().iter().filter(|n| *n == name).count()
    }
}

impl Deref for Harness {
    type Target = TestCharger;

    fn deref(&self) -> &TestCharger {
        &self.charger
    }
}

pub fn charger_with(config: ChargerConfig) -> Harness {
    let regs = RegFile::default();
    let bms = SupplyHandle::default();
    let tcpm = SupplyHandle::default();
    let delays_us = Rc::new(RefCell::new(Vec::new()));
    let lookups = Rc::new(RefCell::new(Vec::new()));

    let registry = MockRegistry {
        bms: bms.clone(),
        tcpm: tcpm.clone(),
        tcpm_name: format!("{}{}", TCPM_PSY_NAME_PREFIX, config.tcpm_psy_name),
        lookups: lookups.clone(),
    };
    let regmap = MockRegmap { regs: regs.clone() };
    let delay = MockDelay {
        delays_us: delays_us.clone(),
    };

    Harness {
        charger: Smb235x::new(config, regmap, delay, registry),
        regs,
        bms,
        tcpm,
        delays_us,
        lookups,
    }
}
