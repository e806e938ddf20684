//! Virtual register pool
//!
//! Lowering acquires registers as owning [`Reg`] guards. A guard is neither
//! `Copy` nor `Clone` and `release` consumes it, so a register cannot be handed
//! back twice. IR operands refer to registers by the plain [`RegId`].

use serde::Serialize;
use std::fmt;

/// Initial number of slots
const SEED_CAPACITY: usize = 10;

/// Register number as it appears in IR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RegId(pub usize);

impl fmt::Display for RegId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Ownership of a live register slot
#[must_use = "an acquired register must be released"]
#[derive(Debug, PartialEq, Eq)]
pub struct Reg {
    index: usize,
}

impl Reg {
    #[inline]
    pub fn id(&self) -> RegId {
        RegId(self.index)
    }
}

/// What the optimizer knows about a register's contents
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegValue {
    #[default]
    Unknown,
    Literal(u64),
    /// Holds the current value of the named variable
    Variable(String),
}

/// Register misuse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
    #[error("register r{0} released while already free")]
    AlreadyFree(usize),
    #[error("register r{0} does not belong to this pool")]
    Foreign(usize),
}

#[derive(Debug, Clone, Default)]
struct Slot {
    used: bool,
    value: RegValue,
}

/// Reusable pool of virtual registers
#[derive(Debug, Clone)]
pub struct RegisterPool {
    slots: Vec<Slot>,
}

impl Default for RegisterPool {
    fn default() -> Self {
        Self::new()
    }
}

static UNKNOWN: RegValue = RegValue::Unknown;

impl RegisterPool {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::default(); SEED_CAPACITY],
        }
    }

    /// Total number of slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of acquired, unreleased registers
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.used).count()
    }

    /// Take the lowest free slot, doubling the pool when none is left
    pub fn acquire(&mut self) -> Reg {
        let index = match self.slots.iter().position(|s| !s.used) {
            Some(index) => index,
            None => {
                let index = self.slots.len();
                let grown = (self.slots.len() * 2).max(SEED_CAPACITY);
                self.slots.resize(grown, Slot::default());
                index
            }
        };
        self.slots[index].used = true;
        Reg { index }
    }

    /// Hand a register back to the pool
    pub fn release(
        &mut self,
        reg: Reg,
    ) -> Result<(), RegisterError> {
        let slot = self
            .slots
            .get_mut(reg.index)
            .ok_or(RegisterError::Foreign(reg.index))?;
        if !slot.used {
            return Err(RegisterError::AlreadyFree(reg.index));
        }
        slot.used = false;
        Ok(())
    }

    /// Symbolic value of a register; registers the pool never handed out are unknown
    pub fn value(
        &self,
        id: RegId,
    ) -> &RegValue {
        self.slots.get(id.0).map(|s| &s.value).unwrap_or(&UNKNOWN)
    }

    pub fn set_value(
        &mut self,
        id: RegId,
        value: RegValue,
    ) {
        if id.0 >= self.slots.len() {
            self.slots.resize(id.0 + 1, Slot::default());
        }
        self.slots[id.0].value = value;
    }

    /// Forget every symbolic value
    pub fn reset_values(&mut self) {
        for slot in &mut self.slots {
            slot.value = RegValue::Unknown;
        }
    }

    /// A store to `name` makes registers aliasing it stale
    pub fn invalidate_variable(
        &mut self,
        name: &str,
    ) {
        for slot in &mut self.slots {
            if matches!(&slot.value, RegValue::Variable(v) if v == name) {
                slot.value = RegValue::Unknown;
            }
        }
    }
}
