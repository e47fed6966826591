//! Engine registry: one slot per [`Engine`], resolved before a run.
//!
//! A slot either holds a provider or records why the engine is absent.
//! Iteration always follows [`Engine::ALL`], which fixes the order of
//! result rows and progress events.

use std::fmt;

use crossbench_common::Engine;

use crate::{KernelProvider, ReferenceKernel};

/// Resolution state of one engine.
pub enum EngineSlot {
    Available(Box<dyn KernelProvider>),
    Absent { reason: String },
}

impl EngineSlot {
    pub fn absent(reason: impl Into<String>) -> Self {
        Self::Absent { reason: reason.into() }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn provider(&self) -> Option<&dyn KernelProvider> {
        match self {
            Self::Available(provider) => Some(provider.as_ref()),
            Self::Absent { .. } => None,
        }
    }

    /// Why the engine is absent, if it is.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Available(_) => None,
            Self::Absent { reason } => Some(reason),
        }
    }
}

impl fmt::Debug for EngineSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(provider) => f.debug_tuple("Available").field(&provider.name()).finish(),
            Self::Absent { reason } => f.debug_struct("Absent").field("reason", reason).finish(),
        }
    }
}

impl fmt::Display for EngineSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(_) => write!(f, "available"),
            Self::Absent { reason } => write!(f, "absent ({reason})"),
        }
    }
}

/// Fixed-order mapping from engine to slot.
#[derive(Debug)]
pub struct KernelRegistry {
    slots: Vec<(Engine, EngineSlot)>,
}

impl KernelRegistry {
    /// Registry with the reference engine available and every other
    /// engine absent.
    pub fn new() -> Self {
        let slots = Engine::ALL
            .into_iter()
            .map(|engine| {
                let slot = if engine.is_baseline() {
                    EngineSlot::Available(Box::new(ReferenceKernel))
                } else {
                    EngineSlot::absent("not registered")
                };
                (engine, slot)
            })
            .collect();
        Self { slots }
    }

    /// Replace the slot for `engine`.
    pub fn set(&mut self, engine: Engine, slot: EngineSlot) -> &mut Self {
        if let Some(entry) = self.slots.iter_mut().find(|(e, _)| *e == engine) {
            entry.1 = slot;
        }
        self
    }

    pub fn register(&mut self, engine: Engine, provider: Box<dyn KernelProvider>) -> &mut Self {
        self.set(engine, EngineSlot::Available(provider))
    }

    pub fn mark_absent(&mut self, engine: Engine, reason: impl Into<String>) -> &mut Self {
        self.set(engine, EngineSlot::absent(reason))
    }

    #[must_use]
    pub fn with_provider(mut self, engine: Engine, provider: Box<dyn KernelProvider>) -> Self {
        self.register(engine, provider);
        self
    }

    #[must_use]
    pub fn with_absent(mut self, engine: Engine, reason: impl Into<String>) -> Self {
        self.mark_absent(engine, reason);
        self
    }

    pub fn slot(&self, engine: Engine) -> &EngineSlot {
        // every engine has a slot from construction on
        &self.slots[engine as usize].1
    }

    pub fn provider(&self, engine: Engine) -> Option<&dyn KernelProvider> {
        self.slot(engine).provider()
    }

    /// Slots in measurement order.
    pub fn iter(&self) -> impl Iterator<Item = (Engine, &EngineSlot)> {
        self.slots.iter().map(|(engine, slot)| (*engine, slot))
    }

    pub fn available(&self) -> Vec<Engine> {
        self.iter().filter(|(_, slot)| slot.is_available()).map(|(engine, _)| engine).collect()
    }

    /// Absent engines with their reasons.
    pub fn absent(&self) -> Vec<(Engine, &str)> {
        self.iter().filter_map(|(engine, slot)| slot.reason().map(|reason| (engine, reason))).collect()
    }

    /// One-line description for logs, e.g. `reference=available cpp=absent (...)`.
    pub fn summary(&self) -> String {
        self.iter().map(|(engine, slot)| format!("{engine}={slot}")).collect::<Vec<_>>().join(" ")
    }
}

impl Default for KernelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
