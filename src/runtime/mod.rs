//! 运行时：单消费者动作循环
//!
//! Owns the store and the controller. Actions are popped from the bus in
//! emission order, dispatched, and the resulting effects are handed to the
//! controller, whose answers land back on the bus.

mod script;

pub use script::{run_script, ScriptOp};

use crate::kernel::change::SitemapChange;
use crate::kernel::error::Result;
use crate::kernel::services::bus::{
    sitemap_bus, SitemapBusReceiver, SitemapBusSender, SitemapMessage,
};
use crate::kernel::services::ports::{EffectHandler, SitemapConfig, SitemapController};
use crate::kernel::{Action, Effect, SitemapViewState, Store};

pub struct SitemapRuntime<C> {
    store: Store,
    controller: C,
    tx: SitemapBusSender,
    rx: SitemapBusReceiver,
}

impl<C> SitemapRuntime<C>
where
    C: SitemapController + EffectHandler,
{
    /// Initializes the store from the controller and hands the startup
    /// effects to the controller. Nothing is dispatched yet.
    pub fn new(controller: C, config: SitemapConfig) -> Result<Self> {
        let (store, effects) = Store::init(&controller, config)?;
        let (tx, rx) = sitemap_bus();
        let mut runtime = Self {
            store,
            controller,
            tx,
            rx,
        };
        runtime.handle_effects(effects);
        Ok(runtime)
    }

    pub fn sender(&self) -> SitemapBusSender {
        self.tx.clone()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn state(&self) -> &SitemapViewState {
        self.store.state()
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    /// Dispatches one action immediately. Returns whether the view changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let result = self.store.dispatch(&self.controller, action);
        self.handle_effects(result.effects);
        result.state_changed
    }

    fn handle_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.controller.handle_effect(effect, &self.tx);
        }
    }

    /// Runs a controller operation and queues the change it produced.
    pub fn apply(
        &mut self,
        op: impl FnOnce(&mut C) -> Result<SitemapChange>,
    ) -> Result<()> {
        let change = op(&mut self.controller)?;
        tracing::trace!(entry = %change.entry_id, kind = ?change.change_type, "change queued");
        if self.tx.send_action(Action::Change(change)).is_err() {
            tracing::warn!("sitemap bus closed, change dropped");
        }
        Ok(())
    }

    /// Drains the bus without waiting. Returns the number of actions handled.
    pub fn run_until_idle(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                SitemapMessage::Action(action) => {
                    self.dispatch(action);
                    handled += 1;
                }
                SitemapMessage::Shutdown => {
                    tracing::debug!("shutdown seen while draining");
                    break;
                }
            }
        }
        handled
    }

    /// Waits for actions until a shutdown message arrives.
    pub async fn run(&mut self) -> usize {
        let mut handled = 0;
        while let Some(msg) = self.rx.recv().await {
            match msg {
                SitemapMessage::Action(action) => {
                    self.dispatch(action);
                    handled += 1;
                }
                SitemapMessage::Shutdown => break,
            }
        }
        tracing::info!(handled, "sitemap runtime stopped");
        handled
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime.rs"]
mod tests;
