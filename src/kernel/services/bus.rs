//! Single-consumer action queue between the controller and the store.

use tokio::sync::mpsc::{self, error::SendError, error::TryRecvError, UnboundedReceiver, UnboundedSender};

#[derive(Debug)]
pub enum SitemapMessage {
    Action(crate::kernel::Action),
    Shutdown,
}

#[derive(Clone)]
pub struct SitemapBusSender {
    tx: UnboundedSender<SitemapMessage>,
}

pub struct SitemapBusReceiver {
    rx: UnboundedReceiver<SitemapMessage>,
}

pub fn sitemap_bus() -> (SitemapBusSender, SitemapBusReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SitemapBusSender { tx }, SitemapBusReceiver { rx })
}

impl SitemapBusSender {
    pub fn send(&self, msg: SitemapMessage) -> Result<(), SendError<SitemapMessage>> {
        self.tx.send(msg)
    }

    pub fn send_action(
        &self,
        action: crate::kernel::Action,
    ) -> Result<(), SendError<SitemapMessage>> {
        self.send(SitemapMessage::Action(action))
    }

    pub fn shutdown(&self) -> Result<(), SendError<SitemapMessage>> {
        self.send(SitemapMessage::Shutdown)
    }
}

impl SitemapBusReceiver {
    pub fn try_recv(&mut self) -> Result<SitemapMessage, TryRecvError> {
        self.rx.try_recv()
    }

    pub async fn recv(&mut self) -> Option<SitemapMessage> {
        self.rx.recv().await
    }
}
