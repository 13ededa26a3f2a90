//! Hand-off channel between accounts.
//!
//! Every account owns a [`Mailbox`]. Other accounts only ever hold a [`MailboxAddress`],
//! a cloneable sending end, so a transfer never touches the receiving account's
//! containers. The owner drains its mailbox when it is ready to look at what arrived.

use flume::{Receiver, Sender, TryRecvError, TrySendError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery<T> {
    Delivered,
    /// The mailbox is at capacity; the message is handed back.
    Full(T),
    /// The mailbox no longer exists.
    Closed(T),
}

#[derive(Debug)]
pub struct Mailbox<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
}

#[derive(Debug)]
pub struct MailboxAddress<T> {
    sender: Sender<T>,
}

impl<T> Clone for MailboxAddress<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T> Mailbox<T> {
    /// `capacity` is clamped to at least one message.
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = flume::bounded(capacity.max(1));
        Self { sender, receiver }
    }

    pub fn address(&self) -> MailboxAddress<T> {
        MailboxAddress {
            sender: self.sender.clone(),
        }
    }

    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Takes the oldest message, if any.
    pub fn poll(&self) -> Option<T> {
        match self.receiver.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

impl<T> MailboxAddress<T> {
    pub fn send(&self, message: T) -> Delivery<T> {
        match self.sender.try_send(message) {
            Ok(()) => Delivery::Delivered,
            Err(TrySendError::Full(message)) => Delivery::Full(message),
            Err(TrySendError::Disconnected(message)) => Delivery::Closed(message),
        }
    }
}
