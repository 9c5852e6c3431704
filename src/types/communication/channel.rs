use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// A bounded multi-producer, single-consumer channel between workers and their coordinator
pub struct Channel<T> {
    tx: mpsc::Sender<T>,
    rx: mpsc::Receiver<T>,
}

impl<T> Channel<T> {
    /// Create a new channel with the specified buffer size
    pub fn new(buffer_size: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer_size);
        Self { tx, rx }
    }

    /// Split the channel into sender and receiver
    pub fn split(self) -> (Sender<T>, Receiver<T>) {
        (
            Sender { tx: self.tx },
            Receiver { rx: self.rx },
        )
    }
}

/// A sender for sending messages
pub struct Sender<T> {
    tx: mpsc::Sender<T>,
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T> Sender<T> {
    /// Send a message, waiting for capacity.
    ///
    /// Returns false once the receiving side is gone.
    pub async fn send(&self, data: T) -> bool {
        self.tx.send(data).await.is_ok()
    }
}

/// A receiver for receiving messages
pub struct Receiver<T> {
    rx: mpsc::Receiver<T>,
}

impl<T> Receiver<T> {
    /// Take everything currently queued.
    ///
    /// The second element is true once all senders are dropped and the queue is empty,
    /// i.e. nothing more will ever arrive.
    pub fn drain(&mut self) -> (Vec<T>, bool) {
        let mut messages = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(message) => messages.push(message),
                Err(TryRecvError::Empty) => return (messages, false),
                Err(TryRecvError::Disconnected) => return (messages, true),
            }
        }
    }
}
