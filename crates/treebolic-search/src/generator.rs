use crate::{CancellationToken, GeneratorError};
use crossbeam_channel::{Receiver, Sender, bounded};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

/// The consumer went away or the generator was terminated. Producers return
/// it with `?`; it ends the sequence without being an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

enum Message<T> {
    Item(T),
    Finished,
    Fault(GeneratorError),
}

type Producer<T> = Box<dyn FnOnce(&Yielder<T>) -> Result<(), Interrupted> + Send>;

/// Producer side of the handshake.
pub struct Yielder<T> {
    items: Sender<Message<T>>,
    requests: Receiver<()>,
    cancel: CancellationToken,
}

impl<T> Yielder<T> {
    /// Hand `item` to the consumer, then block until the next one is asked for.
    pub fn yield_item(&self, item: T) -> Result<(), Interrupted> {
        self.check()?;
        self.items.send(Message::Item(item)).map_err(|_| Interrupted)?;
        self.requests.recv().map_err(|_| Interrupted)?;
        self.check()
    }

    /// Fails once termination was requested; call it in long stretches
    /// without yields.
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.cancel.is_cancelled() {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }
}

/// Pull-driven lazy sequence computed by a producer on its own thread.
///
/// The producer starts on the first pull and never runs more than one item
/// ahead: both directions are rendezvous channels, so exactly one item is in
/// flight at a time. Single consumer, single pass.
pub struct Generator<T: Send + 'static> {
    producer: Option<Producer<T>>,
    requests: Option<Sender<()>>,
    items: Option<Receiver<Message<T>>>,
    handle: Option<JoinHandle<()>>,
    cancel: CancellationToken,
    finished: bool,
}

impl<T: Send + 'static> Generator<T> {
    pub fn new<F>(producer: F) -> Self
    where
        F: FnOnce(&Yielder<T>) -> Result<(), Interrupted> + Send + 'static,
    {
        Self {
            producer: Some(Box::new(producer)),
            requests: None,
            items: None,
            handle: None,
            cancel: CancellationToken::new(),
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Next item, `Some(Err(_))` once if the producer failed, then `None`.
    pub fn next_item(&mut self) -> Option<Result<T, GeneratorError>> {
        if self.finished {
            return None;
        }
        if let Err(e) = self.start() {
            self.finished = true;
            return Some(Err(e));
        }
        let message = match (&self.requests, &self.items) {
            (Some(requests), Some(items)) if requests.send(()).is_ok() => items.recv().ok(),
            _ => None,
        };
        match message {
            Some(Message::Item(item)) => Some(Ok(item)),
            Some(Message::Fault(e)) => {
                tracing::warn!("Generator producer failed: {}", e);
                self.shutdown();
                Some(Err(e))
            }
            Some(Message::Finished) | None => {
                self.shutdown();
                None
            }
        }
    }

    /// Stop the producer and wait for its thread. Idempotent.
    pub fn terminate(&mut self) {
        if self.handle.is_some() {
            tracing::debug!("Terminating generator");
        }
        self.cancel.cancel();
        self.producer = None;
        self.shutdown();
    }

    fn start(&mut self) -> Result<(), GeneratorError> {
        let Some(producer) = self.producer.take() else {
            return Ok(());
        };
        let (request_tx, request_rx) = bounded::<()>(0);
        let (item_tx, item_rx) = bounded::<Message<T>>(0);
        let yielder = Yielder {
            items: item_tx,
            requests: request_rx,
            cancel: self.cancel.clone(),
        };
        let handle = thread::Builder::new()
            .name("treebolic-generator".into())
            .spawn(move || run_producer(producer, yielder))
            .map_err(|e| GeneratorError::Spawn(e.to_string()))?;
        self.requests = Some(request_tx);
        self.items = Some(item_rx);
        self.handle = Some(handle);
        Ok(())
    }

    fn shutdown(&mut self) {
        self.finished = true;
        // Dropping both ends wakes a producer blocked on either of them.
        self.requests = None;
        self.items = None;
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("Generator thread ended abnormally");
        }
    }
}

impl<T: Send + 'static> Iterator for Generator<T> {
    type Item = Result<T, GeneratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_item()
    }
}

impl<T: Send + 'static> Drop for Generator<T> {
    fn drop(&mut self) {
        self.terminate();
    }
}

fn run_producer<T>(producer: Producer<T>, yielder: Yielder<T>) {
    if yielder.requests.recv().is_err() {
        return;
    }
    let last = match panic::catch_unwind(AssertUnwindSafe(|| producer(&yielder))) {
        Ok(Ok(())) | Ok(Err(Interrupted)) => Message::Finished,
        Err(payload) => Message::Fault(GeneratorError::Panicked(panic_message(payload.as_ref()))),
    };
    let _ = yielder.items.send(last);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
