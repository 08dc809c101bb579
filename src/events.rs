use std::io;
use std::sync::mpsc::{self, Receiver, RecvError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use unsegen::input::Input;

use crate::config::Config;

pub enum Event {
    Input(Input),
    /// Periodic tick so that today can roll over while idle.
    Update,
}

/// Feeds terminal input and ticks to the UI thread, which owns all
/// calendar state.
pub struct Dispatcher {
    rx: Receiver<Event>,
    _input_handle: JoinHandle<()>,
    _tick_handle: JoinHandle<()>,
}

fn spawn_input(tx: Sender<Event>) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        for input in Input::read_all(stdin.lock()) {
            match input {
                Ok(input) => {
                    if tx.send(Event::Input(input)).is_err() {
                        return;
                    }
                }
                Err(err) => log::warn!("Could not read input: {}", err),
            }
        }
    })
}

fn spawn_ticker(tx: Sender<Event>, tick_rate: Duration) -> JoinHandle<()> {
    thread::spawn(move || {
        while tx.send(Event::Update).is_ok() {
            thread::sleep(tick_rate);
        }
    })
}

impl Dispatcher {
    pub fn from_config(config: &Config) -> Dispatcher {
        let (tx, rx) = mpsc::channel();
        log::debug!("Ticking every {:?}", config.tick_rate);

        Dispatcher {
            rx,
            _input_handle: spawn_input(tx.clone()),
            _tick_handle: spawn_ticker(tx, config.tick_rate),
        }
    }

    pub fn next(&self) -> Result<Event, RecvError> {
        self.rx.recv()
    }
}
