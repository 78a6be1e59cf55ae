//! Test doubles for the bus, data-ready line, timer and clock

use core::cell::{Cell, RefCell};
use core::task::Waker;
use std::collections::VecDeque;
use std::rc::Rc;

use embassy_time::Duration;
use embassy_time_driver::Driver;
use embedded_hal_async::i2c::{self, ErrorKind, ErrorType, I2c, Operation, SevenBitAddress};

use crate::timer::PeriodicTimer;

/// Transfer recorded by [`MockI2c`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Write {
        addr: u8,
        data: Vec<u8>,
    },
    WriteRead {
        addr: u8,
        write: Vec<u8>,
        read_len: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockI2cError;

impl i2c::Error for MockI2cError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Default)]
struct BusState {
    transactions: Vec<Transaction>,
    reads: VecDeque<Vec<u8>>,
    failing: Vec<usize>,
    attempts: usize,
}

/// Recording I2C bus.
///
/// Clones share the same log, so a test keeps one handle while the driver
/// owns the other. Reads are served from a queue, zeros once it runs dry.
#[derive(Debug, Clone, Default)]
pub struct MockI2c {
    state: Rc<RefCell<BusState>>,
}

impl MockI2c {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_read(&self, data: &[u8]) {
        self.state.borrow_mut().reads.push_back(data.to_vec());
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.borrow().transactions.clone()
    }

    /// Payloads of plain writes, in order
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state
            .borrow()
            .transactions
            .iter()
            .filter_map(|t| match t {
                Transaction::Write { data, .. } => Some(data.clone()),
                Transaction::WriteRead { .. } => None,
            })
            .collect()
    }

    /// Fail the next transfer
    pub fn fail_next(&self) {
        let mut state = self.state.borrow_mut();
        let attempt = state.attempts;
        state.failing.push(attempt);
    }

    /// Fail the transfer with the given zero based index, counted from creation
    pub fn fail_attempt(&self, attempt: usize) {
        self.state.borrow_mut().failing.push(attempt);
    }

    fn begin(&self) -> Result<(), MockI2cError> {
        let mut state = self.state.borrow_mut();
        let attempt = state.attempts;
        state.attempts += 1;

        if state.failing.contains(&attempt) {
            Err(MockI2cError)
        } else {
            Ok(())
        }
    }

    fn fill(&self, read: &mut [u8]) {
        let data = self.state.borrow_mut().reads.pop_front().unwrap_or_default();

        read.fill(0);
        let len = data.len().min(read.len());
        read[..len].copy_from_slice(&data[..len]);
    }
}

impl ErrorType for MockI2c {
    type Error = MockI2cError;
}

impl I2c for MockI2c {
    async fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.begin()?;

        for operation in operations {
            match operation {
                Operation::Write(data) => {
                    self.state.borrow_mut().transactions.push(Transaction::Write {
                        addr: address,
                        data: data.to_vec(),
                    })
                }
                Operation::Read(buf) => self.fill(buf),
            }
        }

        Ok(())
    }

    async fn write(&mut self, address: SevenBitAddress, write: &[u8]) -> Result<(), Self::Error> {
        self.begin()?;

        self.state.borrow_mut().transactions.push(Transaction::Write {
            addr: address,
            data: write.to_vec(),
        });

        Ok(())
    }

    async fn write_read(
        &mut self,
        address: SevenBitAddress,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.begin()?;

        self.state
            .borrow_mut()
            .transactions
            .push(Transaction::WriteRead {
                addr: address,
                write: write.to_vec(),
                read_len: read.len(),
            });
        self.fill(read);

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPinError;

impl embedded_hal::digital::Error for MockPinError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

/// Data-ready line replaying scripted edges, then staying quiet forever
#[derive(Debug, Default)]
pub struct MockPin {
    edges: VecDeque<Result<(), MockPinError>>,
}

impl MockPin {
    pub fn new(edges: &[Result<(), MockPinError>]) -> Self {
        Self {
            edges: edges.iter().copied().collect(),
        }
    }

    async fn next_edge(&mut self) -> Result<(), MockPinError> {
        match self.edges.pop_front() {
            Some(edge) => edge,
            None => core::future::pending().await,
        }
    }
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = MockPinError;
}

impl embedded_hal_async::digital::Wait for MockPin {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        self.next_edge().await
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        self.next_edge().await
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.next_edge().await
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        self.next_edge().await
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.next_edge().await
    }
}

/// Timer that only records what the controller asked for
#[derive(Debug)]
pub struct MockTimer {
    pub running: bool,
    pub interval: Duration,
    pub starts: usize,
    pub stops: usize,
}

impl MockTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            running: false,
            interval,
            starts: 0,
            stops: 0,
        }
    }
}

impl PeriodicTimer for MockTimer {
    fn start(&mut self) {
        self.running = true;
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.running = false;
        self.stops += 1;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }
}

std::thread_local! {
    static NOW: Cell<u64> = const { Cell::new(0) };
}

/// Manual time driver, the clock only moves through [`advance`] and is kept per thread
struct MockClock;

impl Driver for MockClock {
    fn now(&self) -> u64 {
        NOW.with(|now| now.get())
    }

    fn schedule_wake(&self, _at: u64, waker: &Waker) {
        waker.wake_by_ref();
    }
}

embassy_time_driver::time_driver_impl!(static CLOCK: MockClock = MockClock);

/// Move the clock of the calling thread forward
pub fn advance(by: Duration) {
    NOW.with(|now| now.set(now.get() + by.as_ticks()));
}
