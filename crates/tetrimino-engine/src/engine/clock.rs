use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

/// Number of flag polls per interval.
const POLLS_PER_INTERVAL: u32 = 60;
const MIN_POLL: Duration = Duration::from_millis(1);
/// Shortest interval between two steps.
pub const MIN_INTERVAL: Duration = MIN_POLL;

/// Signal emitted by a [`Clock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ClockSignal {
    /// One gravity interval elapsed.
    Step,
    /// The clock ended after [`Clock::stop`].
    Finished,
    /// The clock ended after [`Clock::cancel`] or being dropped.
    Canceled,
}

/// Gravity timer running on its own thread.
///
/// The clock emits [`ClockSignal::Step`] once per interval until it is
/// stopped or canceled, then emits exactly one terminal signal and exits.
/// Stop and cancel requests are noticed within a fraction of the interval.
///
/// Each clock carries a generation number chosen by its owner, so that
/// signals from a clock that has since been replaced can be told apart.
///
/// Dropping a clock cancels it.
#[derive(Debug)]
pub struct Clock {
    generation: u64,
    stop: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
}

impl Clock {
    /// Starts a clock thread that passes its signals to `notify`.
    ///
    /// The thread also ends, silently, when `notify` returns `false`.
    /// Intervals shorter than [`MIN_INTERVAL`] are raised to it.
    pub fn start<F>(generation: u64, interval: Duration, mut notify: F) -> Self
    where
        F: FnMut(ClockSignal) -> bool + Send + 'static,
    {
        let interval = interval.max(MIN_INTERVAL);
        let stop = Arc::new(AtomicBool::new(false));
        let cancel = Arc::new(AtomicBool::new(false));
        let poll = (interval / POLLS_PER_INTERVAL).max(MIN_POLL);

        let thread_stop = Arc::clone(&stop);
        let thread_cancel = Arc::clone(&cancel);
        thread::spawn(move || {
            let mut next = Instant::now() + interval;
            loop {
                if thread_cancel.load(Ordering::Acquire) {
                    notify(ClockSignal::Canceled);
                    break;
                }
                if thread_stop.load(Ordering::Acquire) {
                    notify(ClockSignal::Finished);
                    break;
                }
                let now = Instant::now();
                if now >= next {
                    if !notify(ClockSignal::Step) {
                        break;
                    }
                    next += interval;
                    continue;
                }
                thread::sleep(poll.min(next - now));
            }
            log::trace!("clock {generation} exited");
        });

        Self {
            generation,
            stop,
            cancel,
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Asks the clock to end with [`ClockSignal::Finished`].
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Asks the clock to end with [`ClockSignal::Canceled`].
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::{iter, sync::mpsc};

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn start(interval: Duration) -> (Clock, mpsc::Receiver<ClockSignal>) {
        let (tx, rx) = mpsc::channel();
        let clock = Clock::start(3, interval, move |signal| tx.send(signal).is_ok());
        (clock, rx)
    }

    fn terminal_signal(rx: &mpsc::Receiver<ClockSignal>) -> ClockSignal {
        loop {
            let signal = rx.recv_timeout(TIMEOUT).unwrap();
            if !signal.is_step() {
                return signal;
            }
        }
    }

    #[test]
    fn test_steps_are_emitted() {
        let (clock, rx) = start(Duration::from_millis(2));
        for _ in 0..3 {
            assert_eq!(rx.recv_timeout(TIMEOUT), Ok(ClockSignal::Step));
        }
        assert_eq!(clock.generation(), 3);
    }

    #[test]
    fn test_stop_finishes() {
        let (clock, rx) = start(Duration::from_millis(2));
        assert_eq!(rx.recv_timeout(TIMEOUT), Ok(ClockSignal::Step));
        clock.stop();
        assert_eq!(terminal_signal(&rx), ClockSignal::Finished);
        // the thread is gone, so the sender has been dropped
        assert!(rx.recv_timeout(TIMEOUT).is_err());
    }

    #[test]
    fn test_zero_interval_is_raised_to_minimum() {
        let (clock, rx) = start(Duration::ZERO);
        thread::sleep(Duration::from_millis(20));
        clock.stop();
        let steps = iter::from_fn(|| rx.recv_timeout(TIMEOUT).ok())
            .take_while(|signal| signal.is_step())
            .count();
        // 20 ms at one step per millisecond, with room for a slow scheduler
        assert!(steps <= 100, "{steps} steps");
    }

    #[test]
    fn test_cancel_wins_over_stop() {
        let (clock, rx) = start(Duration::from_secs(60));
        clock.cancel();
        clock.stop();
        assert_eq!(terminal_signal(&rx), ClockSignal::Canceled);
    }

    #[test]
    fn test_drop_cancels() {
        let (clock, rx) = start(Duration::from_secs(60));
        drop(clock);
        assert_eq!(terminal_signal(&rx), ClockSignal::Canceled);
    }
}
