//! Periodic status reporting for the check-in folder watcher.

use std::rc::Rc;

use gloo_timers::callback::Interval;

pub const WATCHING_MESSAGE: &str = "中継フォルダ監視中";
pub const CHECKING_MESSAGE: &str = "チェック中...";
pub const STOPPED_MESSAGE: &str = "停止中";

/// Period of the status check, in milliseconds.
pub const CHECK_PERIOD_MS: u32 = 1000;

/// Receives every text written to the status label.
pub type StatusLabel = Rc<dyn Fn(&'static str)>;

/// Starts periodic tasks. The task runs until its handle is dropped.
pub trait Ticker {
    type Handle;

    fn start(&self, period_ms: u32, on_tick: Box<dyn FnMut()>) -> Self::Handle;
}

/// Browser timer backed ticker.
pub struct IntervalTicker;

impl Ticker for IntervalTicker {
    type Handle = Interval;

    fn start(&self, period_ms: u32, on_tick: Box<dyn FnMut()>) -> Interval {
        Interval::new(period_ms, on_tick)
    }
}

/// Drives the status label from the watcher checkbox.
///
/// At most one periodic check is running at any time: enabling the watcher again replaces the
/// running check instead of adding another one.
pub struct StatusToggler<T: Ticker> {
    ticker: T,
    label: StatusLabel,
    running: Option<T::Handle>,
}

impl<T: Ticker> StatusToggler<T> {
    pub fn new(ticker: T, label: StatusLabel) -> Self {
        Self {
            ticker,
            label,
            running: None,
        }
    }

    pub fn is_watching(&self) -> bool {
        self.running.is_some()
    }

    /// Handles a change event of the watcher checkbox.
    pub fn on_change(&mut self, checked: bool) {
        // Dropping the handle cancels the check
        self.running = None;

        if !checked {
            (self.label)(STOPPED_MESSAGE);
            return;
        }

        (self.label)(WATCHING_MESSAGE);
        let label = Rc::clone(&self.label);
        self.running = Some(
            self.ticker
                .start(CHECK_PERIOD_MS, Box::new(move || label(CHECKING_MESSAGE))),
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use googletest::prelude::*;
    use std::cell::{Cell, RefCell};

    struct FakeTimer {
        period_ms: u32,
        elapsed_ms: u32,
        on_tick: Box<dyn FnMut()>,
        live: Rc<Cell<bool>>,
    }

    struct FakeHandle(Rc<Cell<bool>>);

    impl Drop for FakeHandle {
        fn drop(&mut self) {
            self.0.set(false);
        }
    }

    #[derive(Clone, Default)]
    struct FakeTicker {
        timers: Rc<RefCell<Vec<FakeTimer>>>,
    }

    impl FakeTicker {
        fn live_count(&self) -> usize {
            self.timers
                .borrow()
                .iter()
                .filter(|timer| timer.live.get())
                .count()
        }

        /// Moves the clock forward, firing every live timer once per completed period. Time not
        /// yet worth a period carries over to the next call.
        fn advance(&self, elapsed_ms: u32) {
            for timer in self.timers.borrow_mut().iter_mut() {
                timer.elapsed_ms += elapsed_ms;
                while timer.elapsed_ms >= timer.period_ms {
                    timer.elapsed_ms -= timer.period_ms;
                    if timer.live.get() {
                        (timer.on_tick)();
                    }
                }
            }
        }
    }

    impl Ticker for FakeTicker {
        type Handle = FakeHandle;

        fn start(&self, period_ms: u32, on_tick: Box<dyn FnMut()>) -> FakeHandle {
            let live = Rc::new(Cell::new(true));
            self.timers.borrow_mut().push(FakeTimer {
                period_ms,
                elapsed_ms: 0,
                on_tick,
                live: Rc::clone(&live),
            });
            FakeHandle(live)
        }
    }

    fn recording_toggler() -> (
        StatusToggler<FakeTicker>,
        FakeTicker,
        Rc<RefCell<Vec<&'static str>>>,
    ) {
        let ticker = FakeTicker::default();
        let writes = Rc::new(RefCell::new(Vec::new()));
        let label: StatusLabel = {
            let writes = Rc::clone(&writes);
            Rc::new(move |text: &'static str| writes.borrow_mut().push(text))
        };
        (StatusToggler::new(ticker.clone(), label), ticker, writes)
    }

    #[googletest::test]
    fn test_enabling_shows_watching_then_checking() {
        let (mut toggler, ticker, writes) = recording_toggler();

        toggler.on_change(true);
        let seen = writes.borrow().clone();
        expect_that!(seen, eq(&vec![WATCHING_MESSAGE]));
        expect_that!(toggler.is_watching(), eq(true));

        ticker.advance(CHECK_PERIOD_MS - 1);
        expect_that!(writes.borrow().len(), eq(1));

        ticker.advance(1);
        let seen = writes.borrow().clone();
        expect_that!(seen, eq(&vec![WATCHING_MESSAGE, CHECKING_MESSAGE]));
    }

    #[googletest::test]
    fn test_checking_repeats_every_period() {
        let (mut toggler, ticker, writes) = recording_toggler();

        toggler.on_change(true);
        ticker.advance(CHECK_PERIOD_MS - 1);
        ticker.advance(CHECK_PERIOD_MS);
        expect_that!(writes.borrow().len(), eq(2));

        ticker.advance(1);
        let seen = writes.borrow().clone();
        expect_that!(
            seen,
            eq(&vec![WATCHING_MESSAGE, CHECKING_MESSAGE, CHECKING_MESSAGE])
        );
    }

    #[googletest::test]
    fn test_enabling_twice_keeps_a_single_check() {
        let (mut toggler, ticker, writes) = recording_toggler();

        toggler.on_change(true);
        toggler.on_change(true);
        expect_that!(ticker.live_count(), eq(1));

        writes.borrow_mut().clear();
        ticker.advance(CHECK_PERIOD_MS);
        let seen = writes.borrow().clone();
        expect_that!(seen, eq(&vec![CHECKING_MESSAGE]));
    }

    #[googletest::test]
    fn test_disabling_stops_the_check() {
        let (mut toggler, ticker, writes) = recording_toggler();

        toggler.on_change(true);
        toggler.on_change(false);
        expect_that!(ticker.live_count(), eq(0));
        expect_that!(toggler.is_watching(), eq(false));
        let last = writes.borrow().last().copied();
        expect_that!(last, some(eq(STOPPED_MESSAGE)));

        writes.borrow_mut().clear();
        ticker.advance(CHECK_PERIOD_MS * 3);
        expect_that!(writes.borrow().len(), eq(0));
    }
}
