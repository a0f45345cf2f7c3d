//! Demo application: two tasks and two timers sharing a clock and a queue.
//!
//! A producer task samples the calendar clock once a second and queues the
//! readings; a consumer task drains the queue twice a second and prints
//! them. One timer advances the clock every wall second and re-arms
//! itself; a second timer overwrites the clock with preset time/date pairs
//! on a rotating interval.

use std::cell::RefCell;
use std::rc::Rc;

use ticksched::clock::{StdClock, StdDelay};
use ticksched::config::{QUEUE_DEPTH, RUN_MS, TASK_SLOTS, TICK_MS, TIMER_SLOTS};
use ticksched::queue::Queue;
use ticksched::rtcc::Rtcc;
use ticksched::{SchedConfig, Scheduler};

#[derive(Debug, Clone, Copy)]
enum Message {
    Time { hour: u8, min: u8, sec: u8 },
    Date { day: u8, month: u8, year: u16 },
}

/// Time/date pairs the preset timer cycles through, with the delay in
/// milliseconds before the next one is applied.
const PRESETS: [((u8, u8, u16, u8), (u8, u8, u8)); 3] = [
    ((10, 12, 2002, 5), (8, 54, 2)),
    ((5, 9, 1998, 4), (4, 39, 11)),
    ((9, 1, 2024, 3), (16, 5, 6)),
];
const PRESET_INTERVALS_MS: [u32; 3] = [5000, 3000, 8000];

fn main() {
    let queue = Rc::new(RefCell::new(Queue::<Message>::new(QUEUE_DEPTH)));
    let rtcc = Rc::new(RefCell::new(Rtcc::new()));

    let mut sched = Scheduler::new(SchedConfig {
        tick_ms: TICK_MS,
        task_slots: TASK_SLOTS,
        timer_slots: TIMER_SLOTS,
        run_ms: RUN_MS,
    });

    let consumer_queue = Rc::clone(&queue);
    sched
        .register_task(
            |_| println!("consumer ready"),
            move |_| {
                while let Ok(msg) = consumer_queue.borrow_mut().read() {
                    match msg {
                        Message::Time { hour, min, sec } => {
                            println!("Time - {}:{:02}:{:02}", hour, min, sec);
                        }
                        Message::Date { day, month, year } => {
                            println!("Date - {}/{}/{}", day, month, year);
                        }
                    }
                }
            },
            500,
        )
        .expect("consumer task");

    let producer_rtcc = Rc::clone(&rtcc);
    let producer_queue = Rc::clone(&queue);
    let init_rtcc = Rc::clone(&rtcc);
    sched
        .register_task(
            move |_| {
                let mut clock = init_rtcc.borrow_mut();
                clock.set_time(12, 30, 0).expect("initial time");
                clock.set_date(24, 6, 1984, 5).expect("initial date");
            },
            move |_| {
                let clock = producer_rtcc.borrow();
                let time = clock.time();
                let date = clock.date();
                let mut q = producer_queue.borrow_mut();
                // A full queue just drops the sample; the consumer catches up.
                let _ = q.write(Message::Time {
                    hour: time.hour,
                    min: time.min,
                    sec: time.sec,
                });
                let _ = q.write(Message::Date {
                    day: date.day,
                    month: date.month,
                    year: date.year,
                });
            },
            1000,
        )
        .expect("producer task");

    let second_rtcc = Rc::clone(&rtcc);
    let second_timer = sched
        .register_timer(
            move |ctl, id| {
                second_rtcc.borrow_mut().advance_second();
                ctl.reload_timer(id, 1000).expect("re-arm second timer");
            },
            1000,
        )
        .expect("second timer");

    let preset_rtcc = Rc::clone(&rtcc);
    let mut preset_index = 0usize;
    let preset_timer = sched
        .register_timer(
            move |ctl, id| {
                let ((day, month, year, weekday), (hour, min, sec)) = PRESETS[preset_index];
                let mut clock = preset_rtcc.borrow_mut();
                clock.set_time(hour, min, sec).expect("preset time");
                clock.set_date(day, month, year, weekday).expect("preset date");
                preset_index = (preset_index + 1) % PRESETS.len();
                ctl.reload_timer(id, PRESET_INTERVALS_MS[preset_index])
                    .expect("re-arm preset timer");
            },
            PRESET_INTERVALS_MS[0],
        )
        .expect("preset timer");

    sched.ctl_mut().start_timer(second_timer).expect("start second timer");
    sched.ctl_mut().start_timer(preset_timer).expect("start preset timer");

    let mut clock = StdClock::new();
    let mut delay = StdDelay;
    sched.run(&mut clock, &mut delay);
}
