//! Calendar clock (RTCC) with a minute-resolution alarm.
//!
//! The clock does not track time by itself; something has to call
//! [`Rtcc::advance_second`] once per wall second, typically a scheduler
//! timer that re-arms itself.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtccError {
    /// Hour, minute or second outside its range.
    InvalidTime,
    /// Day, month, year or weekday outside its range.
    InvalidDate,
    /// Alarm hour or minute outside its range.
    InvalidAlarm,
}

pub type Result<T> = core::result::Result<T, RtccError>;

/// Time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time {
    pub hour: u8,
    pub min: u8,
    pub sec: u8,
}

/// Calendar date. Weekday is 0..=6 with an application-defined start day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date {
    pub day: u8,
    pub month: u8,
    pub year: u16,
    pub weekday: u8,
}

const YEAR_MIN: u16 = 1900;
const YEAR_MAX: u16 = 2100;

/// Calendar/clock state: time, date and one alarm.
pub struct Rtcc {
    time: Time,
    date: Date,
    alarm_hour: u8,
    alarm_min: u8,
    alarm_set: bool,
    alarm_active: bool,
}

impl Rtcc {
    /// Clock at 00:00:00, 1 January 1900, weekday 0, alarm disarmed.
    pub fn new() -> Self {
        Self {
            time: Time {
                hour: 0,
                min: 0,
                sec: 0,
            },
            date: Date {
                day: 1,
                month: 1,
                year: YEAR_MIN,
                weekday: 0,
            },
            alarm_hour: 0,
            alarm_min: 0,
            alarm_set: false,
            alarm_active: false,
        }
    }

    pub fn set_time(&mut self, hour: u8, min: u8, sec: u8) -> Result<()> {
        if hour > 23 || min > 59 || sec > 59 {
            return Err(RtccError::InvalidTime);
        }
        self.time = Time { hour, min, sec };
        Ok(())
    }

    pub fn set_date(&mut self, day: u8, month: u8, year: u16, weekday: u8) -> Result<()> {
        if !(1..=12).contains(&month)
            || !(YEAR_MIN..=YEAR_MAX).contains(&year)
            || weekday > 6
            || day == 0
            || day > days_in_month(month, year)
        {
            return Err(RtccError::InvalidDate);
        }
        self.date = Date {
            day,
            month,
            year,
            weekday,
        };
        Ok(())
    }

    pub fn time(&self) -> Time {
        self.time
    }

    pub fn date(&self) -> Date {
        self.date
    }

    /// Arm the alarm for the given hour and minute of every day.
    pub fn set_alarm(&mut self, hour: u8, min: u8) -> Result<()> {
        if hour > 23 || min > 59 {
            return Err(RtccError::InvalidAlarm);
        }
        self.alarm_hour = hour;
        self.alarm_min = min;
        self.alarm_set = true;
        Ok(())
    }

    /// Configured alarm as (hour, minute) while armed.
    pub fn alarm(&self) -> Option<(u8, u8)> {
        if self.alarm_set {
            Some((self.alarm_hour, self.alarm_min))
        } else {
            None
        }
    }

    pub fn alarm_active(&self) -> bool {
        self.alarm_active
    }

    /// Disarm the alarm. Only honored while the current time still matches
    /// the alarm minute.
    pub fn clear_alarm(&mut self) {
        if self.time.hour == self.alarm_hour && self.time.min == self.alarm_min {
            self.alarm_active = false;
            self.alarm_set = false;
        }
    }

    /// Advance the clock by one second, carrying through minutes, hours,
    /// days, months and years. February's length follows the current year;
    /// years wrap back to 1900 past 2100. Sets the alarm active flag on
    /// every second the armed alarm's hour and minute match.
    pub fn advance_second(&mut self) {
        self.time.sec += 1;
        if self.time.sec == 60 {
            self.time.sec = 0;
            self.time.min += 1;
            if self.time.min == 60 {
                self.time.min = 0;
                self.time.hour += 1;
                if self.time.hour == 24 {
                    self.time.hour = 0;
                    self.date.weekday = (self.date.weekday + 1) % 7;
                    self.date.day += 1;
                    if self.date.day > days_in_month(self.date.month, self.date.year) {
                        self.date.day = 1;
                        self.date.month += 1;
                        if self.date.month > 12 {
                            self.date.month = 1;
                            self.date.year += 1;
                            if self.date.year > YEAR_MAX {
                                self.date.year = YEAR_MIN;
                            }
                        }
                    }
                }
            }
        }

        if self.alarm_set
            && self.time.hour == self.alarm_hour
            && self.time.min == self.alarm_min
        {
            if !self.alarm_active {
                log::debug!(
                    "rtcc alarm {:02}:{:02} active",
                    self.alarm_hour,
                    self.alarm_min
                );
            }
            self.alarm_active = true;
        }
    }
}

impl Default for Rtcc {
    fn default() -> Self {
        Self::new()
    }
}

/// Gregorian leap year rule.
pub fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Days in `month` (1-based) for `year`. Zero for an invalid month.
pub fn days_in_month(month: u8, year: u16) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}
